use std::fmt;

use crate::carousel::Carousel;

/// Overlay lifecycle phase.
///
/// `Closed → Loading → Open → Closing → Closed`. `Loading` waits for the
/// surface document, `Closing` waits for the fade-out to finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Closed,
    Loading,
    Open,
    Closing,
}

impl Phase {
    /// Phases in which queued actions may still touch the surface.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Loading | Self::Open)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Closed => "closed",
            Self::Loading => "loading",
            Self::Open => "open",
            Self::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// Everything the top frame remembers about the current overlay instance.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    pub phase: Phase,
    /// Seed characters typed before the surface could take focus.
    pub pressed_key: String,
    pub selected_text: String,
    /// Index into the provider list; `None` until the list is revealed.
    pub active_index: Option<usize>,
    pub carousel: Carousel,
}

impl OverlayState {
    /// Back to `Closed` with nothing buffered.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Seed plus selection, as shown in the input when the surface loads.
    #[must_use]
    pub fn initial_input(&self) -> String {
        format!("{}{}", self.pressed_key, self.selected_text)
    }

    /// Caret position right after the seed, in characters.
    #[must_use]
    pub fn seed_caret(&self) -> usize {
        self.pressed_key.chars().count()
    }
}
