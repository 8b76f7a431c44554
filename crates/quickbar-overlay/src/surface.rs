//! Seams between the controller and the top-frame document.

use crate::carousel::CarouselView;

/// Inline opacity of the overlay backdrop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Opacity {
    #[default]
    Transparent,
    Opaque,
}

/// Animation applied to the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAnimation {
    SlideIn,
    SlideOut,
}

impl FormAnimation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SlideIn => "slideIn",
            Self::SlideOut => "slideOut",
        }
    }
}

/// UI events raised by the surface or the overlay element.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The surface document finished loading.
    Loaded,
    /// The input value changed.
    Input,
    Submit,
    KeyDown { key: String },
    Wheel { delta_y: f64 },
    /// Focus left an element of the form; `within_form` tells whether the
    /// element receiving focus is still inside it.
    FocusOut { within_form: bool },
    CarouselTransitionEnd,
    OverlayTransitionEnd { property: String },
}

impl SurfaceEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }

    #[must_use]
    pub fn opacity_transition_end() -> Self {
        Self::OverlayTransitionEnd {
            property: "opacity".to_string(),
        }
    }
}

/// The loaded overlay document.
pub trait SurfaceDocument {
    fn input_value(&self) -> String;
    fn set_input_value(&mut self, value: &str);
    /// Collapse the selection to `position`, counted in characters.
    fn set_caret(&mut self, position: usize);
    fn focus_window(&mut self);
    fn focus_input(&mut self);
    fn set_form_animation(&mut self, animation: FormAnimation);
    fn render_carousel(&mut self, view: &CarouselView);
}

/// The top-frame page that hosts the overlay surface.
///
/// Attaching is asynchronous: the host reports [`SurfaceEvent::Loaded`] once
/// the document is usable.
pub trait OverlayHost {
    fn attach_surface(&mut self);
    fn remove_surface(&mut self);
    fn is_surface_attached(&self) -> bool;

    fn set_overlay_opacity(&mut self, opacity: Opacity);
    fn overlay_opacity(&self) -> Opacity;
    /// Whether the resolved (not inline) opacity is already zero, i.e. no
    /// fade-out will run and no transition-end will follow.
    fn is_overlay_transparent(&self) -> bool;

    fn has_document(&self) -> bool;
    fn document(&mut self) -> Option<&mut dyn SurfaceDocument>;
}
