//! Shared types for quickbar components.
//!
//! This crate provides the data model used by the page-side trigger detector,
//! the dispatcher and the top-frame overlay controller. Everything that crosses
//! a context boundary is serializable so it can travel through the message bus
//! as an owned value.

use serde::{Deserialize, Serialize};

/// Identifier of a browser tab.
pub type TabId = u64;

/// Identifier of a frame inside a tab. The top frame is always [`TOP_FRAME_ID`].
pub type FrameId = u64;

/// Frame id of the outermost browsing context of a tab.
pub const TOP_FRAME_ID: FrameId = 0;

/// Tab index used for the `end` placement. Hosts clamp it to the last slot.
pub const END_TAB_INDEX: u64 = 9_007_199_254_740_991;

/// Resource identifier of the embedded overlay document.
pub const SURFACE_RESOURCE: &str = "core/content.html";

/// A configured search engine as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProvider {
    pub name: String,
    /// Keyword prefix; empty when the provider has no keyword.
    #[serde(default)]
    pub alias: String,
    #[serde(default, rename = "favIconUrl")]
    pub fav_icon_url: String,
    #[serde(default)]
    pub is_default: bool,
}

impl SearchProvider {
    #[must_use]
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            fav_icon_url: String::new(),
            is_default: false,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, url: impl Into<String>) -> Self {
        self.fav_icon_url = url.into();
        self
    }

    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// The `alias + " "` prefix that selects this provider from the search field.
    #[must_use]
    pub fn keyword_prefix(&self) -> Option<String> {
        if self.alias.is_empty() {
            None
        } else {
            Some(format!("{} ", self.alias))
        }
    }
}

/// Index of the provider flagged as default.
#[must_use]
pub fn default_provider_index(providers: &[SearchProvider]) -> Option<usize> {
    providers.iter().position(|p| p.is_default)
}

/// "The user wants to open the overlay now."
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationIntent {
    /// Text that should seed the search field, empty unless the key itself is typed.
    pub pressed_key: String,
    pub selected_text: String,
}

/// A search submitted from the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Provider name.
    pub engine: String,
}

/// Where a search opens, relative to the tab that submitted it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Current,
    Start,
    End,
    Before,
    #[default]
    After,
}

impl Placement {
    /// Parse a stored setting value. Unknown or missing values fall back to
    /// [`Placement::After`].
    #[must_use]
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("current") => Self::Current,
            Some("start") => Self::Start,
            Some("end") => Self::End,
            Some("before") => Self::Before,
            _ => Self::After,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Start => "start",
            Self::End => "end",
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tab identity as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    /// Position of the tab in its window.
    pub index: u64,
}

/// Implicit origin of a message. Page-independent contexts have no tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSender {
    pub tab: Option<TabInfo>,
    pub frame_id: FrameId,
}

impl MessageSender {
    #[must_use]
    pub fn frame(tab: TabInfo, frame_id: FrameId) -> Self {
        Self {
            tab: Some(tab),
            frame_id,
        }
    }

    #[must_use]
    pub fn is_top_frame(&self) -> bool {
        self.frame_id == TOP_FRAME_ID
    }
}

/// The element a key event was dispatched to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetElement {
    /// Lowercase tag name, e.g. `input`.
    pub local_name: String,
    /// The `type` attribute of form controls, if present.
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub content_editable: bool,
    pub disabled: bool,
    pub read_only: bool,
}

impl TargetElement {
    #[must_use]
    pub fn named(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }
}

/// A raw keydown event as observed by a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyEvent {
    /// Produced character or named key (`"a"`, `" "`, `"Enter"`, `"ArrowUp"`).
    pub key: String,
    /// Physical key code (`"KeyA"`, `"Space"`, `"F2"`).
    pub code: String,
    /// `false` for events synthesized by page scripts.
    pub is_trusted: bool,
    pub alt_key: bool,
    pub ctrl_key: bool,
    pub meta_key: bool,
    pub shift_key: bool,
    pub target: TargetElement,
}

impl KeyEvent {
    /// A trusted, unmodified keydown on the document body.
    #[must_use]
    pub fn trusted(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            is_trusted: true,
            target: TargetElement::named("body"),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn on(mut self, target: TargetElement) -> Self {
        self.target = target;
        self
    }

    /// True when Alt, Ctrl or Meta is held. Shift does not count.
    #[must_use]
    pub fn has_command_modifier(&self) -> bool {
        self.alt_key || self.ctrl_key || self.meta_key
    }
}
