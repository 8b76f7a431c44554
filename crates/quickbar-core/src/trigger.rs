//! Page-side trigger detection.
//!
//! One [`TriggerDetector`] runs per page context. It turns raw keydown events
//! into at most one `openSearchbar` message and tells the page whether to
//! suppress the event.

use quickbar_rpc::{Message, RuntimeClient};
use quickbar_types::{ActivationIntent, KeyEvent, TargetElement};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::{SettingsChange, SettingsStore, TRIGGER_KEY};

/// Input types that accept typed text.
const EDITABLE_INPUT_TYPES: &[&str] = &[
    "text", "textarea", "password", "email", "number", "tel", "url", "search",
];

/// Which keydowns open the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TriggerRule {
    /// A single printable character or space (typed into the overlay), or
    /// Enter while text is selected.
    #[default]
    Character,

    /// Exactly this physical key code, e.g. `F2`. Seeds nothing.
    KeyCode(String),
}

impl TriggerRule {
    /// Parse the `triggerKey` setting. Missing or empty selects [`TriggerRule::Character`].
    #[must_use]
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some(code) if !code.is_empty() => Self::KeyCode(code.to_string()),
            _ => Self::Character,
        }
    }
}

/// Page state sampled when a key event arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Current text selection, empty when nothing is selected.
    pub selection: String,
    /// `document.designMode == "on"`.
    pub design_mode: bool,
}

impl PageContext {
    #[must_use]
    pub fn with_selection(selection: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            design_mode: false,
        }
    }
}

/// What the page must do with the event after the detector saw it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyDisposition {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl KeyDisposition {
    const PASS: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };
    const CONSUMED: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };

    #[must_use]
    pub fn is_consumed(self) -> bool {
        self.prevent_default && self.stop_propagation
    }
}

/// A keydown delivered to the detector's event loop.
#[derive(Debug)]
pub struct PageKeyEvent {
    pub event: KeyEvent,
    pub page: PageContext,
    /// Receives the disposition once the event has been evaluated.
    pub disposition: Option<oneshot::Sender<KeyDisposition>>,
}

/// Whether typing into `target` would edit the page.
#[must_use]
pub fn is_editable(target: &TargetElement, design_mode: bool) -> bool {
    if design_mode || target.content_editable {
        return true;
    }

    let local_name = target.local_name.as_str();
    // elements always report a type; a select is "select-one" or "select-multiple"
    let input_type = target.input_type.as_deref().unwrap_or(match local_name {
        "select" => "select-one",
        "textarea" => "textarea",
        _ => "text",
    });

    matches!(local_name, "input" | "textarea" | "select")
        && EDITABLE_INPUT_TYPES.contains(&input_type)
        && !target.disabled
        && !target.read_only
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A key value produces text unless it is a named key. Named keys (`Enter`,
/// `ArrowUp`, `F1`, `Dead`) contain two word characters in a row; typed
/// text such as `é` or an emoji sequence may span several code points.
fn printable_key(key: &str) -> Option<&str> {
    let named = key
        .chars()
        .zip(key.chars().skip(1))
        .any(|(a, b)| is_word_char(a) && is_word_char(b));

    if key.is_empty() || named || key.chars().any(char::is_control) {
        None
    } else {
        Some(key)
    }
}

pub struct TriggerDetector {
    rule: TriggerRule,
    client: RuntimeClient,
}

impl TriggerDetector {
    #[must_use]
    pub fn new(rule: TriggerRule, client: RuntimeClient) -> Self {
        Self { rule, client }
    }

    #[must_use]
    pub fn from_store(store: &dyn SettingsStore, client: RuntimeClient) -> Self {
        Self::new(
            TriggerRule::from_setting(store.get(TRIGGER_KEY).as_deref()),
            client,
        )
    }

    #[must_use]
    pub fn rule(&self) -> &TriggerRule {
        &self.rule
    }

    /// Decide whether `event` activates the overlay. Pure: sends nothing.
    #[must_use]
    pub fn evaluate(&self, event: &KeyEvent, page: &PageContext) -> Option<ActivationIntent> {
        if !event.is_trusted
            || is_editable(&event.target, page.design_mode)
            || event.has_command_modifier()
        {
            return None;
        }

        let pressed_key = match &self.rule {
            TriggerRule::KeyCode(code) => {
                if *code != event.code {
                    return None;
                }
                String::new()
            }
            TriggerRule::Character => {
                if let Some(text) = printable_key(&event.key) {
                    text.to_string()
                } else if event.key == "Enter" && !page.selection.is_empty() {
                    String::new()
                } else {
                    return None;
                }
            }
        };

        Some(ActivationIntent {
            pressed_key,
            selected_text: page.selection.clone(),
        })
    }

    /// Evaluate `event`, emit the activation if it passes, and report how the
    /// page must treat the event.
    pub fn handle_key(&self, event: &KeyEvent, page: &PageContext) -> KeyDisposition {
        let Some(intent) = self.evaluate(event, page) else {
            return KeyDisposition::PASS;
        };

        debug!(
            "Activation on key {:?} (selection: {} chars)",
            event.key,
            intent.selected_text.chars().count()
        );
        self.client.send_message(Message::OpenSearchbar(intent));
        KeyDisposition::CONSUMED
    }

    /// Apply a settings change. Only `triggerKey` is relevant.
    pub fn apply_change(&mut self, change: &SettingsChange) {
        if change.key != TRIGGER_KEY {
            return;
        }
        self.rule = TriggerRule::from_setting(change.new_value.as_deref());
        info!("Trigger rule is now {:?}", self.rule);
    }

    fn serve(&self, key: PageKeyEvent) {
        let result = self.handle_key(&key.event, &key.page);
        if let Some(tx) = key.disposition {
            let _ = tx.send(result);
        }
    }

    /// Serve page key events and settings changes until the page goes away.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<PageKeyEvent>,
        mut changes: broadcast::Receiver<SettingsChange>,
    ) {
        loop {
            tokio::select! {
                // settings first, so a key sent after a change sees the new rule
                biased;

                change = changes.recv() => match change {
                    Ok(change) => self.apply_change(&change),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Missed {} settings changes", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Settings store gone, keeping {:?}", self.rule);
                        while let Some(key) = events.recv().await {
                            self.serve(key);
                        }
                        break;
                    }
                },
                key = events.recv() => {
                    let Some(key) = key else {
                        debug!("Page closed, trigger detector stopping");
                        break;
                    };
                    self.serve(key);
                }
            }
        }
    }
}
