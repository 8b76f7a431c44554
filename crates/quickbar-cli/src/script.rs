//! JSON-lines scripts replayed by `quickbar run`.
//!
//! One step per line; blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"type": "select", "text": "hello"}
//! {"type": "key", "key": "x", "code": "KeyX", "frame": 2}
//! {"type": "keydown", "key": "ArrowDown"}
//! {"type": "type", "text": "w rust"}
//! {"type": "submit"}
//! ```

use anyhow::{Context, Result};
use quickbar_types::{FrameId, KeyEvent, TargetElement};
use serde::Deserialize;

fn trusted() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Step {
    /// Set the page selection seen by later key presses.
    Select { text: String },

    /// A keydown delivered to the page in `frame`.
    Key {
        key: String,
        #[serde(default)]
        code: String,
        #[serde(default)]
        frame: FrameId,
        /// Element with focus, e.g. `{"localName": "textarea"}`.
        #[serde(default)]
        target: Option<TargetElement>,
        #[serde(default = "trusted")]
        trusted: bool,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        meta: bool,
        #[serde(default)]
        shift: bool,
    },

    /// Replace the overlay input value, as if the user typed it.
    Type { text: String },

    /// A keydown inside the overlay.
    Keydown { key: String },

    Wheel { delta_y: f64 },

    Submit,

    /// Focus moved out of the overlay input.
    FocusOut {
        #[serde(default)]
        within_form: bool,
    },

    /// Change a setting, as the options page would.
    Setting { key: String, value: String },
}

impl Step {
    /// The page keydown event for a `key` step.
    #[must_use]
    pub fn key_event(&self) -> Option<KeyEvent> {
        let Self::Key {
            key,
            code,
            target,
            trusted,
            ctrl,
            alt,
            meta,
            shift,
            ..
        } = self
        else {
            return None;
        };

        let mut event = KeyEvent::trusted(key.clone(), code.clone());
        event.is_trusted = *trusted;
        event.ctrl_key = *ctrl;
        event.alt_key = *alt;
        event.meta_key = *meta;
        event.shift_key = *shift;
        if let Some(target) = target {
            event.target = target.clone();
        }
        Some(event)
    }
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns an error naming the first line that is not a valid step.
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(number, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid step on line {}", number + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_skips_comments() {
        let steps = parse_script(
            r#"
# open with a selection
{"type": "select", "text": "hello"}
{"type": "key", "key": "x", "code": "KeyX"}

{"type": "submit"}
"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 3);
        assert_eq!(
            steps[0],
            Step::Select {
                text: "hello".to_string()
            }
        );
        assert_eq!(steps[2], Step::Submit);
    }

    #[test]
    fn test_key_step_defaults() {
        let steps = parse_script(r#"{"type": "key", "key": "a"}"#).unwrap();
        let event = steps[0].key_event().unwrap();
        assert!(event.is_trusted);
        assert!(!event.has_command_modifier());
        assert_eq!(event.target.local_name, "body");
        assert!(matches!(steps[0], Step::Key { frame: 0, .. }));
    }

    #[test]
    fn test_key_step_with_target() {
        let steps = parse_script(
            r#"{"type": "key", "key": "a", "ctrl": true, "target": {"localName": "input", "type": "search"}}"#,
        )
        .unwrap();
        let event = steps[0].key_event().unwrap();
        assert!(event.ctrl_key);
        assert_eq!(event.target.local_name, "input");
        assert_eq!(event.target.input_type.as_deref(), Some("search"));
    }

    #[test]
    fn test_key_step_shift() {
        let steps = parse_script(r#"{"type": "key", "key": "A", "code": "KeyA", "shift": true}"#).unwrap();
        let event = steps[0].key_event().unwrap();
        assert!(event.shift_key);
        assert!(!event.has_command_modifier());
    }

    #[test]
    fn test_camel_case_fields() {
        let steps = parse_script(
            r#"{"type": "wheel", "deltaY": 1.5}
{"type": "focusOut", "withinForm": true}"#,
        )
        .unwrap();
        assert_eq!(steps[0], Step::Wheel { delta_y: 1.5 });
        assert_eq!(steps[1], Step::FocusOut { within_form: true });
    }

    #[test]
    fn test_invalid_line_is_reported() {
        let err = parse_script("{\"type\": \"submit\"}\n{\"type\": \"fly\"}").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
