//! Scripted replays through the whole pipeline.

use std::sync::Arc;
use std::time::Duration;

use quickbar_cli::{demo_providers, parse_script, replay, replay_settings};
use quickbar_core::config::{MemoryStore, SettingsStore};
use quickbar_types::SearchProvider;

fn providers() -> Vec<SearchProvider> {
    vec![
        SearchProvider::new("A", "a").with_icon("a.png").as_default(),
        SearchProvider::new("B", "b").with_icon("b.png"),
        SearchProvider::new("C", "c").with_icon("c.png"),
    ]
}

fn memory() -> Arc<dyn SettingsStore> {
    Arc::new(MemoryStore::new())
}

#[tokio::test]
async fn test_open_shows_default_provider() {
    let steps = parse_script(r#"{"type": "key", "key": " ", "code": "Space"}"#).unwrap();
    let report = replay(&steps, providers(), memory()).await.unwrap();

    assert_eq!(report.overlay.phase, "open");
    assert_eq!(report.overlay.input.as_deref(), Some(" "));
    assert_eq!(report.overlay.provider.as_deref(), Some("A"));
    assert!(report.searches.is_empty());
}

#[tokio::test]
async fn test_arrow_down_twice_then_search() {
    let steps = parse_script(
        r#"{"type": "select", "text": "hello"}
{"type": "key", "key": "x", "code": "KeyX", "frame": 3}
{"type": "keydown", "key": "ArrowDown"}
{"type": "keydown", "key": "ArrowDown"}
{"type": "submit"}"#,
    )
    .unwrap();
    let report = replay(&steps, providers(), memory()).await.unwrap();

    assert_eq!(report.searches.len(), 1);
    assert_eq!(report.searches[0].query, "xhello");
    assert_eq!(report.searches[0].engine, "B");
    assert_eq!(report.overlay.phase, "closed");

    // default placement opens right after the page's tab
    assert_eq!(report.tabs.len(), 2);
    assert_eq!(report.tabs[1].id, report.searches[0].tab_id);
    assert_eq!(report.tabs[1].opener, Some(report.tabs[0].id));
}

#[tokio::test]
async fn test_keyword_switch_in_current_tab() {
    let steps = parse_script(
        r#"{"type": "setting", "key": "searchTargetTab", "value": "current"}
{"type": "key", "key": "q", "code": "KeyQ"}
{"type": "type", "text": "c rust borrow"}
{"type": "submit"}"#,
    )
    .unwrap();
    let report = replay(&steps, providers(), memory()).await.unwrap();

    assert_eq!(report.tabs.len(), 1);
    assert_eq!(report.tabs[0].url, "search://c?q=rust+borrow");
    assert_eq!(report.searches[0].engine, "C");
    assert_eq!(report.searches[0].query, "rust borrow");
}

#[tokio::test]
async fn test_editable_target_and_enter_do_not_open() {
    let steps = parse_script(
        r#"{"type": "key", "key": "a", "code": "KeyA", "target": {"localName": "textarea"}}
{"type": "key", "key": "Enter", "code": "Enter"}
{"type": "key", "key": "b", "code": "KeyB", "ctrl": true}
{"type": "key", "key": "c", "code": "KeyC", "trusted": false}"#,
    )
    .unwrap();
    let report = replay(&steps, providers(), memory()).await.unwrap();

    assert_eq!(report.overlay.phase, "closed");
    assert_eq!(report.overlay.input, None);
}

#[tokio::test]
async fn test_shift_is_the_only_modifier_that_opens() {
    let steps = parse_script(
        r#"{"type": "key", "key": "Q", "code": "KeyQ", "shift": true, "alt": true}
{"type": "key", "key": "Q", "code": "KeyQ", "shift": true}"#,
    )
    .unwrap();
    let report = replay(&steps, providers(), memory()).await.unwrap();

    assert_eq!(report.overlay.phase, "open");
    assert_eq!(report.overlay.input.as_deref(), Some("Q"));
}

#[tokio::test]
async fn test_trigger_key_setting_applies_to_running_frames() {
    let steps = parse_script(
        r#"{"type": "key", "key": "Escape", "code": "Escape"}
{"type": "setting", "key": "triggerKey", "value": "F2"}
{"type": "key", "key": "a", "code": "KeyA"}
{"type": "key", "key": "F2", "code": "F2"}"#,
    )
    .unwrap();
    let report = replay(&steps, providers(), memory()).await.unwrap();

    assert_eq!(report.overlay.phase, "open");
    assert_eq!(report.overlay.input.as_deref(), Some(""));
}

#[tokio::test]
async fn test_escape_closes_without_search() {
    let steps = parse_script(
        r#"{"type": "key", "key": "k", "code": "KeyK"}
{"type": "keydown", "key": "Escape"}
{"type": "submit"}"#,
    )
    .unwrap();
    let report = replay(&steps, demo_providers(), memory()).await.unwrap();

    assert_eq!(report.overlay.phase, "closed");
    assert!(report.searches.is_empty());
}

#[tokio::test]
async fn test_empty_provider_list_keeps_overlay_closed() {
    let steps = parse_script(r#"{"type": "key", "key": "k", "code": "KeyK"}"#).unwrap();
    let report = replay(&steps, Vec::new(), memory()).await.unwrap();
    assert_eq!(report.overlay.phase, "closed");
}

#[tokio::test]
async fn test_settings_file_edit_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"triggerKey": "F9"}"#).unwrap();

    let settings = replay_settings(Some(&path)).unwrap();
    assert_eq!(settings.get("triggerKey").as_deref(), Some("F9"));

    let mut changes = settings.subscribe();
    std::fs::write(&path, r#"{"triggerKey": "F4", "searchTargetTab": "end"}"#).unwrap();

    let mut seen = Vec::new();
    while seen.len() < 2 {
        let change = tokio::time::timeout(Duration::from_secs(5), changes.recv())
            .await
            .expect("no change from watcher")
            .unwrap();
        seen.push(change.key);
    }
    seen.sort();
    assert_eq!(seen, vec!["searchTargetTab", "triggerKey"]);
    assert_eq!(settings.get("triggerKey").as_deref(), Some("F4"));
}
