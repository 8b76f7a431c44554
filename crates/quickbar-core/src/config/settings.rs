use quickbar_types::Placement;

use super::store::SettingsStore;
use crate::trigger::TriggerRule;

/// Key code of the exact-key trigger; empty selects the default character rule.
pub const TRIGGER_KEY: &str = "triggerKey";

/// Where searches open: `current|start|end|before|after`.
pub const SEARCH_TARGET_TAB: &str = "searchTargetTab";

/// Typed view over the settings the components react to.
///
/// Any other stored key is an opaque string owned by the settings editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub trigger_rule: TriggerRule,
    pub search_target_tab: Placement,
}

impl Settings {
    #[must_use]
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        Self {
            trigger_rule: TriggerRule::from_setting(store.get(TRIGGER_KEY).as_deref()),
            search_target_tab: Placement::from_setting(store.get(SEARCH_TARGET_TAB).as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;

    #[test]
    fn test_settings_default() {
        let settings = Settings::from_store(&MemoryStore::new());
        assert_eq!(settings.trigger_rule, TriggerRule::Character);
        assert_eq!(settings.search_target_tab, Placement::After);
    }

    #[test]
    fn test_settings_from_store() {
        let store = MemoryStore::with_values([(TRIGGER_KEY, "F2"), (SEARCH_TARGET_TAB, "start")]);
        let settings = Settings::from_store(&store);
        assert_eq!(settings.trigger_rule, TriggerRule::KeyCode("F2".to_string()));
        assert_eq!(settings.search_target_tab, Placement::Start);
    }

    #[test]
    fn test_settings_invalid_placement_falls_back() {
        let store = MemoryStore::with_values([(SEARCH_TARGET_TAB, "sideways")]);
        assert_eq!(
            Settings::from_store(&store).search_target_tab,
            Placement::After
        );
    }
}
