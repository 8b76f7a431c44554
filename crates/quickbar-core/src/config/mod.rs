mod dirs;
mod settings;
mod store;
mod watcher;

pub use dirs::Directories;
pub use settings::{SEARCH_TARGET_TAB, Settings, TRIGGER_KEY};
pub use store::{FileStore, MemoryStore, SettingsChange, SettingsStore};
