//! Library side of the `quickbar` binary: the simulated browser, the script
//! format and the replay driver.

pub mod browser;
pub mod script;
pub mod simulation;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use quickbar_core::config::{Directories, FileStore, MemoryStore, SettingsStore};
use quickbar_types::SearchProvider;

pub use browser::{SearchRecord, SimulatedBrowser, Tab, demo_providers};
pub use script::{Step, parse_script};
pub use simulation::{OverlayReport, Report, Simulation, replay};

/// Read a JSON array of providers, or fall back to the demo list.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_providers(path: Option<&Path>) -> Result<Vec<SearchProvider>> {
    let Some(path) = path else {
        return Ok(demo_providers());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read providers from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid provider list in {}", path.display()))
}

/// Open the settings file at `path`, or the one in the user config directory.
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined or the file
/// cannot be loaded.
pub fn open_settings_file(path: Option<&Path>) -> Result<Arc<FileStore>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Directories::new()?.settings_file,
    };
    FileStore::open(&path).with_context(|| format!("Failed to open settings {}", path.display()))
}

/// Settings for a replay: a watched file when given, otherwise in memory.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or watched.
pub fn replay_settings(path: Option<&Path>) -> Result<Arc<dyn SettingsStore>> {
    match path {
        Some(path) => {
            let store = open_settings_file(Some(path))?;
            store.watch().context("Failed to watch settings file")?;
            Ok(store)
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
