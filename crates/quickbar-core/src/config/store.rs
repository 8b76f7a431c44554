//! Key/value settings storage with change notifications.
//!
//! Values are plain strings. A store broadcasts one [`SettingsChange`] per key
//! whose value actually changed, whether the change came from [`SettingsStore::set`]
//! or from an external edit picked up by the file watcher.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::watcher::{SettingsWatcher, spawn_settings_watcher};
use crate::{Error, Result};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChange {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value and notify subscribers if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if a persistent store fails to write.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn snapshot(&self) -> BTreeMap<String, String>;

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange>;
}

fn diff(old: &BTreeMap<String, String>, new: &BTreeMap<String, String>) -> Vec<SettingsChange> {
    let mut changes = Vec::new();

    for (key, new_value) in new {
        let old_value = old.get(key);
        if old_value != Some(new_value) {
            changes.push(SettingsChange {
                key: key.clone(),
                old_value: old_value.cloned(),
                new_value: Some(new_value.clone()),
            });
        }
    }

    for (key, old_value) in old {
        if !new.contains_key(key) {
            changes.push(SettingsChange {
                key: key.clone(),
                old_value: Some(old_value.clone()),
                new_value: None,
            });
        }
    }

    changes
}

fn broadcast_all(tx: &broadcast::Sender<SettingsChange>, changes: Vec<SettingsChange>) {
    for change in changes {
        debug!("Setting '{}' changed", change.key);
        // No subscribers is fine
        let _ = tx.send(change);
    }
}

/// In-process store, used by tests and the simulated browser.
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
    changes: broadcast::Sender<SettingsChange>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_values(std::iter::empty::<(String, String)>())
    }

    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            changes,
        }
    }

    /// Remove a key, notifying subscribers if it existed.
    pub fn remove(&self, key: &str) {
        let old_value = self
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if let Some(old_value) = old_value {
            broadcast_all(
                &self.changes,
                vec![SettingsChange {
                    key: key.to_string(),
                    old_value: Some(old_value),
                    new_value: None,
                }],
            );
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let old_value = self
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());

        if old_value.as_deref() != Some(value) {
            broadcast_all(
                &self.changes,
                vec![SettingsChange {
                    key: key.to_string(),
                    old_value,
                    new_value: Some(value.to_string()),
                }],
            );
        }
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}

/// Store backed by a JSON object file.
///
/// Non-string JSON values are kept in their JSON text form; `null` entries are
/// treated as absent.
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
    changes: broadcast::Sender<SettingsChange>,
    watcher: Mutex<Option<SettingsWatcher>>,
}

impl FileStore {
    /// Load the store from `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Arc<Self>> {
        let path = path.into();
        let values = read_values(&path)?;
        info!("Loaded {} settings from {:?}", values.len(), path);

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Arc::new(Self {
            path,
            values: RwLock::new(values),
            changes,
            watcher: Mutex::new(None),
        }))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start watching the file for external edits. Calling this twice replaces
    /// the previous watcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or watched.
    pub fn watch(self: &Arc<Self>) -> Result<()> {
        let weak = Arc::downgrade(self);
        let watcher = spawn_settings_watcher(&self.path, move || {
            let Some(store) = weak.upgrade() else {
                return false;
            };
            if let Err(e) = store.reload() {
                warn!("Failed to reload settings from {:?}: {}", store.path, e);
            }
            true
        })?;

        *self.watcher.lock().unwrap_or_else(PoisonError::into_inner) = Some(watcher);
        Ok(())
    }

    /// Re-read the file and broadcast every changed key. Returns the number of
    /// changed keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed; the in-memory
    /// values are left untouched in that case.
    pub fn reload(&self) -> Result<usize> {
        let fresh = read_values(&self.path)?;

        let changes = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            let changes = diff(&values, &fresh);
            *values = fresh;
            changes
        };

        let count = changes.len();
        broadcast_all(&self.changes, changes);
        Ok(count)
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let old_value = {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = values.clone();
            let old_value = next.insert(key.to_string(), value.to_string());
            // memory only changes once the file does
            self.persist(&next)?;
            *values = next;
            old_value
        };

        if old_value.as_deref() != Some(value) {
            broadcast_all(
                &self.changes,
                vec![SettingsChange {
                    key: key.to_string(),
                    old_value,
                    new_value: Some(value.to_string()),
                }],
            );
        }
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.changes.subscribe()
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let Value::Object(map) = serde_json::from_str::<Value>(&content)? else {
        return Err(Error::Config(format!(
            "Settings file {} is not a JSON object",
            path.display()
        )));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}
