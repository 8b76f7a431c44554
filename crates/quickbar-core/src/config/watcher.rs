//! Settings file watcher for hot-reload support.

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use notify::Watcher;
use tracing::{debug, error, info};

use crate::{Error, Result};

const RELOAD_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Keeps the OS watcher and its bridge thread alive. Dropping it stops both.
pub(crate) struct SettingsWatcher {
    _watcher: notify::RecommendedWatcher,
    _bridge_thread: std::thread::JoinHandle<()>,
}

/// Watch the directory containing `path` and call `on_change` after writes to
/// that file settle. `on_change` returns `false` to stop watching.
pub(crate) fn spawn_settings_watcher<F>(path: &Path, on_change: F) -> Result<SettingsWatcher>
where
    F: Fn() -> bool + Send + 'static,
{
    let Some(parent) = path.parent() else {
        return Err(Error::Config(format!(
            "Invalid settings path: {}",
            path.display()
        )));
    };
    std::fs::create_dir_all(parent)?;

    let file_name = path.file_name().map(std::ffi::OsStr::to_os_string);
    let (event_tx, event_rx) = mpsc::channel::<()>();

    let mut watcher =
        notify::recommended_watcher(move |result: notify::Result<notify::Event>| match result {
            Ok(event) => match event.kind {
                notify::EventKind::Modify(_)
                | notify::EventKind::Create(_)
                | notify::EventKind::Remove(_) => {
                    if event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(std::ffi::OsStr::to_os_string) == file_name)
                    {
                        let _ = event_tx.send(());
                    }
                }
                _ => {}
            },
            Err(e) => {
                error!("Watcher error: {}", e);
            }
        })?;

    watcher.watch(parent, notify::RecursiveMode::NonRecursive)?;
    info!("Watching settings directory: {:?}", parent);

    let bridge_thread = std::thread::spawn(move || {
        while event_rx.recv().is_ok() {
            std::thread::sleep(RELOAD_SETTLE_DELAY);
            // Coalesce the burst of events a single save produces
            while event_rx.try_recv().is_ok() {}

            debug!("Settings file changed, reloading");
            if !on_change() {
                debug!("Settings store dropped, stopping watcher");
                break;
            }
        }
    });

    Ok(SettingsWatcher {
        _watcher: watcher,
        _bridge_thread: bridge_thread,
    })
}
