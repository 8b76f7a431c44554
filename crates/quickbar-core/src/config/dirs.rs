use directories::ProjectDirs;
use std::path::PathBuf;

use crate::{Error, Result};

/// Application directories following the platform conventions.
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/quickbar)
    pub config: PathBuf,

    /// Settings file path
    pub settings_file: PathBuf,
}

impl Directories {
    /// Resolve the standard project directories.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "quickbar").ok_or_else(|| {
            Error::Config("Failed to determine project directories".to_string())
        })?;
        Ok(Self::with_base(project.config_dir().to_path_buf()))
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            settings_file: base.join("settings.json"),
            config: base,
        }
    }
}
