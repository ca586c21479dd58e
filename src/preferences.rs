use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences from {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid preferences file {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("failed to create config directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write preferences to {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Slot count of the demo buffer.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Print the physical head/tail slots after each step.
    #[serde(default = "default_show_indices")]
    pub show_indices: bool,
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_capacity() -> usize { 4 }
pub const MAX_CAPACITY: usize = 1 << 20;
fn default_show_indices() -> bool { true }
fn default_log_filter() -> String { "info".into() }

impl Default for Preferences {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            show_indices: default_show_indices(),
            log_filter: default_log_filter(),
        }
    }
}

impl Preferences {
    /// Linux → ~/.config/ringdeque/, Windows → AppData/Local/ringdeque/
    fn config_dir() -> PathBuf {
        dirs::config_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ringdeque")
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("preferences.json")
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PreferencesError::Read { path: path.to_path_buf(), source });
            }
        };
        let mut prefs: Self = serde_json::from_str(&contents)
            .map_err(|source| PreferencesError::Parse { path: path.to_path_buf(), source })?;
        prefs.sanitize();
        Ok(prefs)
    }

    /// Clamp all fields to usable values.
    pub fn sanitize(&mut self) {
        self.capacity = self.capacity.clamp(1, MAX_CAPACITY);
        if self.log_filter.trim().is_empty() {
            self.log_filter = default_log_filter();
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|source| PreferencesError::CreateDir { path: dir.to_path_buf(), source })?;

            // Restrictive permissions on the config directory (Unix only)
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let _ = fs::set_permissions(dir, fs::Permissions::from_mode(0o700));
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|source| PreferencesError::Write { path: path.to_path_buf(), source })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
        }
        Ok(())
    }
}
