//! Path management for MentorBuddy files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/mentor-buddy/        # Config directory
//! ├── config.toml                # Application configuration
//! └── secret.json                # API keys (mode 600)
//!
//! ~/.local/share/mentor-buddy/   # Data directory
//! └── prefs/
//!     ├── user_prefs.toml        # Remembered username
//!     ├── TutorChatPrefs.toml    # AI tutor history
//!     └── ChatPrefs.toml         # Future Counsellor history
//! ```
//!
//! When a config directory override is given, the data directory defaults to
//! `<override>/data` so a whole installation can live under one folder.

use mentor_core::config::{GeminiConfig, SecretConfig};
use mentor_core::error::{MentorError, Result};
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "mentor-buddy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentorPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl MentorPaths {
    /// Resolves the platform directories, or the override when given.
    pub fn new(config_dir_override: Option<&Path>) -> Result<Self> {
        if let Some(base) = config_dir_override {
            return Ok(Self {
                config_dir: base.to_path_buf(),
                data_dir: base.join("data"),
            });
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| MentorError::config("Cannot find the platform config directory"))?
            .join(APP_DIR_NAME);
        let data_dir = dirs::data_dir()
            .ok_or_else(|| MentorError::config("Cannot find the platform data directory"))?
            .join(APP_DIR_NAME);

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Replaces the data directory (from `storage.data_dir` in config.toml).
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn secret_file(&self) -> PathBuf {
        self.config_dir.join("secret.json")
    }

    pub fn prefs_dir(&self) -> PathBuf {
        self.data_dir.join("prefs")
    }

    /// Ensures secret.json exists, writing an empty template if it doesn't.
    ///
    /// On Unix the file is restricted to the owner (mode 600).
    pub fn ensure_secret_file(&self) -> Result<PathBuf> {
        let secret_path = self.secret_file();
        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: None,
            }),
            firebase: None,
        };
        let content = serde_json::to_string_pretty(&template)?;
        std::fs::write(&secret_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&secret_path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!("[Paths] Created secret template at {}", secret_path.display());
        Ok(secret_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_layout() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MentorPaths::new(Some(temp_dir.path())).unwrap();

        assert_eq!(paths.config_file(), temp_dir.path().join("config.toml"));
        assert_eq!(paths.secret_file(), temp_dir.path().join("secret.json"));
        assert_eq!(paths.prefs_dir(), temp_dir.path().join("data").join("prefs"));

        let moved = paths.with_data_dir(temp_dir.path().join("elsewhere"));
        assert_eq!(moved.prefs_dir(), temp_dir.path().join("elsewhere").join("prefs"));
    }

    #[test]
    fn test_ensure_secret_file_creates_template_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MentorPaths::new(Some(temp_dir.path())).unwrap();

        let path = paths.ensure_secret_file().unwrap();
        let template: SecretConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(template.gemini.unwrap().api_key, "");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        std::fs::write(&path, r#"{"gemini":{"api_key":"kept"}}"#).unwrap();
        paths.ensure_secret_file().unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("kept"));
    }
}
