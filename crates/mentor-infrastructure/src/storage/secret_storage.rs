//! Read-only access to secret.json.

use mentor_core::config::SecretConfig;
use mentor_core::error::{MentorError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage for the secret configuration file.
///
/// Never writes the file and never validates the credentials it holds.
#[derive(Debug, Clone)]
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and parses the file. A missing file is `NotFound`.
    ///
    /// Parse errors name the file but never echo its content.
    pub fn load(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Err(MentorError::not_found(
                "secret file",
                self.path.display().to_string(),
            ));
        }

        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            MentorError::config(format!(
                "Invalid JSON in {} at line {}",
                self.path.display(),
                e.line()
            ))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
