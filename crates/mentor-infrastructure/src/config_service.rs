//! Configuration service.
//!
//! Loads `config.toml` through the atomic TOML layer, writing defaults on
//! first run, and caches the result.

use crate::storage::AtomicTomlFile;
use mentor_core::config::MentorConfig;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<MentorConfig>>,
    /// Lazily loaded configuration.
    config: Arc<RwLock<Option<MentorConfig>>>,
}

impl ConfigService {
    pub fn new(config_file: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(config_file)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// An unreadable file falls back to defaults with a warning; the file is
    /// left untouched so the user can fix it.
    pub fn get_config(&self) -> MentorConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = match self.file.load_or_create(MentorConfig::default()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "[ConfigService] Using defaults, failed to load {}: {}",
                    self.file.path().display(),
                    e
                );
                MentorConfig::default()
            }
        };

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_run_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::new(path.clone());

        assert_eq!(service.get_config(), MentorConfig::default());
        assert!(path.exists());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("gemini-1.5-flash"));
    }

    #[test]
    fn test_cache_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let service = ConfigService::new(path.clone());
        assert_eq!(service.get_config().logging.level, "debug");

        std::fs::write(&path, "[logging]\nlevel = \"info\"\n").unwrap();
        assert_eq!(service.get_config().logging.level, "debug");

        service.invalidate_cache();
        assert_eq!(service.get_config().logging.level, "info");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[logging\nlevel = ").unwrap();

        let service = ConfigService::new(path.clone());
        assert_eq!(service.get_config(), MentorConfig::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[logging\nlevel = ");
    }
}
