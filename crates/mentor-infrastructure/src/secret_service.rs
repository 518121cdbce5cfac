//! Secret service implementation.
//!
//! Credentials come from secret.json, with environment variables taking
//! precedence so deployments can avoid writing keys to disk.

use crate::storage::SecretStorage;
use mentor_core::config::{FirebaseConfig, GeminiConfig, SecretConfig};
use mentor_core::error::Result;
use mentor_core::secret::SecretService;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const FIREBASE_AUTH_TOKEN_ENV: &str = "FIREBASE_AUTH_TOKEN";

/// Loads and caches secrets from secret.json plus environment overrides.
#[derive(Clone)]
pub struct SecretServiceImpl {
    storage: SecretStorage,
    /// Lazily loaded secrets.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(secret_file: PathBuf) -> Self {
        Self {
            storage: SecretStorage::with_path(secret_file),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig> {
        {
            let read_lock = self.secrets.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let from_file = match self.storage.load() {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                tracing::debug!("[SecretService] No secret file at {}", self.storage.path().display());
                SecretConfig::default()
            }
            Err(e) => return Err(e),
        };
        let loaded = apply_env_overrides(from_file, |name| std::env::var(name).ok());

        {
            let mut write_lock = self.secrets.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.storage.path().exists()
    }
}

/// Overlays non-empty environment values onto `config`.
pub fn apply_env_overrides<F>(mut config: SecretConfig, lookup: F) -> SecretConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(api_key) = non_empty(GEMINI_API_KEY_ENV) {
        match config.gemini.as_mut() {
            Some(gemini) => gemini.api_key = api_key,
            None => {
                config.gemini = Some(GeminiConfig {
                    api_key,
                    model_name: None,
                })
            }
        }
    }

    if let Some(token) = non_empty(FIREBASE_AUTH_TOKEN_ENV) {
        config
            .firebase
            .get_or_insert_with(FirebaseConfig::default)
            .auth_token = Some(token);
    }

    config
}
