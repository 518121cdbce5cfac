//! Application configuration (`config.toml`) and secret (`secret.json`) shapes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Root of `config.toml`. Every section falls back to its defaults.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorConfig {
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub identity: IdentitySettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

/// Where accounts live. Without a `database_url` the app runs with an
/// in-memory store.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Root of `secret.json`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase: Option<FirebaseConfig>,
}

/// Gemini API credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Realtime database credentials.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FirebaseConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: MentorConfig = toml::from_str("").unwrap();
        assert_eq!(config, MentorConfig::default());
        assert_eq!(config.generation.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.logging.level, "warn");
        assert!(config.identity.database_url.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: MentorConfig = toml::from_str(
            r#"
            [generation]
            model = "gemini-1.5-pro"

            [identity]
            database_url = "https://mentor.firebaseio.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.model, "gemini-1.5-pro");
        assert_eq!(config.generation.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(
            config.identity.database_url.as_deref(),
            Some("https://mentor.firebaseio.com")
        );
    }

    #[test]
    fn test_secret_json_shape() {
        let secrets: SecretConfig =
            serde_json::from_str(r#"{"gemini":{"api_key":"k"}}"#).unwrap();
        let gemini = secrets.gemini.unwrap();
        assert_eq!(gemini.api_key, "k");
        assert!(gemini.model_name.is_none());
        assert!(secrets.firebase.is_none());
    }
}
