//! Application context and bootstrap.
//!
//! [`AppContext`] holds the shared preference store, identity service and
//! text generator, and is passed to every screen. [`Bootstrap`] builds one
//! from config.toml, secret.json and the environment.

use crate::auth_usecase::AuthUseCase;
use crate::dashboard::DashboardView;
use crate::exam_paper_service::ExamPaperService;
use async_trait::async_trait;
use mentor_core::chat::{ChatSession, ChatSurface};
use mentor_core::config::MentorConfig;
use mentor_core::error::{MentorError, Result};
use mentor_core::generation::TextGenerator;
use mentor_core::identity::{IdentityService, IdentityStore, InMemoryIdentityStore};
use mentor_core::preference::{InMemoryPreferenceStore, PreferenceStore};
use mentor_core::secret::SecretService;
use mentor_infrastructure::{
    ConfigService, FilePreferenceStore, MentorPaths, RealtimeIdentityStore, SecretServiceImpl,
};
use mentor_interaction::GeminiTextGenerator;
use std::path::Path;
use std::sync::Arc;

/// Shared services for one running app.
#[derive(Clone)]
pub struct AppContext {
    preferences: Arc<dyn PreferenceStore>,
    identity: IdentityService,
    generator: Arc<dyn TextGenerator>,
    file_store: Option<Arc<FilePreferenceStore>>,
}

impl AppContext {
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        identity: IdentityService,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            preferences,
            identity,
            generator,
            file_store: None,
        }
    }

    /// A context that touches neither disk nor network for storage.
    pub fn in_memory(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(
            Arc::new(InMemoryPreferenceStore::new()),
            IdentityService::new(Arc::new(InMemoryIdentityStore::new())),
            generator,
        )
    }

    fn with_file_store(mut self, file_store: Arc<FilePreferenceStore>) -> Self {
        self.file_store = Some(file_store);
        self
    }

    pub fn preferences(&self) -> &Arc<dyn PreferenceStore> {
        &self.preferences
    }

    pub fn identity(&self) -> &IdentityService {
        &self.identity
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    pub fn auth(&self) -> AuthUseCase {
        AuthUseCase::new(self.preferences.clone(), self.identity.clone())
    }

    /// Opens the chat screen for `surface`, restoring its history.
    pub fn open_chat(&self, surface: ChatSurface) -> ChatSession {
        ChatSession::load(surface, self.preferences.clone(), self.generator.clone())
    }

    pub fn exam_papers(&self) -> ExamPaperService {
        ExamPaperService::new(self.generator.clone())
    }

    pub fn dashboard(&self) -> DashboardView {
        DashboardView::load(self.preferences.as_ref())
    }

    /// Waits for pending preference writes to reach the disk.
    pub async fn shutdown(&self) {
        if let Some(store) = &self.file_store {
            if let Err(e) = store.flush().await {
                tracing::error!("[AppContext] Failed to flush preferences: {}", e);
            }
        }
    }
}

/// Stand-in generator used when no API key is configured.
///
/// Every call fails, so chats land in the failed state instead of the app
/// refusing to start.
struct UnavailableGenerator {
    reason: String,
}

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(MentorError::generation(self.reason.clone()))
    }
}

/// Resolved paths and configuration, before any service is started.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub paths: MentorPaths,
    pub config: MentorConfig,
}

impl Bootstrap {
    /// Resolves directories and loads config.toml, creating it on first run.
    pub fn load(config_dir_override: Option<&Path>) -> Result<Self> {
        let mut paths = MentorPaths::new(config_dir_override)?;
        let config = ConfigService::new(paths.config_file()).get_config();

        if let Some(data_dir) = &config.storage.data_dir {
            paths = paths.with_data_dir(data_dir.clone());
        }

        Ok(Self { paths, config })
    }

    /// Starts the services. Must run inside a tokio runtime.
    ///
    /// `offline` keeps accounts in memory even when a database is configured.
    pub async fn build_context(&self, offline: bool) -> Result<AppContext> {
        if let Err(e) = self.paths.ensure_secret_file() {
            tracing::warn!("[Bootstrap] Could not create secret template: {}", e);
        }

        let secrets = SecretServiceImpl::new(self.paths.secret_file());
        let secret_config = match secrets.load_secrets().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[Bootstrap] Ignoring unreadable secrets: {}", e);
                Default::default()
            }
        };

        let file_store = Arc::new(FilePreferenceStore::open(self.paths.prefs_dir())?);

        let identity_store: Arc<dyn IdentityStore> = match (&self.config.identity.database_url, offline) {
            (Some(url), false) => {
                tracing::info!("[Bootstrap] Using realtime database identity store");
                let token = secret_config.firebase.and_then(|f| f.auth_token);
                Arc::new(RealtimeIdentityStore::new(url.clone(), token))
            }
            _ => {
                tracing::info!("[Bootstrap] Using in-memory identity store");
                Arc::new(InMemoryIdentityStore::new())
            }
        };

        let generator: Arc<dyn TextGenerator> =
            match GeminiTextGenerator::from_secrets(&secrets, &self.config.generation).await {
                Ok(generator) => {
                    tracing::info!("[Bootstrap] Gemini model: {}", generator.model());
                    Arc::new(generator)
                }
                Err(e) => {
                    tracing::warn!("[Bootstrap] Text generation unavailable: {}", e);
                    Arc::new(UnavailableGenerator {
                        reason: e.to_string(),
                    })
                }
            };

        let preferences: Arc<dyn PreferenceStore> = file_store.clone();
        Ok(AppContext::new(preferences, IdentityService::new(identity_store), generator)
            .with_file_store(file_store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_core::chat::ChatMessage;
    use tempfile::TempDir;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("echo: {}", prompt))
        }
    }

    #[tokio::test]
    async fn test_unavailable_generator_fails_every_call() {
        let generator = UnavailableGenerator {
            reason: "no key".to_string(),
        };
        assert!(generator.generate("hi").await.unwrap_err().is_generation());
    }

    #[tokio::test]
    async fn test_chats_share_store_but_not_history() {
        let context = AppContext::in_memory(Arc::new(EchoGenerator));
        let tutor = context.open_chat(ChatSurface::Tutor);
        tutor.submit("fractions");
        tutor.settled().await;

        let counsellor = context.open_chat(ChatSurface::Counsellor);
        assert!(counsellor.messages().is_empty());
        assert_eq!(
            context.open_chat(ChatSurface::Tutor).messages(),
            vec![
                ChatMessage::user("fractions"),
                ChatMessage::assistant("echo: fractions")
            ]
        );
    }

    #[test]
    fn test_bootstrap_honours_data_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("custom-data");
        std::fs::write(
            temp_dir.path().join("config.toml"),
            format!("[storage]\ndata_dir = {:?}\n", data_dir.to_string_lossy()),
        )
        .unwrap();

        let bootstrap = Bootstrap::load(Some(temp_dir.path())).unwrap();
        assert_eq!(bootstrap.paths.prefs_dir(), data_dir.join("prefs"));
    }
}
