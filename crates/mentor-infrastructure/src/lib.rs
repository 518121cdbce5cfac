pub mod config_service;
pub mod dto;
pub mod file_preference_store;
pub mod paths;
pub mod realtime_identity_store;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_preference_store::FilePreferenceStore;
pub use crate::paths::MentorPaths;
pub use crate::realtime_identity_store::RealtimeIdentityStore;
pub use crate::secret_service::SecretServiceImpl;
