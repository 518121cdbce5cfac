//! Secret management service trait.

use crate::config::SecretConfig;
use crate::error::Result;

/// Loads API credentials from secure storage.
///
/// Implementations must keep secret files private (mode 600 on Unix) and
/// never include secret values in logs or error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    async fn load_secrets(&self) -> Result<SecretConfig>;

    async fn secret_file_exists(&self) -> bool;
}
