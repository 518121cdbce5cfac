//! Text generation service trait.

use crate::error::Result;

/// A black-box generative text service: prompt in, text out.
///
/// Calls may take arbitrarily long and carry no built-in timeout or retry.
/// Any failure is reported as [`crate::MentorError::Generation`]; deciding how
/// to recover is the caller's job.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` verbatim and returns the generated text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
