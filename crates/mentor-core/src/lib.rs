pub mod chat;
pub mod config;
pub mod error;
pub mod generation;
pub mod identity;
pub mod preference;
pub mod secret;
pub mod subject;

// Re-export common error type
pub use error::{MentorError, Result};
