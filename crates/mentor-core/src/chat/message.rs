//! Chat message type.

use serde::{Deserialize, Serialize};

/// A single line in a chat surface's log.
///
/// Messages carry no identifier beyond their position in the log; identical
/// messages may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// The message body.
    pub text: String,
    /// `true` when the student wrote it, `false` for an assistant reply.
    pub is_user_message: bool,
}

impl ChatMessage {
    /// Creates a message authored by the student.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user_message: true,
        }
    }

    /// Creates a message authored by the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user_message: false,
        }
    }
}
