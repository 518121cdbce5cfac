//! JSON encoding of chat logs for the preference store.
//!
//! The persisted shape is a plain array:
//!
//! ```text
//! [{"text":"What is a prime?","isUserMessage":true},{"text":"...","isUserMessage":false}]
//! ```

use super::message::ChatMessage;
use crate::error::{MentorError, Result};

/// Serializes a chat log to its persisted JSON form.
pub fn encode(messages: &[ChatMessage]) -> Result<String> {
    Ok(serde_json::to_string(messages)?)
}

/// Deserializes a persisted chat log.
///
/// Absent, empty or whitespace-only input yields an empty log. Anything else
/// that is not a JSON array of messages is a [`MentorError::Decode`].
pub fn decode(raw: Option<&str>) -> Result<Vec<ChatMessage>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(raw).map_err(|e| MentorError::decode(e.to_string()))
}
