//! Chat surfaces and their persistence namespaces.

use serde::{Deserialize, Serialize};

/// Key under which each surface stores its serialized log.
pub const MESSAGES_KEY: &str = "messages";

/// One independent conversational screen with its own persisted log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatSurface {
    /// General study help ("AI tutor").
    Tutor,
    /// Career and study-path guidance ("Future Counsellor").
    Counsellor,
}

impl ChatSurface {
    pub const ALL: [ChatSurface; 2] = [ChatSurface::Tutor, ChatSurface::Counsellor];

    /// Preference namespace holding this surface's history.
    pub fn namespace(&self) -> &'static str {
        match self {
            ChatSurface::Tutor => "TutorChatPrefs",
            ChatSurface::Counsellor => "ChatPrefs",
        }
    }

    /// Title shown in the surface's top bar.
    pub fn title(&self) -> &'static str {
        match self {
            ChatSurface::Tutor => "AI tutor",
            ChatSurface::Counsellor => "Future Counsellor",
        }
    }
}

impl std::fmt::Display for ChatSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_are_distinct() {
        assert_ne!(
            ChatSurface::Tutor.namespace(),
            ChatSurface::Counsellor.namespace()
        );
    }
}
