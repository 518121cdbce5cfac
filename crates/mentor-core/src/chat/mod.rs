//! Chat surfaces: message model, log codec and the session state machine.

pub mod codec;
mod message;
mod session;
mod surface;

pub use message::ChatMessage;
pub use session::{
    ChatSession, REPLY_FAILED_NOTICE, SessionSnapshot, SessionStatus, SubmitOutcome,
};
pub use surface::{ChatSurface, MESSAGES_KEY};
