//! Conversation domain: turns, the transcript, and the dispatcher state machine.

pub mod state;
pub mod transcript;
pub mod turn;

pub use state::{reduce, ChatAction, ChatState, IgnoreReason, OutstandingRequest, Phase};
pub use transcript::Transcript;
pub use turn::{Role, Turn};
