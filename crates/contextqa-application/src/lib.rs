//! Application layer for the ContextQA client.
//!
//! Coordinates the session store and the backend into the three use cases
//! a front end drives:
//!
//! 1. [`UploadInitiator`]: file selection → new session in the store
//! 2. [`SessionGuard`]: store → access decision for the chat surface
//! 3. [`MessageDispatcher`]: user input ⇄ backend ⇄ transcript
//!
//! None of them know anything about how state is painted.

pub mod message_dispatcher;
pub mod session_guard;
pub mod upload_initiator;

pub use message_dispatcher::{MessageDispatcher, SubmitOutcome};
pub use session_guard::{start_new_upload, GuardDecision, SessionGuard};
pub use upload_initiator::{UploadInitiator, UploadStatus};
