//! Dispatcher state and its pure reducer.
//!
//! The chat surface owns exactly one [`ChatState`]. Every mutation goes
//! through [`reduce`], so the transition table lives in one place:
//!
//! | phase     | action           | guard                                   | effect                                  |
//! |-----------|------------------|-----------------------------------------|-----------------------------------------|
//! | `Idle`    | `EditDraft`      | -                                       | replace draft                           |
//! | `Idle`    | `Submit`         | session present, trimmed draft nonempty | clear draft, push user turn, `Sending`  |
//! | `Sending` | `Submit`         | -                                       | ignored                                 |
//! | `Sending` | `ResolveSuccess` | seq matches                             | push normalized answer, `Idle`          |
//! | `Sending` | `ResolveFailure` | seq matches                             | push failure message, `Idle`            |
//! | `Idle`    | `Resolve*`       | -                                       | ignored                                 |

use super::transcript::Transcript;
use super::turn::Turn;
use crate::content::normalize_assistant_content;
use crate::session::SessionId;

/// Request phase of the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No request outstanding; submissions are accepted.
    Idle,
    /// One chat request is in flight.
    Sending {
        /// Sequence number of the outstanding request.
        seq: u64,
        /// Trimmed message that was sent.
        message: String,
    },
}

/// Input to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    /// Replace the input draft.
    EditDraft(String),
    /// Send the current draft.
    Submit,
    /// The outstanding request `seq` returned an answer.
    ResolveSuccess { seq: u64, answer: String },
    /// The outstanding request `seq` failed; `message` is already user-facing.
    ResolveFailure { seq: u64, message: String },
}

/// Why a submission was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A request is already outstanding.
    Busy,
    /// The trimmed draft is empty.
    EmptyInput,
    /// No session identifier is bound to the surface.
    NoSession,
    /// The surface has been torn down.
    Closed,
}

/// The request a `Submit` just started, as the dispatcher needs to issue it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingRequest {
    pub seq: u64,
    pub session_id: SessionId,
    pub message: String,
}

/// Complete state of the chat surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    session_id: Option<SessionId>,
    draft: String,
    phase: Phase,
    transcript: Transcript,
    request_seq: u64,
}

impl ChatState {
    pub fn new(session_id: Option<SessionId>) -> Self {
        Self {
            session_id,
            draft: String::new(),
            phase: Phase::Idle,
            transcript: Transcript::new(),
            request_seq: 0,
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.phase, Phase::Sending { .. })
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Number of requests started so far.
    pub fn request_seq(&self) -> u64 {
        self.request_seq
    }

    /// Checks whether `Submit` would fire right now.
    pub fn submit_readiness(&self) -> Result<(), IgnoreReason> {
        if self.is_sending() {
            return Err(IgnoreReason::Busy);
        }
        if self.session_id.is_none() {
            return Err(IgnoreReason::NoSession);
        }
        if self.draft.trim().is_empty() {
            return Err(IgnoreReason::EmptyInput);
        }
        Ok(())
    }

    /// The request currently in flight, if any.
    pub fn outstanding(&self) -> Option<OutstandingRequest> {
        match (&self.phase, &self.session_id) {
            (Phase::Sending { seq, message }, Some(session_id)) => Some(OutstandingRequest {
                seq: *seq,
                session_id: session_id.clone(),
                message: message.clone(),
            }),
            _ => None,
        }
    }

    fn resolves(&self, seq: u64) -> bool {
        matches!(self.phase, Phase::Sending { seq: current, .. } if current == seq)
    }
}

/// Applies `action` to `state`, returning the next state.
///
/// Actions whose guard fails return an unchanged copy.
pub fn reduce(state: &ChatState, action: ChatAction) -> ChatState {
    let mut next = state.clone();
    match action {
        ChatAction::EditDraft(text) => {
            next.draft = text;
        }
        ChatAction::Submit => {
            if state.submit_readiness().is_err() {
                return next;
            }
            let message = next.draft.trim().to_string();
            next.draft.clear();
            next.transcript.push(Turn::user(message.clone()));
            next.request_seq += 1;
            next.phase = Phase::Sending {
                seq: next.request_seq,
                message,
            };
        }
        ChatAction::ResolveSuccess { seq, answer } => {
            if !state.resolves(seq) {
                return next;
            }
            next.transcript
                .push(Turn::assistant(normalize_assistant_content(&answer)));
            next.phase = Phase::Idle;
        }
        ChatAction::ResolveFailure { seq, message } => {
            if !state.resolves(seq) {
                return next;
            }
            next.transcript.push(Turn::assistant(message));
            next.phase = Phase::Idle;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    fn session() -> Option<SessionId> {
        SessionId::parse("s-001")
    }

    fn submit(state: &ChatState, text: &str) -> ChatState {
        let drafted = reduce(state, ChatAction::EditDraft(text.to_string()));
        reduce(&drafted, ChatAction::Submit)
    }

    #[test]
    fn test_submit_appends_user_turn_and_starts_sending() {
        let state = ChatState::new(session());
        let next = submit(&state, "  What is the refund policy?  ");

        assert_eq!(next.transcript().len(), 1);
        assert_eq!(next.transcript().turns()[0], Turn::user("What is the refund policy?"));
        assert_eq!(next.draft(), "");
        assert_eq!(
            next.outstanding(),
            Some(OutstandingRequest {
                seq: 1,
                session_id: SessionId::parse("s-001").unwrap(),
                message: "What is the refund policy?".to_string(),
            })
        );
    }

    #[test]
    fn test_submit_while_sending_is_ignored() {
        let sending = submit(&ChatState::new(session()), "first");
        let drafted = reduce(&sending, ChatAction::EditDraft("second".to_string()));

        assert_eq!(drafted.submit_readiness(), Err(IgnoreReason::Busy));
        let after = reduce(&drafted, ChatAction::Submit);
        assert_eq!(after, drafted);
        assert_eq!(after.transcript().len(), 1);
        assert_eq!(after.request_seq(), 1);
    }

    #[test]
    fn test_submit_requires_session_and_text() {
        let no_session = ChatState::new(None);
        let drafted = reduce(&no_session, ChatAction::EditDraft("hello".to_string()));
        assert_eq!(drafted.submit_readiness(), Err(IgnoreReason::NoSession));
        assert!(reduce(&drafted, ChatAction::Submit).transcript().is_empty());

        let blank = reduce(&ChatState::new(session()), ChatAction::EditDraft(" \t ".to_string()));
        assert_eq!(blank.submit_readiness(), Err(IgnoreReason::EmptyInput));
        let after = reduce(&blank, ChatAction::Submit);
        assert!(after.transcript().is_empty());
        // The draft is left alone when nothing was sent
        assert_eq!(after.draft(), " \t ");
    }

    #[test]
    fn test_success_normalizes_and_returns_to_idle() {
        let sending = submit(&ChatState::new(session()), "compute");
        let done = reduce(
            &sending,
            ChatAction::ResolveSuccess {
                seq: 1,
                answer: "\\(x+1\\)".to_string(),
            },
        );

        assert_eq!(*done.phase(), Phase::Idle);
        assert_eq!(done.transcript().last(), Some(&Turn::assistant("$x+1$")));
    }

    #[test]
    fn test_failure_becomes_an_assistant_turn() {
        let sending = submit(&ChatState::new(session()), "hello");
        let done = reduce(
            &sending,
            ChatAction::ResolveFailure {
                seq: 1,
                message: "session expired".to_string(),
            },
        );

        assert_eq!(*done.phase(), Phase::Idle);
        assert_eq!(done.transcript().count(Role::User), 1);
        assert_eq!(done.transcript().last(), Some(&Turn::assistant("session expired")));

        // The conversation continues after a failure
        let again = submit(&done, "hello again");
        assert!(again.is_sending());
        assert_eq!(again.outstanding().unwrap().seq, 2);
    }

    #[test]
    fn test_stale_and_idle_resolutions_are_ignored() {
        let idle = ChatState::new(session());
        let unchanged = reduce(
            &idle,
            ChatAction::ResolveSuccess {
                seq: 1,
                answer: "late".to_string(),
            },
        );
        assert_eq!(unchanged, idle);

        let sending = submit(&idle, "q");
        let stale = reduce(
            &sending,
            ChatAction::ResolveFailure {
                seq: 7,
                message: "stale".to_string(),
            },
        );
        assert_eq!(stale, sending);
    }

    #[test]
    fn test_assistant_count_never_exceeds_user_count() {
        let mut state = ChatState::new(session());
        for i in 0..5 {
            state = submit(&state, &format!("question {i}"));
            // A second submit and a duplicate resolution must not add turns
            state = submit(&state, "dropped");
            let seq = state.request_seq();
            state = reduce(
                &state,
                ChatAction::ResolveSuccess {
                    seq,
                    answer: format!("answer {i}"),
                },
            );
            state = reduce(
                &state,
                ChatAction::ResolveSuccess {
                    seq,
                    answer: "duplicate".to_string(),
                },
            );
            let users = state.transcript().count(Role::User);
            let assistants = state.transcript().count(Role::Assistant);
            assert!(assistants <= users);
            assert!(users - assistants <= 1);
        }
        assert_eq!(state.transcript().len(), 10);
    }
}
