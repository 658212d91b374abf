//! Per-session interaction state
//!
//! Each interactive session owns exactly one [`SessionState`]. Nothing here is
//! global: the session actor holds the state and hands out snapshots.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use thiserror::Error;

use crate::completion::CompletionError;
use crate::prompt::TemplateError;

/// Opaque identifier for one submission. Strictly increasing per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(i64);

impl SessionId {
    /// Current time in milliseconds, bumped past `previous` if the clock has
    /// not advanced (or went backwards).
    pub fn next_after(previous: Option<SessionId>) -> Self {
        let now = Utc::now().timestamp_millis();
        match previous {
            Some(SessionId(prev)) if now <= prev => SessionId(prev + 1),
            _ => SessionId(now),
        }
    }

    /// Local wall-clock time the id was minted at
    pub fn created_at(self) -> Option<DateTime<Local>> {
        Utc.timestamp_millis_opt(self.0)
            .single()
            .map(|dt| dt.with_timezone(&Local))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a submission produced no improved email
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImproveError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl ImproveError {
    /// Message suitable for showing in place of the improved email
    pub fn user_message(&self) -> String {
        match self {
            Self::Completion(CompletionError::Auth(_)) => {
                "The completion service rejected the API key. Set OPENAI_API_KEY or run `emailsmith setup`."
                    .to_string()
            }
            Self::Completion(CompletionError::RateLimit(_)) => {
                "The completion service is rate limiting requests. Wait a moment and try again."
                    .to_string()
            }
            Self::Completion(CompletionError::TransientNetwork(detail)) => {
                format!("The completion service could not be reached ({detail}). Try again.")
            }
            other => other.to_string(),
        }
    }
}

/// Outcome of one submission
pub type CompletionResult = Result<String, ImproveError>;

#[derive(Debug, Clone)]
pub struct SessionState {
    last_result: Option<CompletionResult>,
    session_id: SessionId,
    feedback_submitted: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            last_result: None,
            session_id: SessionId::next_after(None),
            feedback_submitted: false,
        }
    }

    /// Start a new submission cycle: fresh id, feedback re-armed.
    /// Returns the new id.
    pub fn begin_submission(&mut self) -> SessionId {
        self.session_id = SessionId::next_after(Some(self.session_id));
        self.feedback_submitted = false;
        self.session_id
    }

    /// Replace the previous result wholesale
    pub fn store_result(&mut self, result: CompletionResult) {
        self.last_result = Some(result);
    }

    pub fn last_result(&self) -> Option<&CompletionResult> {
        self.last_result.as_ref()
    }

    /// Text of the last successful submission, if the last one succeeded
    pub fn improved_text(&self) -> Option<&str> {
        match self.last_result() {
            Some(Ok(text)) => Some(text),
            _ => None,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn feedback_submitted(&self) -> bool {
        self.feedback_submitted
    }

    pub fn mark_feedback_submitted(&mut self) {
        self.feedback_submitted = true;
    }

    pub fn clear_feedback_submitted(&mut self) {
        self.feedback_submitted = false;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            last_result: self.last_result.clone(),
            session_id: self.session_id,
            feedback_submitted: self.feedback_submitted,
        }
    }
}

/// Read-only copy of a session's state for the UI
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub last_result: Option<CompletionResult>,
    pub session_id: SessionId,
    pub feedback_submitted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_strictly_increase() {
        let mut previous = SessionId::next_after(None);
        for _ in 0..1000 {
            let next = SessionId::next_after(Some(previous));
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_next_after_future_id_bumps() {
        let far_future = SessionId(i64::MAX - 10);
        assert_eq!(
            SessionId::next_after(Some(far_future)),
            SessionId(i64::MAX - 9)
        );
    }

    #[test]
    fn test_begin_submission_resets_feedback() {
        let mut state = SessionState::new();
        let first = state.session_id();
        state.mark_feedback_submitted();

        let second = state.begin_submission();
        assert!(second > first);
        assert_eq!(state.session_id(), second);
        assert!(!state.feedback_submitted());
    }

    #[test]
    fn test_store_result_overwrites() {
        let mut state = SessionState::new();
        assert!(state.last_result().is_none());

        state.store_result(Ok("Dear team,".to_string()));
        assert_eq!(state.improved_text(), Some("Dear team,"));

        state.store_result(Err(ImproveError::Completion(CompletionError::RateLimit(
            "busy".into(),
        ))));
        assert!(state.improved_text().is_none());
        assert!(matches!(state.last_result(), Some(Err(_))));
    }

    #[test]
    fn test_created_at_round_trips_timestamp() {
        let id = SessionId(1_700_000_000_000);
        let created = id.created_at().unwrap();
        assert_eq!(created.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_auth_user_message_mentions_setup() {
        let err = ImproveError::Completion(CompletionError::Auth("no key".into()));
        assert!(err.user_message().contains("OPENAI_API_KEY"));
    }
}
