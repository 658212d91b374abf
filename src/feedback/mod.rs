//! Feedback collection for generated emails
//!
//! Ratings are forwarded to an external logging service ([`TrubricsSink`]) or,
//! when no credentials are configured, written to the local log ([`LogSink`]).

mod trubrics;

use std::fmt;
use std::future::Future;

use thiserror::Error;

use crate::session::SessionId;

pub use trubrics::TrubricsSink;

/// Binary rating for one generated result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Up,
    Down,
}

impl Rating {
    /// Score string the feedback service expects for thumbs feedback
    pub fn score(self) -> &'static str {
        match self {
            Self::Up => "👍",
            Self::Down => "👎",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "thumbs up",
            Self::Down => "thumbs down",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user's rating of the response produced under `session_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEvent {
    pub session_id: SessionId,
    pub rating: Rating,
    pub comment: Option<String>,
}

impl FeedbackEvent {
    /// Blank comments are dropped
    pub fn new(session_id: SessionId, rating: Rating, comment: Option<String>) -> Self {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self {
            session_id,
            rating,
            comment,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("feedback service rejected credentials: {0}")]
    Auth(String),
    #[error("feedback service unreachable: {0}")]
    Network(String),
    #[error("feedback service error ({status}): {message}")]
    Service { status: u16, message: String },
}

/// Destination for feedback events. Failures must never be fatal to callers.
pub trait FeedbackSink: Send + Sync {
    fn record(
        &self,
        event: &FeedbackEvent,
    ) -> impl Future<Output = Result<(), FeedbackError>> + Send;
}

/// Writes feedback to the tracing log only
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    async fn record(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        tracing::info!(
            session_id = %event.session_id,
            rating = %event.rating,
            has_comment = event.comment.is_some(),
            "Feedback recorded locally"
        );
        Ok(())
    }
}

/// Feedback sink selected at startup
pub enum FeedbackBackend {
    Trubrics(TrubricsSink),
    Log(LogSink),
}

impl FeedbackBackend {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Trubrics(_))
    }
}

impl FeedbackSink for FeedbackBackend {
    async fn record(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        match self {
            Self::Trubrics(sink) => sink.record(event).await,
            Self::Log(sink) => sink.record(event).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_comment_is_dropped() {
        let id = SessionId::next_after(None);
        assert_eq!(
            FeedbackEvent::new(id, Rating::Up, Some("   ".into())).comment,
            None
        );
        assert_eq!(
            FeedbackEvent::new(id, Rating::Down, Some(" too stiff ".into())).comment,
            Some("too stiff".to_string())
        );
    }

    #[test]
    fn test_rating_scores() {
        assert_eq!(Rating::Up.score(), "👍");
        assert_eq!(Rating::Down.score(), "👎");
    }

    #[tokio::test]
    async fn test_log_sink_always_succeeds() {
        let backend = FeedbackBackend::Log(LogSink);
        assert!(!backend.is_remote());
        let event = FeedbackEvent::new(SessionId::next_after(None), Rating::Up, None);
        assert_eq!(backend.record(&event).await, Ok(()));
    }
}
