//! Interaction controller: one handler per user action
//!
//! [`Controller::on_submit`] and [`Controller::on_feedback`] read and write a
//! caller-owned [`SessionState`]; the controller itself holds no session data,
//! so one controller can never leak state between sessions.

mod actor;

use std::time::Instant;

use crate::completion::{CompletionClient, Temperature};
use crate::feedback::{FeedbackError, FeedbackEvent, FeedbackSink};
use crate::prompt::{self, PromptRequest, SubmitError};
use crate::session::{ImproveError, SessionState};

pub use actor::{SessionCommand, SessionEvent, SessionHandle, spawn_session_actor};

/// Why a feedback event was not forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackRejection {
    /// There is no successful response to rate
    NoResult,
    /// The event belongs to an earlier response
    StaleSession,
    /// Feedback for this response was already sent
    AlreadySubmitted,
}

impl FeedbackRejection {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoResult => "Improve an email before leaving feedback",
            Self::StaleSession => "That feedback was for an earlier response",
            Self::AlreadySubmitted => "Feedback already sent for this response",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Recorded,
    Rejected(FeedbackRejection),
    Failed(FeedbackError),
}

pub struct Controller<C, F> {
    client: C,
    sink: F,
    api_key: String,
}

impl<C: CompletionClient, F: FeedbackSink> Controller<C, F> {
    /// An absent key is kept as empty; the client reports it as an auth error.
    pub fn new(client: C, sink: F, api_key: Option<String>) -> Self {
        Self {
            client,
            sink,
            api_key: api_key.unwrap_or_default(),
        }
    }

    /// Handle one press of the improve action.
    ///
    /// Invalid temperatures are refused before the session is touched.
    /// Otherwise the session gets a new id, feedback is re-armed, and the
    /// result (success or error) replaces the previous one.
    pub async fn on_submit(
        &self,
        session: &mut SessionState,
        request: PromptRequest,
        temperature: f32,
    ) -> Result<(), SubmitError> {
        let temperature = Temperature::new(temperature)?;

        let session_id = session.begin_submission();
        tracing::info!(
            %session_id,
            tone = %request.tone(),
            dialect = %request.dialect(),
            %temperature,
            email_chars = request.email_body().chars().count(),
            "Improving email"
        );

        let started = Instant::now();
        let result = match prompt::render(&request) {
            Ok(rendered) => self
                .client
                .complete(&rendered, temperature, &self.api_key)
                .await
                .map_err(ImproveError::from),
            Err(e) => Err(ImproveError::from(e)),
        };

        match &result {
            Ok(text) => tracing::info!(
                %session_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                response_chars = text.chars().count(),
                "Email improved"
            ),
            Err(e) => tracing::warn!(
                %session_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Improvement failed: {}",
                e
            ),
        }

        session.store_result(result);
        Ok(())
    }

    /// Forward a rating for the current response, at most once per session id
    pub async fn on_feedback(
        &self,
        session: &mut SessionState,
        event: FeedbackEvent,
    ) -> FeedbackOutcome {
        if session.improved_text().is_none() {
            return FeedbackOutcome::Rejected(FeedbackRejection::NoResult);
        }
        if event.session_id != session.session_id() {
            tracing::debug!(
                event_session = %event.session_id,
                current_session = %session.session_id(),
                "Dropping feedback for earlier response"
            );
            return FeedbackOutcome::Rejected(FeedbackRejection::StaleSession);
        }
        if session.feedback_submitted() {
            return FeedbackOutcome::Rejected(FeedbackRejection::AlreadySubmitted);
        }

        session.mark_feedback_submitted();
        match self.sink.record(&event).await {
            Ok(()) => FeedbackOutcome::Recorded,
            Err(e) => {
                tracing::warn!(session_id = %event.session_id, "Feedback not delivered: {}", e);
                session.clear_feedback_submitted();
                FeedbackOutcome::Failed(e)
            }
        }
    }
}
