//! Rating the improved email

use anyhow::Result;

use crate::app::state::FeedbackState;
use crate::controller::SessionCommand;
use crate::feedback::{FeedbackEvent, Rating};

use super::super::App;

impl App {
    /// Choose a rating and open the comment popup
    pub(crate) fn start_rating(&mut self, rating: Rating) {
        match &self.state.feedback {
            FeedbackState::Pending if !self.state.phase.is_submitting() => {
                self.state.feedback = FeedbackState::Composing {
                    rating,
                    comment: String::new(),
                };
            }
            FeedbackState::Sending { .. } | FeedbackState::Sent { .. } => {
                self.state.set_status("Feedback already submitted");
            }
            _ => {
                self.state.set_status("Nothing to rate yet");
            }
        }
    }

    pub(crate) async fn send_feedback(&mut self) -> Result<()> {
        let FeedbackState::Composing { rating, comment } = &self.state.feedback else {
            return Ok(());
        };
        let rating = *rating;

        let Some(session_id) = self.state.ratable_session() else {
            self.state.feedback = FeedbackState::Unavailable;
            return Ok(());
        };
        let event = FeedbackEvent::new(session_id, rating, Some(comment.clone()));

        self.session
            .cmd_tx
            .send(SessionCommand::Feedback(event))
            .await
            .map_err(|_| anyhow::anyhow!("Session actor stopped"))?;

        self.state.feedback = FeedbackState::Sending { rating };
        self.state.set_status("Sending feedback...");
        Ok(())
    }

    pub(crate) fn cancel_feedback(&mut self) {
        if self.state.feedback.is_composing() {
            self.state.feedback = FeedbackState::Pending;
        }
    }
}
