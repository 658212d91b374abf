//! Action handlers for user input
//!
//! This module is split into focused submodules:
//! - `form`: Focus movement, selectors, slider and text editing
//! - `improve`: Submitting the email for improvement
//! - `feedback`: Rating the improved email

mod feedback;
mod form;
mod improve;

use anyhow::Result;

use crate::constants::OUTPUT_PAGE_LINES;
use crate::input::Action;

use super::App;

impl App {
    pub(crate) async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            // Form navigation
            Action::NextField => self.state.form.focus = self.state.form.focus.next(),
            Action::PrevField => self.state.form.focus = self.state.form.focus.prev(),
            Action::Left => self.state.form.step_focused(false),
            Action::Right => self.state.form.step_focused(true),
            Action::Back => self.go_back(),

            // Output pane
            Action::ScrollUp => self.state.scroll_output(-OUTPUT_PAGE_LINES),
            Action::ScrollDown => self.state.scroll_output(OUTPUT_PAGE_LINES),

            Action::Improve => self.improve().await?,

            // Feedback
            Action::RateUp => self.start_rating(crate::feedback::Rating::Up),
            Action::RateDown => self.start_rating(crate::feedback::Rating::Down),
            Action::SendFeedback => self.send_feedback().await?,
            Action::CancelFeedback => self.cancel_feedback(),

            Action::Quit => {} // Handled in event loop
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::app::state::{FeedbackState, Focus, Phase};
    use crate::controller::{FeedbackRejection, SessionCommand, SessionEvent};
    use crate::feedback::Rating;
    use crate::input::Action;
    use crate::prompt::{Dialect, Tone};
    use crate::session::SessionState;

    fn succeeded(app: &mut App) -> SessionState {
        let mut session = SessionState::new();
        session.begin_submission();
        session.store_result(Ok("Dear team,".to_string()));
        app.apply_session_event(SessionEvent::Completed(session.snapshot()));
        session
    }

    #[tokio::test]
    async fn test_improve_sends_form_values() {
        let (mut app, mut cmd_rx, _events) = App::with_channels();
        app.state.form.tone = Tone::Informal;
        app.state.form.dialect = Dialect::American;
        for c in "hi bob".chars() {
            app.handle_char(c);
        }

        app.handle_action(Action::Improve).await.unwrap();
        assert!(app.state.phase.is_submitting());

        match cmd_rx.try_recv().unwrap() {
            SessionCommand::Submit {
                request,
                temperature,
            } => {
                assert_eq!(request.tone(), Tone::Informal);
                assert_eq!(request.dialect(), Dialect::American);
                assert_eq!(request.email_body(), "hi bob");
                assert_eq!(temperature, 0.5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_improve_refused_while_in_flight() {
        let (mut app, mut cmd_rx, _events) = App::with_channels();

        app.handle_action(Action::Improve).await.unwrap();
        app.handle_action(Action::Improve).await.unwrap();

        assert!(cmd_rx.try_recv().is_ok());
        assert!(cmd_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_rating_requires_successful_result() {
        let (mut app, mut cmd_rx, _events) = App::with_channels();

        app.handle_action(Action::RateUp).await.unwrap();
        assert_eq!(app.state.feedback, FeedbackState::Unavailable);
        app.handle_action(Action::SendFeedback).await.unwrap();
        assert!(cmd_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_feedback_flow_tags_session() {
        let (mut app, mut cmd_rx, _events) = App::with_channels();
        let session = succeeded(&mut app);

        app.handle_action(Action::RateDown).await.unwrap();
        assert!(app.state.feedback.is_composing());

        // Typing goes to the comment, not the email
        for c in "too stiff".chars() {
            app.handle_char(c);
        }
        assert!(app.state.form.email.is_empty());

        app.handle_action(Action::SendFeedback).await.unwrap();
        assert_eq!(
            app.state.feedback,
            FeedbackState::Sending {
                rating: Rating::Down
            }
        );

        match cmd_rx.try_recv().unwrap() {
            SessionCommand::Feedback(event) => {
                assert_eq!(event.session_id, session.session_id());
                assert_eq!(event.rating, Rating::Down);
                assert_eq!(event.comment.as_deref(), Some("too stiff"));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        app.apply_session_event(SessionEvent::FeedbackRecorded(session.snapshot()));
        assert_eq!(
            app.state.feedback,
            FeedbackState::Sent {
                rating: Rating::Down
            }
        );

        // Second rating is refused locally
        app.handle_action(Action::RateUp).await.unwrap();
        assert_eq!(
            app.state.feedback,
            FeedbackState::Sent {
                rating: Rating::Down
            }
        );
    }

    #[tokio::test]
    async fn test_cancel_feedback_keeps_it_pending() {
        let (mut app, _cmd_rx, _events) = App::with_channels();
        succeeded(&mut app);

        app.handle_action(Action::RateUp).await.unwrap();
        app.handle_action(Action::CancelFeedback).await.unwrap();
        assert_eq!(app.state.feedback, FeedbackState::Pending);
    }

    #[test]
    fn test_rejected_feedback_rearms_widget() {
        let (mut app, _cmd_rx, _events) = App::with_channels();
        succeeded(&mut app);
        app.state.feedback = FeedbackState::Sending { rating: Rating::Up };

        app.apply_session_event(SessionEvent::FeedbackRejected(
            FeedbackRejection::StaleSession,
        ));
        assert_eq!(app.state.feedback, FeedbackState::Pending);
    }

    #[test]
    fn test_typing_outside_email_is_ignored() {
        let (mut app, _cmd_rx, _events) = App::with_channels();
        app.state.form.focus = Focus::Temperature;
        app.handle_char('x');
        app.handle_backspace();
        assert!(app.state.form.email.is_empty());

        app.go_back();
        assert_eq!(app.state.form.focus, Focus::Email);
    }

    #[test]
    fn test_completion_clears_submitting() {
        let (mut app, _cmd_rx, _events) = App::with_channels();
        app.state.phase = Phase::Submitting {
            since: std::time::Instant::now(),
        };
        succeeded(&mut app);
        assert_eq!(app.state.phase, Phase::Succeeded);
        assert_eq!(app.state.feedback, FeedbackState::Pending);
    }
}
