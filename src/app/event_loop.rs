//! Main event loop and session event processing

use anyhow::Result;
use crossterm::event;
use std::time::Duration;

use crate::controller::SessionEvent;
use crate::input::{InputResult, handle_input};
use crate::session::ImproveError;

use super::App;
use super::render_thread::RenderThread;
use super::state::{FeedbackState, Phase};

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Process session events FIRST (non-blocking)
            if self.process_session_events() {
                self.dirty = true;
            }

            // Clear expired errors
            if self.state.clear_error_if_expired() {
                self.dirty = true;
            }

            // Render only when dirty (non-blocking - sends to render thread)
            if self.dirty {
                render_thread.render(self.state.clone());
                self.dirty = false;
            }

            // Poll faster while an actor reply is due; the render thread animates the spinner
            let poll_timeout = if self.state.is_animating() {
                50
            } else {
                150
            };
            if event::poll(Duration::from_millis(poll_timeout))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.state, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => {
                        self.state.acknowledge_error();
                        self.handle_action(action).await?;
                    }
                    InputResult::Char(c) => {
                        self.state.acknowledge_error();
                        self.handle_char(c);
                    }
                    InputResult::Backspace => {
                        self.state.acknowledge_error();
                        self.handle_backspace();
                    }
                    InputResult::Newline => {
                        self.state.acknowledge_error();
                        self.handle_char('\n');
                    }
                    InputResult::Continue => {}
                }
            }
        }

        Ok(())
    }

    /// Drain events from the session actor. Returns true if any were processed.
    pub(crate) fn process_session_events(&mut self) -> bool {
        let mut had_events = false;

        while let Ok(event) = self.session.event_rx.try_recv() {
            had_events = true;
            self.apply_session_event(event);
        }

        had_events
    }

    pub(crate) fn apply_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Completed(snapshot) => {
                let message = match &snapshot.last_result {
                    Some(Ok(_)) => "Email improved. Rate it with Ctrl+U / Ctrl+D".to_string(),
                    Some(Err(ImproveError::Completion(e))) if e.is_transient() => {
                        "Improvement failed; press Ctrl+S to try again".to_string()
                    }
                    _ => "Improvement failed".to_string(),
                };
                self.state.apply_completion(snapshot);
                self.state.set_status(message);
            }
            SessionEvent::SubmitRejected(e) => {
                tracing::debug!("Submission rejected: {}", e);
                self.state.phase = Phase::Idle;
                self.state.set_error(e);
            }
            SessionEvent::FeedbackRecorded(snapshot) => {
                let rating = match &self.state.feedback {
                    FeedbackState::Sending { rating } => Some(*rating),
                    _ => None,
                };
                if let Some(rating) = rating
                    && self.state.ratable_session() == Some(snapshot.session_id)
                {
                    self.state.feedback = FeedbackState::Sent { rating };
                }
                self.state.set_status(if self.state.remote_feedback {
                    "Thanks for your feedback!"
                } else {
                    "Feedback saved to the local log"
                });
            }
            SessionEvent::FeedbackRejected(reason) => {
                // Only the response on screen can be rated; fall back to waiting
                if matches!(self.state.feedback, FeedbackState::Sending { .. }) {
                    self.state.feedback = FeedbackState::Pending;
                }
                self.state.set_status(reason.message());
            }
            SessionEvent::FeedbackFailed(e) => {
                if matches!(self.state.feedback, FeedbackState::Sending { .. }) {
                    self.state.feedback = FeedbackState::Pending;
                }
                self.state.set_error(format!("Feedback not sent: {}", e));
            }
        }
    }
}
