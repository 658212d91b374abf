//! Application state types
//!
//! All state types live here to maintain clean dependency:
//! UI layer imports from app layer, not vice versa.

use std::time::Instant;

use crate::constants::{
    ERROR_TTL_SECS, MAX_EMAIL_CHARS, MAX_FEEDBACK_COMMENT_CHARS, TEMPERATURE_STEP,
};
use crate::feedback::Rating;
use crate::prompt::{Dialect, Tone};
use crate::session::SessionSnapshot;

/// Form control that receives input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    Tone,
    Dialect,
    Temperature,
    #[default]
    Email,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::Tone => Self::Dialect,
            Self::Dialect => Self::Temperature,
            Self::Temperature => Self::Email,
            Self::Email => Self::Tone,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Tone => Self::Email,
            Self::Dialect => Self::Tone,
            Self::Temperature => Self::Dialect,
            Self::Email => Self::Temperature,
        }
    }
}

/// Current values of the form controls
#[derive(Debug, Clone)]
pub struct FormState {
    pub tone: Tone,
    pub dialect: Dialect,
    pub temperature: f32,
    pub email: String,
    pub focus: Focus,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            dialect: Dialect::default(),
            temperature: crate::constants::DEFAULT_TEMPERATURE,
            email: String::new(),
            focus: Focus::default(),
        }
    }
}

impl FormState {
    pub fn email_chars(&self) -> usize {
        self.email.chars().count()
    }

    /// Append to the email body. Returns false when the length limit is reached.
    pub fn insert_char(&mut self, c: char) -> bool {
        if self.email_chars() >= MAX_EMAIL_CHARS {
            return false;
        }
        self.email.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.email.pop();
    }

    /// Step the control under focus. `forward` is Right, otherwise Left.
    pub fn step_focused(&mut self, forward: bool) {
        match self.focus {
            // Two options each, so both directions toggle
            Focus::Tone => self.tone = self.tone.next(),
            Focus::Dialect => self.dialect = self.dialect.next(),
            Focus::Temperature => {
                let delta = if forward {
                    TEMPERATURE_STEP
                } else {
                    -TEMPERATURE_STEP
                };
                self.adjust_temperature(delta);
            }
            Focus::Email => {}
        }
    }

    /// Move the slider, snapping to hundredths and staying within [0, 1]
    pub fn adjust_temperature(&mut self, delta: f32) {
        let raw = ((self.temperature + delta) * 100.0).round() / 100.0;
        // Also folds -0.0 into 0.0
        self.temperature = if raw <= 0.0 { 0.0 } else { raw.min(1.0) };
    }
}

/// Lifecycle of the improve action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting {
        since: Instant,
    },
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

/// Feedback widget state for the response on screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedbackState {
    /// No successful response to rate
    #[default]
    Unavailable,
    /// Waiting for a rating
    Pending,
    /// Rating chosen, optional comment being typed
    Composing { rating: Rating, comment: String },
    /// Handed to the session actor
    Sending { rating: Rating },
    Sent { rating: Rating },
}

impl FeedbackState {
    pub fn is_composing(&self) -> bool {
        matches!(self, Self::Composing { .. })
    }

    pub fn comment_push(&mut self, c: char) {
        if let Self::Composing { comment, .. } = self
            && comment.chars().count() < MAX_FEEDBACK_COMMENT_CHARS
        {
            comment.push(c);
        }
    }

    pub fn comment_pop(&mut self) {
        if let Self::Composing { comment, .. } = self {
            comment.pop();
        }
    }
}

/// Loading, error, and status message state
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub error: Option<String>,
    pub error_time: Option<Instant>,
    pub message: String,
    /// Persists after error bar expires - shown as indicator in status bar
    pub has_unacknowledged_error: bool,
}

impl StatusState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
        self.error_time = Some(Instant::now());
        self.has_unacknowledged_error = true;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_time = None;
    }

    /// Acknowledge the error indicator (clear the persistent flag)
    /// Call this on user input to dismiss the status bar indicator
    pub fn acknowledge_error(&mut self) {
        self.has_unacknowledged_error = false;
    }

    /// Clear error if TTL expired. Returns true if error was cleared.
    pub fn clear_error_if_expired(&mut self) -> bool {
        if let Some(time) = self.error_time
            && time.elapsed().as_secs() >= ERROR_TTL_SECS
        {
            self.clear_error();
            true
        } else {
            false
        }
    }

    pub fn set_message(&mut self, msg: impl ToString) {
        self.message = msg.to_string();
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub form: FormState,
    pub phase: Phase,

    /// Latest snapshot from the session actor
    pub session: Option<SessionSnapshot>,
    pub feedback: FeedbackState,

    /// First visible line of the output pane
    pub output_scroll: usize,

    // Status state (error, status message)
    pub status: StatusState,

    /// Persistent startup warnings (missing credentials)
    pub warnings: Vec<String>,
    /// Whether feedback goes to the remote service or only the local log
    pub remote_feedback: bool,
    /// Model name shown in the status bar
    pub model: String,
}

impl AppState {
    /// Apply a settled submission from the session actor
    pub fn apply_completion(&mut self, snapshot: SessionSnapshot) {
        let succeeded = matches!(snapshot.last_result, Some(Ok(_)));
        self.phase = if succeeded {
            Phase::Succeeded
        } else {
            Phase::Failed
        };
        self.feedback = if succeeded {
            FeedbackState::Pending
        } else {
            FeedbackState::Unavailable
        };
        self.output_scroll = 0;
        self.session = Some(snapshot);
    }

    /// Whether the screen shows a spinner and must be redrawn without new input
    pub fn is_animating(&self) -> bool {
        self.phase.is_submitting() || matches!(self.feedback, FeedbackState::Sending { .. })
    }

    /// Session id of the response on screen, if it can be rated
    pub fn ratable_session(&self) -> Option<crate::session::SessionId> {
        self.session
            .as_ref()
            .filter(|s| matches!(s.last_result, Some(Ok(_))))
            .map(|s| s.session_id)
    }

    pub fn scroll_output(&mut self, delta: i32) {
        self.output_scroll = if delta < 0 {
            self.output_scroll.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.output_scroll.saturating_add(delta as usize)
        };
    }

    // Delegate methods to StatusState
    pub fn set_error(&mut self, error: impl ToString) {
        self.status.set_error(error);
    }

    pub fn clear_error_if_expired(&mut self) -> bool {
        self.status.clear_error_if_expired()
    }

    pub fn acknowledge_error(&mut self) {
        self.status.acknowledge_error();
    }

    pub fn set_status(&mut self, msg: impl ToString) {
        self.status.set_message(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionError;
    use crate::session::{ImproveError, SessionState};

    #[test]
    fn test_focus_cycle() {
        let mut focus = Focus::Tone;
        for _ in 0..4 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Tone);
        assert_eq!(Focus::Tone.prev(), Focus::Email);
        assert_eq!(Focus::Email.next().prev(), Focus::Email);
    }

    #[test]
    fn test_email_length_is_bounded() {
        let mut form = FormState::default();
        for _ in 0..MAX_EMAIL_CHARS {
            assert!(form.insert_char('x'));
        }
        assert!(!form.insert_char('y'));
        assert_eq!(form.email_chars(), MAX_EMAIL_CHARS);

        form.backspace();
        assert!(form.insert_char('ß'));
        assert_eq!(form.email_chars(), MAX_EMAIL_CHARS);
    }

    #[test]
    fn test_temperature_slider_clamps_and_snaps() {
        let mut form = FormState {
            focus: Focus::Temperature,
            ..FormState::default()
        };
        for _ in 0..30 {
            form.step_focused(true);
        }
        assert_eq!(form.temperature, 1.0);

        for _ in 0..5 {
            form.step_focused(false);
        }
        assert_eq!(form.temperature, 0.75);

        for _ in 0..30 {
            form.step_focused(false);
        }
        assert_eq!(form.temperature, 0.0);
    }

    #[test]
    fn test_selectors_toggle() {
        let mut form = FormState {
            focus: Focus::Tone,
            ..FormState::default()
        };
        form.step_focused(true);
        assert_eq!(form.tone, Tone::Informal);
        form.step_focused(false);
        assert_eq!(form.tone, Tone::Formal);

        form.focus = Focus::Dialect;
        form.step_focused(true);
        assert_eq!(form.dialect, Dialect::American);
    }

    #[test]
    fn test_apply_completion_arms_feedback_only_on_success() {
        let mut state = AppState::default();
        let mut session = SessionState::new();

        session.store_result(Ok("Dear team,".into()));
        state.apply_completion(session.snapshot());
        assert_eq!(state.phase, Phase::Succeeded);
        assert_eq!(state.feedback, FeedbackState::Pending);
        assert_eq!(state.ratable_session(), Some(session.session_id()));

        session.begin_submission();
        session.store_result(Err(ImproveError::Completion(CompletionError::Auth(
            "no key".into(),
        ))));
        state.apply_completion(session.snapshot());
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.feedback, FeedbackState::Unavailable);
        assert_eq!(state.ratable_session(), None);
    }

    #[test]
    fn test_comment_editing_only_while_composing() {
        let mut feedback = FeedbackState::Pending;
        feedback.comment_push('a');
        assert_eq!(feedback, FeedbackState::Pending);

        let mut feedback = FeedbackState::Composing {
            rating: Rating::Up,
            comment: String::new(),
        };
        feedback.comment_push('o');
        feedback.comment_push('k');
        feedback.comment_pop();
        assert_eq!(
            feedback,
            FeedbackState::Composing {
                rating: Rating::Up,
                comment: "o".to_string()
            }
        );
    }

    #[test]
    fn test_animating_only_while_waiting_on_the_actor() {
        let mut state = AppState::default();
        assert!(!state.is_animating());

        state.phase = Phase::Submitting {
            since: Instant::now(),
        };
        assert!(state.is_animating());

        state.phase = Phase::Succeeded;
        state.feedback = FeedbackState::Sending { rating: Rating::Up };
        assert!(state.is_animating());

        state.feedback = FeedbackState::Sent { rating: Rating::Up };
        assert!(!state.is_animating());
    }

    #[test]
    fn test_output_scroll_saturates() {
        let mut state = AppState::default();
        state.scroll_output(-5);
        assert_eq!(state.output_scroll, 0);
        state.scroll_output(10);
        state.scroll_output(-3);
        assert_eq!(state.output_scroll, 7);
    }
}
