//! Form editing (chars, backspace, focus)

use crate::app::state::Focus;
use crate::constants::MAX_EMAIL_CHARS;

use super::super::App;

impl App {
    pub(crate) fn handle_char(&mut self, c: char) {
        // Comment popup takes all typing while open
        if self.state.feedback.is_composing() {
            self.state.feedback.comment_push(c);
            return;
        }

        if self.state.form.focus != Focus::Email {
            return;
        }
        if !self.state.form.insert_char(c) {
            self.state
                .set_error(format!("Emails are limited to {} characters", MAX_EMAIL_CHARS));
        }
    }

    pub(crate) fn handle_backspace(&mut self) {
        if self.state.feedback.is_composing() {
            self.state.feedback.comment_pop();
            return;
        }

        if self.state.form.focus == Focus::Email {
            self.state.form.backspace();
        }
    }

    /// Esc returns to the email body
    pub(crate) fn go_back(&mut self) {
        self.state.form.focus = Focus::Email;
    }
}
