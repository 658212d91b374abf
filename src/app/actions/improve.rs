//! Submitting the email to the session actor

use std::time::Instant;

use anyhow::Result;

use crate::app::state::Phase;
use crate::controller::SessionCommand;
use crate::prompt::PromptRequest;

use super::super::App;

impl App {
    pub(crate) async fn improve(&mut self) -> Result<()> {
        if self.state.phase.is_submitting() {
            self.state.set_status("Still improving the previous email...");
            return Ok(());
        }

        let form = &self.state.form;
        let temperature = form.temperature;
        let request = match PromptRequest::new(form.tone, form.dialect, form.email.as_str()) {
            Ok(request) => request,
            Err(e) => {
                self.state.set_error(e);
                return Ok(());
            }
        };

        tracing::debug!(
            tone = %request.tone(),
            dialect = %request.dialect(),
            temperature,
            chars = request.email_body().chars().count(),
            "Submitting email"
        );

        self.session
            .cmd_tx
            .send(SessionCommand::Submit {
                request,
                temperature,
            })
            .await
            .map_err(|_| anyhow::anyhow!("Session actor stopped"))?;

        self.state.phase = Phase::Submitting {
            since: Instant::now(),
        };
        self.state.set_status("Improving your email...");
        Ok(())
    }
}
