//! Application core - owns the form state and talks to the session actor

mod actions;
mod event_loop;
pub mod render_thread;
pub mod state;

use anyhow::Result;

use render_thread::RenderThread;

use crate::completion::OpenAiClient;
use crate::config::Config;
use crate::controller::{Controller, SessionCommand, SessionHandle, spawn_session_actor};
use crate::credentials::Credentials;
use crate::feedback::{FeedbackBackend, LogSink, TrubricsSink};
use crate::input::KeyBindings;
use state::{AppState, FormState};

pub struct App {
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    /// Session actor owning this session's state
    pub(crate) session: SessionHandle,
    /// Dirty flag: when true, UI needs re-render. Skips renders when nothing changed.
    pub(crate) dirty: bool,
}

impl App {
    pub fn new(config: Config, credentials: Credentials) -> Result<Self> {
        let warnings: Vec<String> = credentials
            .warnings(config.feedback.enabled)
            .iter()
            .map(|w| w.to_string())
            .collect();
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        let client = OpenAiClient::new(&config.completion)?;
        let model = client.model().to_string();

        let sink = match credentials.feedback {
            Some(login) if config.feedback.enabled => {
                FeedbackBackend::Trubrics(TrubricsSink::new(&config.feedback, login)?)
            }
            _ => FeedbackBackend::Log(LogSink),
        };
        let remote_feedback = sink.is_remote();
        tracing::info!(
            model = %model,
            remote_feedback,
            "Starting session"
        );

        let controller = Controller::new(client, sink, credentials.openai_api_key);
        let session = spawn_session_actor(controller);

        let state = AppState {
            form: FormState {
                tone: config.ui.default_tone,
                dialect: config.ui.default_dialect,
                temperature: config.ui.default_temperature,
                ..Default::default()
            },
            warnings,
            remote_feedback,
            model,
            ..Default::default()
        };

        Ok(Self {
            state,
            bindings: KeyBindings::new(),
            session,
            dirty: true, // Start dirty for initial render
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn()?;

        self.state
            .set_status("Type or paste your email, then press Ctrl+S");

        // Run event loop
        let result = self.event_loop(&render_thread).await;

        // Shutdown render thread (handles terminal cleanup)
        render_thread.shutdown();

        // Stop the session actor
        self.session.cmd_tx.send(SessionCommand::Shutdown).await.ok();

        result
    }
}

#[cfg(test)]
impl App {
    /// App wired to bare channels instead of a running session actor
    pub(crate) fn with_channels() -> (
        Self,
        tokio::sync::mpsc::Receiver<SessionCommand>,
        tokio::sync::mpsc::Sender<crate::controller::SessionEvent>,
    ) {
        let (cmd_tx, cmd_rx) = tokio::sync::mpsc::channel(16);
        let (event_tx, event_rx) = tokio::sync::mpsc::channel(16);
        let app = Self {
            state: AppState::default(),
            bindings: KeyBindings::new(),
            session: SessionHandle { cmd_tx, event_rx },
            dirty: false,
        };
        (app, cmd_rx, event_tx)
    }
}
