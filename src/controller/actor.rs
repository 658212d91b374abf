//! Session actor: owns one session's state and serializes its actions

use tokio::sync::mpsc;

use super::{Controller, FeedbackOutcome, FeedbackRejection};
use crate::completion::CompletionClient;
use crate::feedback::{FeedbackError, FeedbackEvent, FeedbackSink};
use crate::prompt::{PromptRequest, SubmitError};
use crate::session::{SessionSnapshot, SessionState};

/// Commands that can be sent to the session actor
#[derive(Debug)]
pub enum SessionCommand {
    /// Improve an email
    Submit {
        request: PromptRequest,
        temperature: f32,
    },
    /// Rate the current response
    Feedback(FeedbackEvent),
    /// Shutdown the actor
    Shutdown,
}

/// Events emitted by the session actor
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Submission settled, successfully or not; snapshot holds the result
    Completed(SessionSnapshot),
    /// Submission refused before anything was sent
    SubmitRejected(SubmitError),
    FeedbackRecorded(SessionSnapshot),
    FeedbackRejected(FeedbackRejection),
    FeedbackFailed(FeedbackError),
}

/// Handle for communicating with the session actor
pub struct SessionHandle {
    pub cmd_tx: mpsc::Sender<SessionCommand>,
    pub event_rx: mpsc::Receiver<SessionEvent>,
}

/// Spawn the actor task for one interactive session.
///
/// Commands are handled one at a time, so a session never has two
/// completions in flight and feedback is always applied before the next
/// submission resets the session.
pub fn spawn_session_actor<C, F>(controller: Controller<C, F>) -> SessionHandle
where
    C: CompletionClient + 'static,
    F: FeedbackSink + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(32);

    tokio::spawn(session_actor_loop(controller, cmd_rx, event_tx));

    SessionHandle { cmd_tx, event_rx }
}

async fn session_actor_loop<C, F>(
    controller: Controller<C, F>,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: mpsc::Sender<SessionEvent>,
) where
    C: CompletionClient,
    F: FeedbackSink,
{
    let mut session = SessionState::new();

    while let Some(cmd) = cmd_rx.recv().await {
        let event = match cmd {
            SessionCommand::Submit {
                request,
                temperature,
            } => match controller.on_submit(&mut session, request, temperature).await {
                Ok(()) => SessionEvent::Completed(session.snapshot()),
                Err(e) => SessionEvent::SubmitRejected(e),
            },

            SessionCommand::Feedback(event) => {
                match controller.on_feedback(&mut session, event).await {
                    FeedbackOutcome::Recorded => SessionEvent::FeedbackRecorded(session.snapshot()),
                    FeedbackOutcome::Rejected(reason) => SessionEvent::FeedbackRejected(reason),
                    FeedbackOutcome::Failed(e) => SessionEvent::FeedbackFailed(e),
                }
            }

            SessionCommand::Shutdown => {
                break;
            }
        };

        if event_tx.send(event).await.is_err() {
            tracing::warn!("Session actor: event receiver dropped");
            break;
        }
    }
}
