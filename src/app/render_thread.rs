//! Drawing off the event loop.
//!
//! The render thread owns the terminal. It draws the latest state it was
//! sent and, while that state shows a spinner, redraws it on every spinner
//! frame so the event loop only has to send states that actually changed.

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::state::AppState;
use crate::constants::SPINNER_FRAME_MS;

type Screen = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus alternate screen, restored on drop
struct TerminalGuard {
    screen: Screen,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        let screen = execute!(stdout, EnterAlternateScreen)
            .and_then(|_| Terminal::new(CrosstermBackend::new(stdout)));
        match screen {
            Ok(screen) => Ok(Self { screen }),
            Err(e) => {
                execute!(io::stdout(), LeaveAlternateScreen).ok();
                disable_raw_mode().ok();
                Err(e)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        execute!(self.screen.backend_mut(), LeaveAlternateScreen).ok();
        self.screen.show_cursor().ok();
    }
}

pub struct RenderThread {
    /// Latest-state slot. Dropping it stops the thread.
    frames: Option<SyncSender<Box<AppState>>>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Take over the terminal and start drawing
    pub fn spawn() -> io::Result<Self> {
        let guard = TerminalGuard::enter()?;
        // Capacity 1: only the newest state matters
        let (frames, rx) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || draw_loop(guard, rx))?;

        Ok(Self {
            frames: Some(frames),
            handle: Some(handle),
        })
    }

    /// Queue `state` for drawing without blocking. When a frame is already
    /// queued this one is dropped; the next change sends a newer state.
    pub fn render(&self, state: AppState) {
        let Some(frames) = &self.frames else {
            return;
        };
        match frames.try_send(Box::new(state)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::trace!("Render thread busy, skipping frame"),
            Err(TrySendError::Disconnected(_)) => tracing::error!("Render thread stopped"),
        }
    }

    /// Stop drawing and give the terminal back
    pub fn shutdown(mut self) {
        self.frames.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("Render thread panicked");
        }
    }
}

fn draw_loop(mut guard: TerminalGuard, frames: Receiver<Box<AppState>>) {
    let tick = Duration::from_millis(SPINNER_FRAME_MS as u64);
    let mut current: Option<Box<AppState>> = None;

    loop {
        let animating = current.as_deref().is_some_and(AppState::is_animating);
        let next = if animating {
            frames.recv_timeout(tick)
        } else {
            frames.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };

        match next {
            Ok(state) => current = Some(state),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(state) = &current
            && let Err(e) = guard.screen.draw(|f| crate::ui::render(f, state))
        {
            tracing::error!("Render error: {}", e);
        }
    }
}
