//! Top-level screen layout

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

use super::form::{render_email_field, render_settings};
use super::output::{render_comment_popup, render_output};
use super::status_bar::{StatusInfo, status_bar};
use super::theme::{Theme, symbols};
use super::widgets::{error_bar, help_bar, truncate_to_width};
use crate::app::state::{AppState, Focus};
use crate::constants::{MIN_SIDEBAR_VIEW_WIDTH, SETTINGS_SIDEBAR_WIDTH};

const WELCOME: &str = "Welcome to the Email Improvement tool! This tool is part of a research \
project and will be running as long as users submit feedback. Your feedback is invaluable to us!";

const INSTRUCTIONS: &str = "Type your email (up to 1000 characters) and press Ctrl+S to get a \
refined version. The original email can be in English or another language.";

/// Screen areas, computed once per frame
struct ScreenLayout {
    banner: Rect,
    welcome: Rect,
    settings: Rect,
    email: Rect,
    output: Rect,
    instructions: Rect,
    help: Rect,
    status: Rect,
}

fn compute_layout(area: Rect, warning_lines: u16) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(warning_lines), // Missing credential banner
            Constraint::Length(2),             // Welcome text
            Constraint::Min(0),                // Form and output
            Constraint::Length(2),             // Instructions + footer
            Constraint::Length(1),             // Help / error bar
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    let (settings, content) = if area.width >= MIN_SIDEBAR_VIEW_WIDTH {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(SETTINGS_SIDEBAR_WIDTH),
                Constraint::Min(0),
            ])
            .split(rows[2]);
        (cols[0], cols[1])
    } else {
        // Narrow terminal: settings stacked above the editor
        let stacked = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(rows[2]);
        (stacked[0], stacked[1])
    };

    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(content);

    ScreenLayout {
        banner: rows[0],
        welcome: rows[1],
        settings,
        email: panes[0],
        output: panes[1],
        instructions: rows[3],
        help: rows[4],
        status: rows[5],
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::main_bg()), area);

    let layout = compute_layout(area, state.warnings.len() as u16);

    render_banner(frame, layout.banner, &state.warnings);
    frame.render_widget(
        Paragraph::new(WELCOME)
            .style(Theme::text_secondary())
            .wrap(Wrap { trim: true }),
        layout.welcome,
    );

    render_settings(frame, layout.settings, state);
    render_email_field(frame, layout.email, &state.form);
    render_output(frame, layout.output, state);
    render_footer(frame, layout.instructions);

    // Help bar or error
    if let Some(ref error) = state.status.error {
        error_bar(frame, layout.help, error);
    } else {
        help_bar(frame, layout.help, hints(state));
    }

    let improved_at = state
        .ratable_session()
        .and_then(|id| id.created_at());
    status_bar(
        frame,
        layout.status,
        &StatusInfo {
            message: &state.status.message,
            submitting: state.phase.is_submitting(),
            has_error: state.status.has_unacknowledged_error,
            model: &state.model,
            improved_at,
            remote_feedback: state.remote_feedback,
        },
    );

    // Comment popup (rendered on top of everything)
    if state.feedback.is_composing() {
        render_comment_popup(frame, area, &state.feedback);
    }
}

fn render_banner(frame: &mut Frame, area: Rect, warnings: &[String]) {
    let width = area.width.saturating_sub(3) as usize;
    let lines: Vec<Line> = warnings
        .iter()
        .map(|w| {
            Line::from(Span::styled(
                format!(" {} {}", symbols::ERROR, truncate_to_width(w, width)),
                Theme::warning_banner(),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(INSTRUCTIONS, Theme::text_muted())),
        Line::from(vec![
            Span::styled("Made with ", Theme::text_muted()),
            Span::styled(symbols::HEART, Theme::text_error()),
            Span::styled(" using ratatui and GPT", Theme::text_muted()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn hints(state: &AppState) -> &'static [(&'static str, &'static str)] {
    if state.feedback.is_composing() {
        return &[("Enter", "send"), ("Esc", "cancel")];
    }
    match state.form.focus {
        Focus::Email => &[
            ("Ctrl+S", "improve"),
            ("Tab", "settings"),
            ("PgUp/PgDn", "scroll"),
            ("Ctrl+U/D", "rate"),
            ("Ctrl+Q", "quit"),
        ],
        Focus::Tone | Focus::Dialect => &[
            ("←/→", "change"),
            ("Tab", "next"),
            ("Esc", "email"),
            ("Ctrl+S", "improve"),
            ("Ctrl+Q", "quit"),
        ],
        Focus::Temperature => &[
            ("←/→", "adjust"),
            ("Tab", "next"),
            ("Esc", "email"),
            ("Ctrl+S", "improve"),
            ("Ctrl+Q", "quit"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::FeedbackState;
    use crate::feedback::Rating;
    use crate::session::SessionState;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_form_and_warning() {
        let state = AppState {
            warnings: vec!["OpenAI API key not found in environment variables!".to_string()],
            model: "gpt-3.5-turbo".to_string(),
            ..Default::default()
        };
        let screen = draw(&state, 120, 40);

        assert!(screen.contains("OpenAI API key not found"));
        assert!(screen.contains("Settings"));
        assert!(screen.contains("Formal"));
        assert!(screen.contains("Your email (0/1000)"));
        assert!(screen.contains("Press Ctrl+S to improve your email"));
    }

    #[test]
    fn test_renders_sanitized_result_on_narrow_screen() {
        let mut session = SessionState::new();
        session.store_result(Ok("Dear team,\n\x1b[1mThank you.".to_string()));
        let mut state = AppState::default();
        state.apply_completion(session.snapshot());

        let screen = draw(&state, 80, 30);
        assert!(screen.contains("Dear team,"));
        assert!(screen.contains("Thank you."));
        assert!(screen.contains("Was this helpful?"));
        assert!(!screen.contains('\x1b'));
    }

    #[test]
    fn test_renders_comment_popup() {
        let mut state = AppState::default();
        state.feedback = FeedbackState::Composing {
            rating: Rating::Down,
            comment: "too stiff".to_string(),
        };

        let screen = draw(&state, 120, 40);
        assert!(screen.contains("Provide additional feedback"));
        assert!(screen.contains("too stiff"));
    }
}
