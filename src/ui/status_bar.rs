//! Status bar rendering with activity indicator and session info

use chrono::{DateTime, Local};
use unicode_width::UnicodeWidthStr;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::{Theme, symbols};
use super::widgets::truncate_to_width;
use crate::constants::SPINNER_FRAME_MS;

/// What the status bar shows
pub struct StatusInfo<'a> {
    pub message: &'a str,
    pub submitting: bool,
    /// An error the user has not acknowledged yet
    pub has_error: bool,
    pub model: &'a str,
    /// When the response on screen was requested
    pub improved_at: Option<DateTime<Local>>,
    pub remote_feedback: bool,
}

pub fn status_bar(frame: &mut Frame, area: Rect, info: &StatusInfo) {
    let style = Theme::status_bar();
    let width = area.width as usize;

    let (indicator, indicator_style) = if info.submitting {
        (format!(" {} ", spinner_char()), Theme::status_busy())
    } else if info.has_error {
        (format!(" {} ", symbols::ERROR), Theme::status_error())
    } else {
        (format!(" {} ", symbols::IDLE), Theme::status_ok())
    };

    // Right side: "improved 2m ago │ gpt-3.5-turbo │ ● feedback "
    let improved = info
        .improved_at
        .map(|at| format!("improved {} │ ", format_relative_time(at, Local::now())))
        .unwrap_or_default();
    let (feedback_symbol, feedback_label) = if info.remote_feedback {
        (symbols::REMOTE_FEEDBACK, "feedback")
    } else {
        (symbols::LOCAL_FEEDBACK, "feedback (local)")
    };
    let right = format!("{}{} │ ", improved, info.model);
    let feedback = format!("{} {} ", feedback_symbol, feedback_label);

    let fixed_width = indicator.width() + right.width() + feedback.width();
    let message = truncate_to_width(info.message, width.saturating_sub(fixed_width + 2));
    let padding_width = width.saturating_sub(fixed_width + message.width());

    let feedback_style = if info.remote_feedback {
        Theme::status_ok()
    } else {
        Theme::status_muted()
    };

    let line = Line::from(vec![
        Span::styled(indicator, indicator_style),
        Span::styled(message, style),
        Span::styled(" ".repeat(padding_width), style),
        Span::styled(right, Theme::status_muted()),
        Span::styled(feedback, feedback_style),
    ]);
    frame.render_widget(Paragraph::new(line).style(style), area);
}

/// Format a time as relative to `now` (e.g., "just now", "2m ago", "1h ago")
pub fn format_relative_time(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let diff = now.signed_duration_since(then);

    if diff.num_seconds() < 60 {
        "just now".to_string()
    } else if diff.num_minutes() < 60 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_hours() < 24 {
        format!("{}h ago", diff.num_hours())
    } else {
        then.format("%b %d %H:%M").to_string()
    }
}

/// Spinner frame for the current wall-clock time
pub fn spinner_char() -> char {
    let spinner = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let idx = (millis / SPINNER_FRAME_MS) as usize % spinner.chars().count();

    spinner.chars().nth(idx).unwrap_or('*')
}
