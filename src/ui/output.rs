//! Improved email pane, feedback widget and comment popup

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::components::centered_rect_constrained;
use super::status_bar::spinner_char;
use super::theme::{Theme, borders, symbols};
use super::widgets::{sanitize_text, wrap_lines};
use crate::app::state::{AppState, FeedbackState, Phase};
use crate::constants::MAX_FEEDBACK_COMMENT_CHARS;

pub fn render_output(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::border())
        .title(" Improved email ");
    if let Some(widget) = feedback_line(&state.feedback) {
        block = block.title_bottom(widget);
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Phase::Submitting { since } = state.phase {
        let line = Line::from(vec![
            Span::styled(format!("{} ", spinner_char()), Theme::text_accent()),
            Span::styled(
                format!("Improving your email... {}s", since.elapsed().as_secs()),
                Theme::text_secondary(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let (text, style) = match state.session.as_ref().and_then(|s| s.last_result.as_ref()) {
        Some(Ok(improved)) => (sanitize_text(improved), Theme::text()),
        Some(Err(e)) => (e.user_message(), Theme::text_error()),
        None => (
            "Press Ctrl+S to improve your email".to_string(),
            Theme::text_muted(),
        ),
    };

    let rows = wrap_lines(&text, inner.width);
    // Clamp so PgDn past the end does not scroll into blank space
    let max_scroll = rows.len().saturating_sub(inner.height as usize);
    let scroll = state.output_scroll.min(max_scroll) as u16;

    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(lines).style(style).scroll((scroll, 0)),
        inner,
    );
}

/// Feedback widget shown on the bottom border of the output pane
fn feedback_line(feedback: &FeedbackState) -> Option<Line<'static>> {
    let spans = match feedback {
        FeedbackState::Unavailable => return None,
        FeedbackState::Pending | FeedbackState::Composing { .. } => vec![
            Span::styled(" Was this helpful? ", Theme::text_secondary()),
            Span::styled("Ctrl+U ", Theme::text_accent()),
            Span::styled("👍 ", Theme::text()),
            Span::styled("Ctrl+D ", Theme::text_accent()),
            Span::styled("👎 ", Theme::text()),
        ],
        FeedbackState::Sending { rating } => vec![Span::styled(
            format!(" {} Sending {} ", spinner_char(), rating.score()),
            Theme::text_secondary(),
        )],
        FeedbackState::Sent { rating } => vec![Span::styled(
            format!(" Feedback sent {} Thank you! ", rating.score()),
            Theme::text_success(),
        )],
    };
    Some(Line::from(spans))
}

pub fn render_comment_popup(frame: &mut Frame, area: Rect, feedback: &FeedbackState) {
    let FeedbackState::Composing { rating, comment } = feedback else {
        return;
    };

    let popup = centered_rect_constrained(area, 40, 70, 7, 10);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::rounded())
        .border_style(Theme::border_focused())
        .title(format!(" {} [Optional] Provide additional feedback ", rating.score()))
        .title_bottom(Line::from(vec![
            Span::styled(" Enter", Theme::text_accent()),
            Span::styled(" send  ", Theme::text_secondary()),
            Span::styled("Esc", Theme::text_accent()),
            Span::styled(" cancel ", Theme::text_secondary()),
            Span::styled(
                format!("{}/{} ", comment.chars().count(), MAX_FEEDBACK_COMMENT_CHARS),
                Theme::text_muted(),
            ),
        ]));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = wrap_lines(&format!("{}{}", comment, symbols::CURSOR), inner.width);
    let scroll = rows.len().saturating_sub(inner.height as usize) as u16;
    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(lines).style(Theme::text()).scroll((scroll, 0)),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Rating;
    use crate::session::SessionState;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw_output(state: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| render_output(f, f.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_scrolling_reaches_end_of_long_words() {
        let mut words = vec!["x".repeat(44); 39];
        words.push("FINALWORD".to_string());
        let mut session = SessionState::new();
        session.store_result(Ok(words.join(" ")));
        let mut state = AppState::default();
        state.apply_completion(session.snapshot());
        state.output_scroll = 10_000;

        let screen = draw_output(&state, 60, 12);
        assert!(screen.contains("FINALWORD"));
    }

    #[test]
    fn test_feedback_line_per_state() {
        assert!(feedback_line(&FeedbackState::Unavailable).is_none());
        assert!(feedback_line(&FeedbackState::Pending).is_some());

        let sent = feedback_line(&FeedbackState::Sent { rating: Rating::Up }).unwrap();
        let text: String = sent.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("👍"));
        assert!(text.contains("Thank you"));
    }
}
