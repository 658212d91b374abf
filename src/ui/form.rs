//! Settings sidebar and email editor

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme::{Theme, borders, symbols};
use super::widgets::wrap_lines;
use crate::app::state::{AppState, Focus, FormState};
use crate::constants::MAX_EMAIL_CHARS;
use crate::prompt::{Dialect, Tone};

const GAUGE_WIDTH: usize = 20;

fn field_block(title: String, focused: bool) -> Block<'static> {
    let (border_style, border_type) = if focused {
        (Theme::border_focused(), borders::rounded())
    } else {
        (Theme::border(), borders::panel())
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .title(title)
}

/// One row per option, the current one marked with selector arrows
fn selector_lines<'a>(label: &'a str, options: &[&'a str], current: &str, focused: bool) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(label, Theme::label()))];
    for option in options {
        let line = if *option == current {
            let style = if focused {
                Theme::selected()
            } else {
                Theme::text_accent()
            };
            Line::from(vec![
                Span::styled(symbols::SELECTOR_LEFT, Theme::text_accent()),
                Span::styled(*option, style),
                Span::styled(symbols::SELECTOR_RIGHT, Theme::text_accent()),
            ])
        } else {
            Line::from(Span::styled(format!("  {}", option), Theme::text_muted()))
        };
        lines.push(line);
    }
    lines
}

/// Slider rendered as a fixed-width bar, e.g. "██████████░░░░░░░░░░ 0.50"
pub(crate) fn temperature_gauge(temperature: f32, width: usize) -> String {
    let filled = ((temperature.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    let mut bar = String::with_capacity(width * 3 + 5);
    bar.extend(std::iter::repeat_n(symbols::GAUGE_FILLED, filled));
    bar.extend(std::iter::repeat_n(symbols::GAUGE_EMPTY, width - filled));
    format!("{} {:.2}", bar, temperature)
}

pub fn render_settings(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.form;
    let focused = matches!(
        form.focus,
        Focus::Tone | Focus::Dialect | Focus::Temperature
    );
    let block = field_block(" Settings ".to_string(), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tones = Tone::ALL.map(Tone::label);
    let dialects = Dialect::ALL.map(Dialect::label);

    let mut lines = selector_lines(
        "Tone of English",
        &tones,
        form.tone.label(),
        form.focus == Focus::Tone,
    );
    lines.push(Line::default());
    lines.extend(selector_lines(
        "English variant",
        &dialects,
        form.dialect.label(),
        form.focus == Focus::Dialect,
    ));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Model temperature", Theme::label())));

    let gauge_width = GAUGE_WIDTH.min((inner.width as usize).saturating_sub(6));
    let gauge_style = if form.focus == Focus::Temperature {
        Theme::selected()
    } else {
        Theme::text_accent()
    };
    lines.push(Line::from(Span::styled(
        temperature_gauge(form.temperature, gauge_width),
        gauge_style,
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("Model: {}", state.model),
        Theme::text_muted(),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_email_field(frame: &mut Frame, area: Rect, form: &FormState) {
    let focused = form.focus == Focus::Email;
    let title = format!(
        " Your email ({}/{}) ",
        form.email_chars(),
        MAX_EMAIL_CHARS
    );
    let block = field_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if form.email.is_empty() && !focused {
        frame.render_widget(
            Paragraph::new("Type your email here...").style(Theme::text_muted()),
            inner,
        );
        return;
    }

    let style = if focused {
        Theme::text()
    } else {
        Theme::text_secondary()
    };
    let text = if focused {
        format!("{}{}", form.email, symbols::CURSOR)
    } else {
        form.email.clone()
    };

    // Keep the cursor (end of text) in view
    let rows = wrap_lines(&text, inner.width);
    let scroll = rows.len().saturating_sub(inner.height as usize) as u16;

    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(lines).style(style).scroll((scroll, 0)),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_editor_keeps_last_typed_word_in_view() {
        let mut words = vec!["y".repeat(44); 19];
        words.push("LASTTYPED".to_string());
        let form = FormState {
            email: words.join(" "),
            focus: Focus::Email,
            ..Default::default()
        };

        let mut terminal = Terminal::new(TestBackend::new(50, 8)).unwrap();
        terminal
            .draw(|f| render_email_field(f, f.area(), &form))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("LASTTYPED│"));
    }

    #[test]
    fn test_temperature_gauge() {
        assert_eq!(temperature_gauge(0.5, 4), "██░░ 0.50");
        assert_eq!(temperature_gauge(0.0, 4), "░░░░ 0.00");
        assert_eq!(temperature_gauge(1.0, 4), "████ 1.00");
    }
}
