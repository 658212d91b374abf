//! Shared widgets and text helpers

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;

const HINT_SEPARATOR: &str = " │ ";

pub fn error_bar(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(format!(" Error: {} ", message)).style(Theme::error_bar());
    frame.render_widget(paragraph, area);
}

/// Key hints, left to right. Hints that do not fit whole are left out.
pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let available = area.width as usize;
    let mut spans = Vec::new();
    let mut used = 0;

    for (i, (key, desc)) in hints.iter().enumerate() {
        let key = format!(" {} ", key);
        let separator = if i == 0 { 0 } else { HINT_SEPARATOR.width() };
        let cost = separator + key.width() + desc.width();
        // The first hint is always shown, clipped if it must be
        if i > 0 && used + cost > available {
            break;
        }
        if i > 0 {
            spans.push(Span::styled(HINT_SEPARATOR, Theme::text_muted()));
        }
        spans.push(Span::styled(key, Theme::help_key()));
        spans.push(Span::styled(desc.to_string(), Theme::help_desc()));
        used += cost;
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Theme::help_bar()),
        area,
    );
}

/// Fit `s` into `max_width` columns, ending with `…` when cut
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut width = 0;
    let mut result: String = s
        .chars()
        .take_while(|c| {
            width += c.width().unwrap_or(0);
            width <= budget
        })
        .collect();
    if max_width > 0 {
        result.push('…');
    }
    result
}

/// Word-wrap `text` into rows of at most `width` columns.
///
/// Words wider than a row are split across rows. Panes draw these rows
/// as-is, so the row count is exactly what scrolling has to cover.
pub fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;

        for word in line.split_inclusive(' ') {
            let visible = word.trim_end_matches(' ').width();
            if row_width > 0 && row_width + visible > width {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }

            if visible <= width {
                row.push_str(word);
                row_width += word.width();
                continue;
            }
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if row_width > 0 && row_width + w > width && c != ' ' {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(c);
                row_width += w;
            }
        }
        rows.push(row);
    }

    rows
}

/// Make model output safe to draw: CSI escape sequences are dropped, CRLF
/// becomes LF, and any other control character except tab becomes a space.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => {
                if chars.next_if_eq(&'[').is_some() {
                    // Parameters run until a final byte in @..=~
                    while chars.next().is_some_and(|ch| !('@'..='~').contains(&ch)) {}
                }
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\t' => out.push(c),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }

    out
}
