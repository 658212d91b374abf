//! Colors and styles for the emailsmith TUI
//!
//! Each [`ThemeVariant`] maps to one [`Palette`]. Widgets never pick colors
//! directly; they ask [`Theme`] for a style built from the active palette.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use std::sync::RwLock;

use crate::config::ThemeVariant;

/// Global theme variant, set once from config at startup
static THEME_VARIANT: RwLock<ThemeVariant> = RwLock::new(ThemeVariant::Modern);

pub fn init_theme(variant: ThemeVariant) {
    if let Ok(mut guard) = THEME_VARIANT.write() {
        *guard = variant;
    }
}

pub fn current_theme() -> ThemeVariant {
    THEME_VARIANT.read().map(|g| *g).unwrap_or_default()
}

/// Every color the UI draws with
#[derive(Debug, Clone, Copy, PartialEq)]
struct Palette {
    /// Screen background; `Reset` keeps the terminal's own
    base: Color,
    /// Status and help bars
    bar: Color,
    selection: Color,
    border: Color,
    border_focused: Color,
    text: Color,
    subtext: Color,
    muted: Color,
    accent: Color,
    success: Color,
    warning: Color,
    error: Color,
    /// Background of the error bar
    alert: Color,
    /// Border shape for focused fields and popups
    focus_border: BorderType,
}

/// Catppuccin Mocha
const MODERN: Palette = Palette {
    base: Color::Rgb(30, 30, 46),
    bar: Color::Rgb(24, 24, 37),
    selection: Color::Rgb(69, 71, 90),
    border: Color::Rgb(49, 50, 68),
    border_focused: Color::Rgb(180, 190, 254),
    text: Color::Rgb(205, 214, 244),
    subtext: Color::Rgb(186, 194, 222),
    muted: Color::Rgb(108, 112, 134),
    accent: Color::Rgb(137, 180, 250),
    success: Color::Rgb(166, 227, 161),
    warning: Color::Rgb(249, 226, 175),
    error: Color::Rgb(243, 139, 168),
    alert: Color::Rgb(243, 139, 168),
    focus_border: BorderType::Rounded,
};

const DARK: Palette = Palette {
    base: Color::Reset,
    bar: Color::DarkGray,
    selection: Color::LightBlue,
    border: Color::DarkGray,
    border_focused: Color::Cyan,
    text: Color::White,
    subtext: Color::Gray,
    muted: Color::Gray,
    accent: Color::Cyan,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
    alert: Color::Red,
    focus_border: BorderType::Plain,
};

const HIGH_CONTRAST: Palette = Palette {
    base: Color::Reset,
    bar: Color::Black,
    selection: Color::LightBlue,
    border: Color::Gray,
    border_focused: Color::LightCyan,
    text: Color::White,
    subtext: Color::White,
    muted: Color::Gray,
    accent: Color::LightCyan,
    success: Color::LightGreen,
    warning: Color::LightYellow,
    error: Color::LightRed,
    alert: Color::Red,
    focus_border: BorderType::Thick,
};

fn palette() -> &'static Palette {
    match current_theme() {
        ThemeVariant::Modern => &MODERN,
        ThemeVariant::Dark => &DARK,
        ThemeVariant::HighContrast => &HIGH_CONTRAST,
    }
}

pub mod borders {
    use super::*;

    /// Focused fields and popups
    pub fn rounded() -> BorderType {
        palette().focus_border
    }

    pub fn panel() -> BorderType {
        BorderType::Plain
    }
}

pub mod symbols {
    pub const IDLE: &str = "●";
    pub const ERROR: &str = "!";
    pub const SELECTOR_LEFT: &str = "‹ ";
    pub const SELECTOR_RIGHT: &str = " ›";
    pub const CURSOR: &str = "│";
    pub const GAUGE_FILLED: char = '█';
    pub const GAUGE_EMPTY: char = '░';
    pub const REMOTE_FEEDBACK: &str = "●";
    pub const LOCAL_FEEDBACK: &str = "○";
    pub const HEART: &str = "♥";
}

/// Text in `fg` on the screen background
fn on_base(fg: Color) -> Style {
    Style::default().fg(fg).bg(palette().base)
}

/// Text in `fg` on the status/help bar background
fn on_bar(fg: Color) -> Style {
    Style::default().fg(fg).bg(palette().bar)
}

pub struct Theme;

impl Theme {
    /// Focused selector value
    pub fn selected() -> Style {
        let p = palette();
        Style::default()
            .fg(p.text)
            .bg(p.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        on_base(palette().text)
    }

    pub fn text_secondary() -> Style {
        on_base(palette().subtext)
    }

    pub fn text_muted() -> Style {
        on_base(palette().muted)
    }

    pub fn text_accent() -> Style {
        on_base(palette().accent)
    }

    pub fn text_success() -> Style {
        on_base(palette().success)
    }

    /// Failure shown in place of an improved email
    pub fn text_error() -> Style {
        on_base(palette().error)
    }

    /// Missing credentials
    pub fn warning_banner() -> Style {
        on_base(palette().warning).add_modifier(Modifier::BOLD)
    }

    pub fn label() -> Style {
        on_base(palette().muted).add_modifier(Modifier::BOLD)
    }

    pub fn status_bar() -> Style {
        on_bar(palette().text)
    }

    pub fn status_busy() -> Style {
        on_bar(palette().warning)
    }

    pub fn status_ok() -> Style {
        on_bar(palette().success)
    }

    pub fn status_error() -> Style {
        on_bar(palette().error)
    }

    pub fn status_muted() -> Style {
        on_bar(palette().muted)
    }

    pub fn help_bar() -> Style {
        on_bar(palette().text)
    }

    pub fn help_key() -> Style {
        on_bar(palette().warning)
    }

    pub fn help_desc() -> Style {
        on_bar(palette().muted)
    }

    pub fn error_bar() -> Style {
        let p = palette();
        Style::default().fg(p.text).bg(p.alert)
    }

    pub fn border() -> Style {
        on_base(palette().border)
    }

    pub fn border_focused() -> Style {
        on_base(palette().border_focused)
    }

    /// Fill for the whole frame
    pub fn main_bg() -> Style {
        Style::default().bg(palette().base)
    }
}
