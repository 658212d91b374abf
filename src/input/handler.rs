use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::keybindings::{Action, KeyBindings};
use crate::app::state::{AppState, Focus};

#[derive(Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Backspace,
    Newline,
}

pub fn handle_input(event: Event, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key(key_event, state, bindings)
        }
        _ => InputResult::Continue,
    }
}

fn handle_key(key: KeyEvent, state: &AppState, bindings: &KeyBindings) -> InputResult {
    // Feedback comment popup is modal
    if state.feedback.is_composing() {
        return handle_comment_input(key);
    }

    // Match on code and modifiers only; terminals differ in the extra state bits
    if let Some(action) = bindings.get(&KeyEvent::new(key.code, key.modifiers)) {
        if action == Action::Quit {
            return InputResult::Quit;
        }
        return InputResult::Action(action);
    }

    match state.form.focus {
        Focus::Email => handle_text_input(key),
        Focus::Tone | Focus::Dialect => match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => InputResult::Action(Action::Right),
            _ => InputResult::Continue,
        },
        Focus::Temperature => match key.code {
            KeyCode::Char('+') | KeyCode::Up => InputResult::Action(Action::Right),
            KeyCode::Char('-') | KeyCode::Down => InputResult::Action(Action::Left),
            _ => InputResult::Continue,
        },
    }
}

fn handle_text_input(key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Char(c) if !has_command_modifier(key.modifiers) => InputResult::Char(c),
        KeyCode::Enter => InputResult::Newline,
        KeyCode::Backspace => InputResult::Backspace,
        _ => InputResult::Continue,
    }
}

fn handle_comment_input(key: KeyEvent) -> InputResult {
    // In comment popup: Enter sends, Esc cancels
    match key.code {
        KeyCode::Enter => InputResult::Action(Action::SendFeedback),
        KeyCode::Esc => InputResult::Action(Action::CancelFeedback),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputResult::Quit,
        KeyCode::Char(c) if !has_command_modifier(key.modifiers) => InputResult::Char(c),
        _ => InputResult::Continue,
    }
}

fn has_command_modifier(modifiers: KeyModifiers) -> bool {
    modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
