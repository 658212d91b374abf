use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Form navigation
    NextField,
    PrevField,
    /// Previous option / lower temperature
    Left,
    /// Next option / higher temperature
    Right,

    // Output pane
    ScrollUp,
    ScrollDown,

    // Actions
    Improve,
    Back,
    Quit,

    // Feedback widget
    RateUp,
    RateDown,
    SendFeedback,
    CancelFeedback,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            bindings: Self::default_bindings(),
        }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }

    /// Only modified keys and non-character keys are bound, so every plain
    /// character stays available to the email text area.
    fn default_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        // Navigation
        map.insert(key_code(KeyCode::Tab), Action::NextField);
        map.insert(shift_key_code(KeyCode::BackTab), Action::PrevField);
        map.insert(key_code(KeyCode::BackTab), Action::PrevField);
        map.insert(key_code(KeyCode::Left), Action::Left);
        map.insert(key_code(KeyCode::Right), Action::Right);
        map.insert(key_code(KeyCode::PageUp), Action::ScrollUp);
        map.insert(key_code(KeyCode::PageDown), Action::ScrollDown);

        // Actions
        map.insert(ctrl_key('s'), Action::Improve);
        map.insert(key_code(KeyCode::F(5)), Action::Improve);
        map.insert(key_code(KeyCode::Esc), Action::Back);
        map.insert(ctrl_key('q'), Action::Quit);
        map.insert(ctrl_key('c'), Action::Quit);

        // Feedback
        map.insert(ctrl_key('u'), Action::RateUp);
        map.insert(ctrl_key('d'), Action::RateDown);

        map
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn shift_key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get(&ctrl_key('s')), Some(Action::Improve));
        assert_eq!(bindings.get(&key_code(KeyCode::F(5))), Some(Action::Improve));
        assert_eq!(bindings.get(&ctrl_key('q')), Some(Action::Quit));
        assert_eq!(bindings.get(&ctrl_key('u')), Some(Action::RateUp));
        assert_eq!(bindings.get(&ctrl_key('d')), Some(Action::RateDown));
        assert_eq!(
            bindings.get(&shift_key_code(KeyCode::BackTab)),
            Some(Action::PrevField)
        );
    }

    #[test]
    fn test_plain_characters_are_unbound() {
        let bindings = KeyBindings::new();
        for c in ['q', 's', 'j', 'k', ' ', 'u', 'd'] {
            assert_eq!(
                bindings.get(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)),
                None
            );
        }
    }
}
