//! Keyboard mapping: terminal key events to application actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tallypad::prelude::Key;

/// High-level actions the front end performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Forward a keypad press to the calculator.
    Press(Key),
    /// Empty the session tape.
    ClearTape,
    /// Leave the application.
    Quit,
}

/// Maps a terminal key event to an action.
///
/// Returns `None` for keys with no binding. Plain characters go through the
/// keypad alphabet, so both ASCII (`*`, `/`) and display glyph (`×`, `÷`)
/// forms work, as do `c` for clear and `=`/Enter for equals.
#[must_use]
pub fn map_key(event: &KeyEvent) -> Option<Action> {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('l') => Some(Action::ClearTape),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Enter => Some(Action::Press(Key::Equals)),
        KeyCode::Esc => Some(Action::Press(Key::Clear)),
        KeyCode::Char(c) => Key::from_char(c).map(Action::Press),
        _ => None,
    }
}
