//! Application state: the calculator plus front-end concerns (keypad
//! highlighting, mouse hit testing, quit flag).

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tallypad::prelude::{Calculator, Key, KeyScript};
use tracing::debug;

use crate::input::Action;
use crate::keypad::Grid;

/// Front-end application state.
#[derive(Debug)]
pub struct App {
    calculator: Calculator,
    grid: Grid,
    /// Screen area the keypad was last drawn into, for mouse hit testing.
    keypad_area: Option<Rect>,
    /// Most recent key, highlighted on the keypad.
    last_key: Option<Key>,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates the application in its default state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calculator: Calculator::new(),
            grid: Grid::new(),
            keypad_area: None,
            last_key: None,
            should_quit: false,
        }
    }

    /// Returns the calculator.
    #[must_use]
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Returns the keypad grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the key to highlight on the keypad.
    #[must_use]
    pub fn last_key(&self) -> Option<Key> {
        self.last_key
    }

    /// Returns true once a quit action has been handled.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Records where the keypad was drawn. Called by the renderer each
    /// frame so clicks resolve against the current layout.
    pub fn set_keypad_area(&mut self, area: Rect) {
        self.keypad_area = Some(area);
    }

    /// Forwards one keypad press to the calculator.
    pub fn press(&mut self, key: Key) {
        debug!(?key, "keypad press");
        self.calculator.press(key);
        self.last_key = Some(key);
    }

    /// Applies one mapped action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Press(key) => self.press(key),
            Action::ClearTape => self.calculator.clear_tape(),
            Action::Quit => self.should_quit = true,
        }
    }

    /// Resolves a mouse event against the keypad. Only left-button presses
    /// inside the keypad area do anything.
    pub fn handle_mouse(&mut self, event: &MouseEvent) {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(area) = self.keypad_area else {
            return;
        };
        if let Some(key) = self.grid.hit_test(area, event.column, event.row) {
            self.press(key);
        }
    }

    /// Replays a recorded script into the calculator.
    pub fn replay(&mut self, script: &KeyScript) {
        debug!(keys = script.keys.len(), "replaying script");
        script.run(&mut self.calculator);
        self.last_key = script.keys.last().copied();
    }
}
