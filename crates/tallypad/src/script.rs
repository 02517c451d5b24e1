//! Key-script replay: drive the machine from a recorded key sequence.
//!
//! Scripts exist in two forms: a JSON document (what `tallypad-tui
//! --replay` consumes) and a compact one-character-per-key text form used
//! heavily in tests, e.g. `"5+3="`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::keys::Key;
use crate::engine::machine::Calculator;

/// Script parsing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Character with no keypad equivalent.
    #[error("no keypad key for character '{0}'")]
    UnknownKey(char),
}

/// A recorded sequence of keypad presses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyScript {
    /// Presses in order.
    pub keys: Vec<Key>,
}

impl KeyScript {
    /// Creates a script from a key sequence.
    #[must_use]
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// Parses the compact text form, one key per character. Whitespace is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownKey`] for any character outside the
    /// keypad alphabet.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut keys = Vec::with_capacity(text.len());
        for c in text.chars() {
            if c.is_whitespace() {
                continue;
            }
            keys.push(Key::from_char(c).ok_or(ScriptError::UnknownKey(c))?);
        }
        Ok(Self { keys })
    }

    /// Deserializes a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying deserializer error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the script to JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying serializer error.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Replays the script against a calculator.
    pub fn run(&self, calc: &mut Calculator) {
        for key in &self.keys {
            calc.press(*key);
        }
    }

    /// Replays the script on a fresh calculator and returns it.
    #[must_use]
    pub fn run_fresh(&self) -> Calculator {
        let mut calc = Calculator::new();
        self.run(&mut calc);
        calc
    }
}
