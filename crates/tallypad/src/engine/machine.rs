//! The keypad state machine: accumulates a formula string from presses,
//! evaluates it on demand, and keeps the display text a front end renders.

use tracing::debug;

use crate::engine::eval;
use crate::engine::keys::{Digit, Key, Op};
use crate::engine::tape::Tape;

/// Sentinel display value for a failed evaluation.
pub const ERROR_DISPLAY: &str = "Error";

/// Classifies the most recent accepted input.
///
/// `Evaluated` doubles as the fresh-input marker: the next digit or decimal
/// press starts a new formula instead of extending the old one. No other
/// variant carries that meaning, so the separate "waiting for new input"
/// flag the display logic would otherwise need collapses into this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No input accepted yet, or just cleared.
    #[default]
    Start,
    /// Last press was a digit.
    Number,
    /// Last press was an operator.
    Operator,
    /// Last press was the decimal point.
    Decimal,
    /// Last press was equals; the display holds a result (or `"Error"`).
    Evaluated,
}

/// The calculator state machine behind the keypad.
///
/// Every press runs to completion synchronously; evaluation failures are
/// absorbed into the `"Error"` display and never escape as errors.
#[derive(Debug, Clone)]
pub struct Calculator {
    /// Text currently shown to the user.
    display: String,
    /// Accumulated expression text, plus `=result` once evaluated.
    formula: String,
    /// Classification of the most recent accepted input.
    phase: Phase,
    /// Record of completed evaluations this session.
    tape: Tape,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// Display shown before any input.
    const DEFAULT_DISPLAY: &'static str = "0";

    /// Widest display rendering before truncation.
    pub const DISPLAY_WINDOW: usize = 12;

    /// Widest formula rendering before truncation.
    pub const FORMULA_WINDOW: usize = 25;

    /// Creates a machine in its default state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            display: Self::DEFAULT_DISPLAY.to_string(),
            formula: String::new(),
            phase: Phase::Start,
            tape: Tape::new(),
        }
    }

    /// Returns the full display text (operand, operator glyph, result, or
    /// `"Error"`). Never empty.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Returns the full accumulated formula text.
    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Returns the current input phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the session tape.
    #[must_use]
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns true while the display holds the error sentinel.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    /// Display text truncated for rendering: at most
    /// [`Self::DISPLAY_WINDOW`] characters, with a `...` suffix beyond that.
    /// Display-only; the underlying state is untouched.
    #[must_use]
    pub fn display_window(&self) -> String {
        if self.display.chars().count() > Self::DISPLAY_WINDOW {
            let head: String = self.display.chars().take(Self::DISPLAY_WINDOW).collect();
            format!("{head}...")
        } else {
            self.display.clone()
        }
    }

    /// Formula text truncated for rendering: the last
    /// [`Self::FORMULA_WINDOW`] characters, with a `...` prefix beyond that.
    #[must_use]
    pub fn formula_window(&self) -> String {
        let len = self.formula.chars().count();
        if len > Self::FORMULA_WINDOW {
            let tail: String = self
                .formula
                .chars()
                .skip(len - Self::FORMULA_WINDOW)
                .collect();
            format!("...{tail}")
        } else {
            self.formula.clone()
        }
    }

    /// Dispatches one keypad press.
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(digit) => self.press_digit(digit),
            Key::Op(op) => self.press_operator(op),
            Key::Decimal => self.press_decimal(),
            Key::Equals => self.press_equals(),
            Key::Clear => self.press_clear(),
        }
    }

    /// Handles a digit key.
    pub fn press_digit(&mut self, digit: Digit) {
        if self.is_error() {
            self.reset();
        }

        let d = digit.to_char();
        match self.phase {
            Phase::Evaluated => {
                self.display.clear();
                self.display.push(d);
                self.formula.clear();
                self.formula.push(d);
            }
            _ if self.display == Self::DEFAULT_DISPLAY => {
                // Suppress a redundant leading zero entirely; a nonzero
                // digit replaces the "0" placeholder.
                if d != '0' {
                    self.display.clear();
                    self.display.push(d);
                    if self.formula.ends_with('0') {
                        self.formula.pop();
                    }
                    self.formula.push(d);
                }
            }
            _ => {
                self.display.push(d);
                self.formula.push(d);
            }
        }
        self.phase = Phase::Number;
    }

    /// Handles an operator key.
    pub fn press_operator(&mut self, op: Op) {
        if self.is_error() {
            return;
        }

        let glyph = op.glyph();
        match self.phase {
            Phase::Evaluated => {
                // Chain a new computation off the displayed result.
                let chained = format!("{}{}", self.display, glyph);
                self.formula = chained;
            }
            Phase::Operator => {
                // Subtract after an operator spells a negative operand;
                // anything else is last-operator-wins. The trailing run is
                // capped at two glyphs so the formula never carries three
                // operators in a row.
                if op == Op::Subtract && self.trailing_operator_run() < 2 {
                    self.formula.push(glyph);
                } else {
                    self.formula.pop();
                    self.formula.push(glyph);
                }
            }
            _ => {
                self.formula.push(glyph);
            }
        }
        self.display.clear();
        self.display.push(glyph);
        self.phase = Phase::Operator;
    }

    /// Handles the decimal point key.
    pub fn press_decimal(&mut self) {
        if self.is_error() {
            self.reset();
            return;
        }

        match self.phase {
            Phase::Evaluated => {
                self.display = "0.".to_string();
                self.formula = "0.".to_string();
            }
            Phase::Operator => {
                // Begin a new operand.
                self.display = "0.".to_string();
                self.formula.push_str("0.");
            }
            _ if !self.display.contains('.') => {
                self.display.push('.');
                self.formula.push('.');
            }
            _ => {}
        }
        self.phase = Phase::Decimal;
    }

    /// Handles the equals key, evaluating the accumulated formula.
    ///
    /// Guarded no-op while in the error state, immediately after a previous
    /// equals, with an empty formula, or with a trailing operator.
    pub fn press_equals(&mut self) {
        if self.is_error()
            || self.phase == Phase::Evaluated
            || self.phase == Phase::Operator
            || self.formula.is_empty()
        {
            return;
        }

        let result = match eval::evaluate_formula(&self.formula) {
            Ok(rendered) => rendered,
            Err(error) => {
                debug!(%error, formula = %self.formula, "evaluation failed");
                ERROR_DISPLAY.to_string()
            }
        };

        if result != ERROR_DISPLAY {
            self.tape.record(&self.formula, &result);
        }

        self.formula.push('=');
        self.formula.push_str(&result);
        self.display = result;
        self.phase = Phase::Evaluated;
    }

    /// Handles the clear key: unconditional reset to defaults. The session
    /// tape survives; see [`Self::clear_tape`].
    pub fn press_clear(&mut self) {
        self.reset();
    }

    /// Empties the session tape.
    pub fn clear_tape(&mut self) {
        self.tape.clear();
    }

    fn reset(&mut self) {
        self.display.clear();
        self.display.push_str(Self::DEFAULT_DISPLAY);
        self.formula.clear();
        self.phase = Phase::Start;
    }

    /// Length of the run of operator glyphs at the end of the formula.
    fn trailing_operator_run(&self) -> usize {
        self.formula
            .chars()
            .rev()
            .take_while(|c| Op::is_glyph(*c))
            .count()
    }
}
