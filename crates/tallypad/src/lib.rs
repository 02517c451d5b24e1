//! Tallypad - a single-screen keypad calculator engine.
//!
//! The crate owns the behavioral core of a visual calculator: a small state
//! machine that accumulates a formula string from keypad presses, evaluates
//! it on demand through a sandboxed arithmetic parser, and exposes the
//! display/formula text a presentation layer renders. Button layout, styling
//! and input-device wiring live in the front-end crate (`tallypad-tui`).
//!
//! # Example
//!
//! ```rust
//! use tallypad::prelude::*;
//!
//! let mut calc = Calculator::new();
//! calc.press_digit(Digit::ALL[5]);
//! calc.press_operator(Op::Add);
//! calc.press_digit(Digit::ALL[3]);
//! calc.press_equals();
//!
//! assert_eq!(calc.display(), "8");
//! assert_eq!(calc.formula(), "5+3=8");
//! ```

// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod engine;
pub mod script;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::eval::{evaluate_formula, EvalError};
    pub use crate::engine::keys::{Digit, Key, Op};
    pub use crate::engine::machine::{Calculator, Phase, ERROR_DISPLAY};
    pub use crate::engine::tape::{Tape, TapeEntry};
    pub use crate::script::{KeyScript, ScriptError};
}
