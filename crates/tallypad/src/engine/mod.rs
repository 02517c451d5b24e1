//! Calculator engine: key model, state machine, formula evaluator, and the
//! session tape.
//!
//! The engine is single-threaded and synchronous. Every keypad press is a
//! pure transition from the current state to the next; no operation blocks,
//! retries, or escapes an error past the machine boundary.

pub mod eval;
pub mod keys;
pub mod machine;
pub mod tape;

pub use keys::{Digit, Key, Op};
pub use machine::{Calculator, Phase};
