//! Key model for the keypad: digits, the four operators, and the full key
//! set a presentation layer can send to the machine.

use serde::{Deserialize, Serialize};

/// A validated decimal digit (0-9).
///
/// Construction is checked once so the machine never sees an out-of-range
/// digit key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    /// All ten digits in ascending order.
    pub const ALL: [Self; 10] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
        Self(8),
        Self(9),
    ];

    /// Creates a digit, rejecting values above 9.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the digit as its ASCII character.
    #[must_use]
    pub const fn to_char(self) -> char {
        (b'0' + self.0) as char
    }
}

impl TryFrom<u8> for Digit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("digit out of range: {value}"))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

/// The four keypad operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`×`)
    Multiply,
    /// Division (`÷`)
    Divide,
}

impl Op {
    /// Returns the display glyph shown in the formula strip.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Returns the ASCII form the evaluator normalizes to.
    #[must_use]
    pub const fn ascii(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Returns true if the character is one of the four display glyphs.
    #[must_use]
    pub const fn is_glyph(c: char) -> bool {
        matches!(c, '+' | '-' | '×' | '÷')
    }
}

/// One keypad press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "lowercase")]
pub enum Key {
    /// A digit key 0-9.
    Digit(Digit),
    /// One of the four operator keys.
    Op(Op),
    /// The decimal point key.
    Decimal,
    /// The equals key.
    Equals,
    /// The clear key.
    Clear,
}

impl Key {
    /// Maps a typed character to its keypad key, if any.
    ///
    /// Accepts both display glyphs (`×`, `÷`) and their keyboard forms
    /// (`*`, `/`).
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Digit::new(c as u8 - b'0').map(Self::Digit),
            '+' => Some(Self::Op(Op::Add)),
            '-' => Some(Self::Op(Op::Subtract)),
            '*' | '×' => Some(Self::Op(Op::Multiply)),
            '/' | '÷' => Some(Self::Op(Op::Divide)),
            '.' => Some(Self::Decimal),
            '=' => Some(Self::Equals),
            'c' | 'C' => Some(Self::Clear),
            _ => None,
        }
    }
}
