//! Session tape: the in-memory record of completed evaluations.
//!
//! Bounded so a long session cannot grow without limit. The tape lives only
//! for the current session; nothing is written to disk.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One completed evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeEntry {
    /// Formula text as typed, display glyphs included.
    pub formula: String,
    /// Rendered result.
    pub result: String,
}

impl TapeEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(formula: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            result: result.into(),
        }
    }

    /// One-line rendering for the tape panel, e.g. `5+3=8`.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{}={}", self.formula, self.result)
    }
}

/// Bounded record of completed evaluations.
#[derive(Debug, Clone, Default)]
pub struct Tape {
    entries: VecDeque<TapeEntry>,
    max_entries: usize,
}

impl Tape {
    /// Default maximum tape length.
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    /// Creates an empty tape with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    /// Creates an empty tape with a custom maximum length.
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
        }
    }

    /// Appends an entry, evicting the oldest once full.
    pub fn push(&mut self, entry: TapeEntry) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Records a completed evaluation.
    pub fn record(&mut self, formula: &str, result: &str) {
        self.push(TapeEntry::new(formula, result));
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tape is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TapeEntry> {
        self.entries.iter()
    }

    /// Iterates newest first.
    pub fn iter_rev(&self) -> impl Iterator<Item = &TapeEntry> {
        self.entries.iter().rev()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&TapeEntry> {
        self.entries.back()
    }

    /// Returns the entry at the given index (0 = oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TapeEntry> {
        self.entries.get(index)
    }

    /// Serializes the entries to JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying serializer error.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries.iter().collect::<Vec<_>>())
    }

    /// Rebuilds a tape from JSON entries.
    ///
    /// # Errors
    ///
    /// Returns the underlying deserializer error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<TapeEntry> = serde_json::from_str(json)?;
        let mut tape = Self::new();
        for entry in entries {
            tape.push(entry);
        }
        Ok(tape)
    }
}
