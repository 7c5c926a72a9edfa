//! This module defines the `Tape`, a fixed-length sequence of symbols with a read/write head.
//! The tape never grows: reads past the end yield the blank symbol and writes past the end
//! are refused.

use crate::types::BLANK_SYMBOL;
use std::fmt;

/// A fixed-length tape and the position of the head on it.
///
/// The head may sit at or beyond the end of the tape, which the engine treats as
/// blank territory. It never moves below position 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
}

impl Tape {
    /// Creates a tape holding the characters of `input`, with the head at position 0.
    pub fn new(input: &str) -> Self {
        Self {
            cells: input.chars().collect(),
            head: 0,
        }
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the tape cells.
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Returns the number of cells on the tape.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Checks whether the tape has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checks whether the head is at or beyond the end of the tape.
    pub fn is_off_end(&self) -> bool {
        self.head >= self.cells.len()
    }

    /// Returns the symbol under the head, or the blank symbol past the end.
    pub fn read(&self) -> char {
        self.cells.get(self.head).copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Writes `symbol` under the head.
    ///
    /// Returns `false` without writing when the head is past the end of the tape.
    pub fn write(&mut self, symbol: char) -> bool {
        match self.cells.get_mut(self.head) {
            Some(cell) => {
                *cell = symbol;
                true
            }
            None => false,
        }
    }

    /// Moves the head one cell left. At position 0 this is a no-op.
    pub fn move_left(&mut self) {
        self.head = self.head.saturating_sub(1);
    }

    /// Moves the head one cell right, possibly past the end of the tape.
    pub fn move_right(&mut self) {
        self.head += 1;
    }

    /// Backs the head up by one cell after it has run off the end.
    ///
    /// On an empty tape the head is already at 0 and stays there.
    pub fn retreat(&mut self) {
        self.head = self.head.saturating_sub(1);
    }

    /// Checks whether every cell holds the blank symbol or one of `markers`.
    pub fn is_completed(&self, markers: &[char]) -> bool {
        self.cells
            .iter()
            .all(|c| *c == BLANK_SYMBOL || markers.contains(c))
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{}", c))
    }
}
