//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including rules, head directions, execution outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The symbol read from any position beyond the written input.
pub const BLANK_SYMBOL: char = '_';
/// Marker symbols that count as "processed" when inspecting a finished tape.
pub const DEFAULT_MARKERS: [char; 3] = ['x', 'y', 'z'];
/// The default step budget used by bounded runs.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// Represents a single transition rule of the machine.
///
/// A rule is selected by the pair (current state, symbol under the head) and tells the
/// machine what to write, where to move, and which state to enter next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The state the machine transitions to.
    pub next_state: String,
    /// The symbol written at the head position.
    pub replacement: char,
    /// The direction the head moves after writing.
    pub direction: Direction,
}

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl FromStr for Direction {
    type Err = MachineError;

    /// Parses the ruleset spelling of a direction, `L` or `R` in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" | "l" => Ok(Direction::Left),
            "R" | "r" => Ok(Direction::Right),
            other => Err(MachineError::MalformedRuleset(format!(
                "Invalid direction '{}', expected 'L' or 'R'",
                other
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "L"),
            Direction::Right => write!(f, "R"),
        }
    }
}

/// Controls how the engine treats incomplete rulesets.
///
/// - `Normal` (default): a missing rule is a silent no-op and undeclared next states
///   only produce a warning.
/// - `Strict`: a missing rule is a `Stall` error and undeclared next states are rejected
///   when the machine is built.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Strict,
}

/// The terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "Accepted"),
            Verdict::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A rule was applied and the machine is not in a terminal state.
    Continue,
    /// No rule matched the current state and symbol; nothing changed.
    Stall,
    /// The machine is in the accept or reject state.
    Halt(Verdict),
}

/// Represents the outcome of a run bounded by a step budget.
#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    /// The machine reached a terminal state.
    Halted(Verdict),
    /// The budget ran out before a terminal state was reached.
    Exhausted { steps: usize },
}

/// Represents various errors that can occur while building or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// The ruleset could not be shaped into a two-level transition table.
    #[error("Malformed ruleset: {0}")]
    MalformedRuleset(String),
    /// A state was referenced that is not in the declared state set.
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// No rule is defined for the current state and symbol (strict mode only).
    #[error("No rule defined for state {state} and symbol '{symbol}'")]
    Stall { state: String, symbol: char },
    /// The machine configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Indicates an error related to file system operations, such as reading ruleset files.
    #[error("File error: {0}")]
    FileError(String),
}
