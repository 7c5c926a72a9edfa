//! This crate provides the core logic for a single-tape deterministic Turing Machine simulator.
//! It includes modules for building transition tables from JSON rulesets, validating a machine
//! configuration, executing the machine step by step, and a small catalogue of sample programs.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports `Program` and `ProgramLoader` from the loader module.
pub use loader::{Program, ProgramLoader};
/// Re-exports the `TuringMachine` and its configuration from the machine module.
pub use machine::{MachineConfig, TuringMachine};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `TransitionTable` from the table module.
pub use table::TransitionTable;
/// Re-exports the `Tape` from the tape module.
pub use tape::Tape;
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, MachineError, Mode, Rule, Run, Step, Verdict, BLANK_SYMBOL, DEFAULT_MARKERS,
    MAX_EXECUTION_STEPS,
};
