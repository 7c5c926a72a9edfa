//! This module provides the `ProgramLoader` struct, responsible for loading rulesets and
//! complete machine programs from files and strings.

use crate::machine::{MachineConfig, TuringMachine};
use crate::table::TransitionTable;
use crate::types::MachineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A complete machine definition: the state configuration, a sample input, and the ruleset.
///
/// ```json
/// {
///   "name": "Example",
///   "states": ["s1", "s2", "sAccept", "sReject"],
///   "accept": "sAccept",
///   "reject": "sReject",
///   "input": "ab",
///   "rules": { "s1": { "a": { "next_state": "s2", "replacement_symbol": "b", "direction": "R" } } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The name of the program.
    pub name: String,
    /// The states, start/accept/reject states, and mode.
    #[serde(flatten)]
    pub config: MachineConfig,
    /// The initial tape content.
    #[serde(default)]
    pub input: String,
    /// The transition table in ruleset format.
    pub rules: TransitionTable,
}

impl Program {
    /// Builds a machine for this program on its own input.
    pub fn machine(&self) -> Result<TuringMachine, MachineError> {
        self.machine_with_input(&self.input)
    }

    /// Builds a machine for this program on the given input.
    pub fn machine_with_input(&self, input: &str) -> Result<TuringMachine, MachineError> {
        TuringMachine::new(self.rules.clone(), self.config.clone(), input)
    }
}

/// `ProgramLoader` is a utility struct for loading rulesets and programs.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a bare ruleset (the two-level transition mapping) from a JSON file.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the file is read and parsed successfully.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::MalformedRuleset)` if the content is not a valid ruleset.
    pub fn load_ruleset(path: &Path) -> Result<TransitionTable, MachineError> {
        let content = read(path)?;
        Self::load_ruleset_from_string(&content)
    }

    /// Loads a bare ruleset from JSON text.
    pub fn load_ruleset_from_string(content: &str) -> Result<TransitionTable, MachineError> {
        TransitionTable::from_json(content)
    }

    /// Loads a complete program from a JSON file.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is read and parsed successfully.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::MalformedRuleset)` if the content is not a valid program.
    pub fn load_program(path: &Path) -> Result<Program, MachineError> {
        let content = read(path)?;
        Self::load_program_from_string(&content)
    }

    /// Loads a complete program from JSON text.
    pub fn load_program_from_string(content: &str) -> Result<Program, MachineError> {
        serde_json::from_str(content).map_err(|e| MachineError::MalformedRuleset(e.to_string()))
    }

    /// Loads all program files (`.json` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the
    /// result is either the path and its program, or the error for that file.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                Some(Self::load_program(&path).map(|program| (path, program)))
            })
            .collect()
    }
}

fn read(path: &Path) -> Result<String, MachineError> {
    fs::read_to_string(path).map_err(|e| {
        MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}
