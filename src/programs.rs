use crate::loader::{Program, ProgramLoader};
use crate::types::MachineError;

use log::error;
use std::sync::RwLock;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 3] = [
    include_str!("../programs/substitution.json"),
    include_str!("../programs/even-length.json"),
    include_str!("../programs/anbn.json"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Initialize the ProgramManager with the embedded programs
    pub fn load() -> Result<(), MachineError> {
        let mut programs = Vec::new();

        for program_text in PROGRAM_TEXTS {
            match ProgramLoader::load_program_from_string(program_text) {
                Ok(program) => programs.push(program),
                Err(e) => error!("Failed to parse embedded program: {}", e),
            }
        }

        if let Ok(mut write_guard) = PROGRAMS.write() {
            *write_guard = programs;
        } else {
            return Err(MachineError::FileError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Loads the embedded programs unless the registry is already populated.
    /// A failed load is logged and returned.
    fn ensure_loaded() -> Result<(), MachineError> {
        let empty = PROGRAMS.read().map(|programs| programs.is_empty()).unwrap_or(true);
        if empty {
            Self::load().inspect_err(|e| error!("Failed to load embedded programs: {}", e))?;
        }

        Ok(())
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        let _ = Self::ensure_loaded();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, MachineError> {
        Self::ensure_loaded()?;

        PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                MachineError::InvalidConfig(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name (case-insensitive)
    pub fn get_program_by_name(name: &str) -> Result<Program, MachineError> {
        Self::ensure_loaded()?;

        PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| MachineError::InvalidConfig(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        let _ = Self::ensure_loaded();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| program.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, MachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            initial_state: program
                .config
                .start_state()
                .unwrap_or_default()
                .to_string(),
            initial_tape: program.input.clone(),
            state_count: program.config.states.len(),
            rule_count: program.rules.rule_count(),
            name: program.name,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub initial_tape: String,
    pub state_count: usize,
    pub rule_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Run, Verdict, MAX_EXECUTION_STEPS};

    #[test]
    fn test_program_manager_initialization() {
        assert!(ProgramManager::load().is_ok());
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_ensure_loaded_populates_registry() {
        assert!(ProgramManager::ensure_loaded().is_ok());
        assert!(PROGRAMS.read().map(|programs| !programs.is_empty()).unwrap());
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert!(names.contains(&"Substitution".to_string()));
        assert!(names.contains(&"Even Length".to_string()));
        assert!(names.contains(&"Equal a and b".to_string()));
    }

    #[test]
    fn test_all_programs_accept_their_input() {
        for i in 0..ProgramManager::get_program_count() {
            let program = ProgramManager::get_program_by_index(i).unwrap();
            let mut machine = program.machine().unwrap();

            assert_eq!(
                machine.run_with_limit(MAX_EXECUTION_STEPS).unwrap(),
                Run::Halted(Verdict::Accepted),
                "Program '{}' did not accept its input",
                program.name
            );
        }
    }

    #[test]
    fn test_even_length() {
        let program = ProgramManager::get_program_by_name("even length").unwrap();

        for (input, expected) in [
            ("", Verdict::Accepted),
            ("aa", Verdict::Accepted),
            ("a", Verdict::Rejected),
            ("aaaaa", Verdict::Rejected),
        ] {
            let mut machine = program.machine_with_input(input).unwrap();
            assert_eq!(
                machine.run_with_limit(100).unwrap(),
                Run::Halted(expected),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_equal_a_and_b() {
        let program = ProgramManager::get_program_by_name("Equal a and b").unwrap();

        for (input, expected) in [
            ("ab", Verdict::Accepted),
            ("aaabbb", Verdict::Accepted),
            ("aab", Verdict::Rejected),
            ("abb", Verdict::Rejected),
            ("ba", Verdict::Rejected),
            ("aba", Verdict::Rejected),
        ] {
            let mut machine = program.machine_with_input(input).unwrap();
            assert_eq!(
                machine.run_with_limit(1000).unwrap(),
                Run::Halted(expected),
                "input {:?}",
                input
            );
        }

        let mut machine = program.machine_with_input("aabb").unwrap();
        machine.run().unwrap();
        assert_eq!(machine.tape_as_string(), "xxyy");
        assert!(machine.is_completed());
    }

    #[test]
    fn test_program_manager_lookup_errors() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(0).unwrap();

        assert_eq!(info.index, 0);
        assert_eq!(info.name, "Substitution");
        assert_eq!(info.initial_state, "s1");
        assert_eq!(info.initial_tape, "ab");
        assert_eq!(info.state_count, 4);
        assert_eq!(info.rule_count, 2);

        assert!(ProgramManager::get_program_info(999).is_err());
    }
}
