//! This module validates a transition table against a machine configuration before any step
//! is executed. Fatal problems are reported as `AnalysisError`s; suspicious but legal setups
//! are returned (and logged) as warnings.

use crate::machine::MachineConfig;
use crate::table::TransitionTable;
use crate::types::{Direction, MachineError, Mode, BLANK_SYMBOL};
use log::warn;
use std::collections::HashSet;

/// Represents the fatal problems found while analyzing a machine setup.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No states were declared.
    EmptyStateSet,
    /// The start state is not in the declared state set.
    UnknownStartState(String),
    /// The accept state is not in the declared state set.
    UnknownAcceptState(String),
    /// The reject state is not in the declared state set.
    UnknownRejectState(String),
    /// Rules point at states outside the declared state set (strict mode only).
    UndefinedNextStates(Vec<String>),
}

impl From<AnalysisError> for MachineError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::EmptyStateSet => {
                MachineError::InvalidConfig("No states declared".to_string())
            }
            AnalysisError::UnknownStartState(state) => {
                MachineError::UnknownState(format!("start state '{}' is not declared", state))
            }
            AnalysisError::UnknownAcceptState(state) => {
                MachineError::UnknownState(format!("accept state '{}' is not declared", state))
            }
            AnalysisError::UnknownRejectState(state) => {
                MachineError::UnknownState(format!("reject state '{}' is not declared", state))
            }
            AnalysisError::UndefinedNextStates(transitions) => MachineError::UnknownState(
                format!("rules reference undeclared states: {:?}", transitions),
            ),
        }
    }
}

type Check = fn(&TransitionTable, &MachineConfig) -> Result<(), AnalysisError>;

/// Analyzes a transition table and configuration for setup errors.
///
/// The checks run in order and the first failure is returned. On success the
/// non-fatal warnings are returned; each one has already been logged.
///
/// # Arguments
///
/// * `table` - The transition table the machine will run.
/// * `config` - The declared states, start/accept/reject states, and mode.
///
/// # Returns
///
/// * `Ok(Vec<String>)` with the warnings if the setup is usable.
/// * `Err(AnalysisError)` for the first fatal problem found.
pub fn analyze(
    table: &TransitionTable,
    config: &MachineConfig,
) -> Result<Vec<String>, AnalysisError> {
    let checks: [Check; 4] = [
        check_state_set,
        check_start_state,
        check_terminal_states,
        check_next_states,
    ];

    if let Some(error) = checks.iter().find_map(|f| f(table, config).err()) {
        return Err(error);
    }

    let warnings = collect_warnings(table, config);
    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok(warnings)
}

fn declared(config: &MachineConfig) -> HashSet<&str> {
    config.states.iter().map(String::as_str).collect()
}

fn check_state_set(_: &TransitionTable, config: &MachineConfig) -> Result<(), AnalysisError> {
    if config.states.is_empty() {
        return Err(AnalysisError::EmptyStateSet);
    }

    Ok(())
}

/// The start state must be declared; an absent start falls back to the first declared state.
fn check_start_state(_: &TransitionTable, config: &MachineConfig) -> Result<(), AnalysisError> {
    match config.start_state() {
        Some(start) if declared(config).contains(start) => Ok(()),
        Some(start) => Err(AnalysisError::UnknownStartState(start.to_string())),
        None => Err(AnalysisError::EmptyStateSet),
    }
}

fn check_terminal_states(
    _: &TransitionTable,
    config: &MachineConfig,
) -> Result<(), AnalysisError> {
    let states = declared(config);

    if !states.contains(config.accept.as_str()) {
        return Err(AnalysisError::UnknownAcceptState(config.accept.clone()));
    }
    if !states.contains(config.reject.as_str()) {
        return Err(AnalysisError::UnknownRejectState(config.reject.clone()));
    }

    Ok(())
}

/// In strict mode, every `next_state` must be declared.
fn check_next_states(table: &TransitionTable, config: &MachineConfig) -> Result<(), AnalysisError> {
    if config.mode != Mode::Strict {
        return Ok(());
    }

    let undefined = undefined_next_states(table, config);
    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedNextStates(undefined));
    }

    Ok(())
}

/// Lists every rule whose next state is not declared, as `state[symbol] -> next`.
fn undefined_next_states(table: &TransitionTable, config: &MachineConfig) -> Vec<String> {
    let states = declared(config);

    table
        .iter()
        .filter(|(_, _, rule)| !states.contains(rule.next_state.as_str()))
        .map(|(state, symbol, rule)| format!("{}[{}] -> {}", state, symbol, rule.next_state))
        .collect()
}

fn collect_warnings(table: &TransitionTable, config: &MachineConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let states = declared(config);

    let undefined = undefined_next_states(table, config);
    if !undefined.is_empty() {
        warnings.push(format!(
            "Rules reference undeclared states: {:?}",
            undefined
        ));
    }

    let mut undeclared_sources: Vec<&str> =
        table.states().filter(|s| !states.contains(s)).collect();
    if !undeclared_sources.is_empty() {
        undeclared_sources.sort();
        warnings.push(format!(
            "Rules defined for undeclared states: {:?}",
            undeclared_sources
        ));
    }

    if !reaches_terminal_state(table, config) {
        warnings.push(format!(
            "No rule path leads from '{}' to '{}' or '{}'; the machine cannot halt",
            config.start_state().unwrap_or_default(),
            config.accept,
            config.reject
        ));
    }

    warnings
}

/// Searches the rule graph from the start state for the accept or reject state.
///
/// A reachable right-moving rule keyed on the blank symbol also reaches the reject
/// state, since it fires past the end of the tape. Right moves on any other symbol
/// only lead to their `next_state`.
fn reaches_terminal_state(table: &TransitionTable, config: &MachineConfig) -> bool {
    let Some(start) = config.start_state() else {
        return false;
    };

    let mut visited = HashSet::new();
    let mut queue = vec![start];

    while let Some(state) = queue.pop() {
        if state == config.accept || state == config.reject {
            return true;
        }
        if !visited.insert(state) {
            continue;
        }

        if let Some(rules) = table.rules_for(state) {
            for (&symbol, rule) in rules {
                if symbol == BLANK_SYMBOL && rule.direction == Direction::Right {
                    return true;
                }
                if !visited.contains(rule.next_state.as_str()) {
                    queue.push(rule.next_state.as_str());
                }
            }
        }
    }

    false
}
