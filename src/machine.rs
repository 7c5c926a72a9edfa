//! This module defines the `TuringMachine` struct, which executes a single-tape deterministic
//! Turing Machine. It owns the current state, the tape, and the head position, and applies
//! the transition table one step at a time until the accept or reject state is reached.

use crate::analyzer::analyze;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{Direction, MachineError, Mode, Run, Step, Verdict, DEFAULT_MARKERS};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// The states of a machine and the roles some of them play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Every valid state name.
    pub states: Vec<String>,
    /// The state to start in. Defaults to the first declared state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// The terminal state that accepts the input.
    pub accept: String,
    /// The terminal state that rejects the input.
    pub reject: String,
    /// How incomplete rulesets are treated.
    #[serde(default)]
    pub mode: Mode,
}

impl MachineConfig {
    /// Creates a configuration in normal mode, starting in the first declared state.
    pub fn new(states: &[&str], accept: &str, reject: &str) -> Self {
        Self {
            states: states.iter().map(|s| s.to_string()).collect(),
            start: None,
            accept: accept.to_string(),
            reject: reject.to_string(),
            mode: Mode::default(),
        }
    }

    /// Sets an explicit start state.
    pub fn with_start(mut self, start: &str) -> Self {
        self.start = Some(start.to_string());
        self
    }

    /// Sets the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the explicit start state, or the first declared state.
    pub fn start_state(&self) -> Option<&str> {
        self.start
            .as_deref()
            .or_else(|| self.states.first().map(String::as_str))
    }
}

/// Represents a single-tape Turing Machine.
///
/// The machine exclusively owns its transition table, its configuration, and the
/// mutable part of the computation: current state, tape, and head.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    table: TransitionTable,
    config: MachineConfig,
    input: String,
    start: String,
    state: String,
    tape: Tape,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` for the given table, configuration, and input.
    ///
    /// The setup is analyzed before the machine is built, so every configuration
    /// error is raised here and never during a run.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` positioned at the start state with the head on cell 0.
    /// * `Err(MachineError::UnknownState)` if the start, accept, or reject state is not
    ///   declared, or (in strict mode) a rule targets an undeclared state.
    /// * `Err(MachineError::InvalidConfig)` if no states are declared.
    pub fn new(
        table: TransitionTable,
        config: MachineConfig,
        input: &str,
    ) -> Result<Self, MachineError> {
        analyze(&table, &config)?;

        let start = config
            .start_state()
            .ok_or_else(|| MachineError::InvalidConfig("No start state".to_string()))?
            .to_string();

        debug!(
            "Machine ready: {} rules, {} states, start={}, accept={}, reject={}, mode={:?}",
            table.rule_count(),
            config.states.len(),
            start,
            config.accept,
            config.reject,
            config.mode
        );

        Ok(Self {
            state: start.clone(),
            tape: Tape::new(input),
            input: input.to_string(),
            start,
            table,
            config,
            step_count: 0,
        })
    }

    /// Executes a single step of the computation.
    ///
    /// The symbol under the head selects a rule for the current state. On the tape the
    /// rule's symbol is written, the head moves, and the state changes. Past the end of
    /// the tape nothing is written: a right-moving rule sends the machine straight to the
    /// reject state, a left-moving rule backs the head up and changes state.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a rule was applied and the machine is not terminal.
    /// * `Ok(Step::Halt(_))` if the machine is (now) in the accept or reject state.
    /// * `Ok(Step::Stall)` if no rule matched; nothing changed.
    /// * `Err(MachineError::Stall)` instead of `Step::Stall` in strict mode.
    pub fn step(&mut self) -> Result<Step, MachineError> {
        if let Some(verdict) = self.verdict() {
            return Ok(Step::Halt(verdict));
        }

        let symbol = self.tape.read();
        let Some(rule) = self.table.lookup(&self.state, symbol).cloned() else {
            trace!("No rule for ({}, '{}'), stalling", self.state, symbol);
            return match self.config.mode {
                Mode::Normal => Ok(Step::Stall),
                Mode::Strict => Err(MachineError::Stall {
                    state: self.state.clone(),
                    symbol,
                }),
            };
        };

        if self.tape.is_off_end() {
            match rule.direction {
                Direction::Right => {
                    trace!("Head ran off the end of the tape, rejecting");
                    self.state = self.config.reject.clone();
                }
                Direction::Left => {
                    self.tape.retreat();
                    self.state = rule.next_state;
                }
            }
        } else {
            self.tape.write(rule.replacement);
            match rule.direction {
                Direction::Left => self.tape.move_left(),
                Direction::Right => self.tape.move_right(),
            }
            self.state = rule.next_state;
        }

        self.step_count += 1;
        trace!(
            "Step {}: state={}, head={}, tape={}",
            self.step_count,
            self.state,
            self.tape.head(),
            self.tape
        );

        Ok(match self.verdict() {
            Some(verdict) => Step::Halt(verdict),
            None => Step::Continue,
        })
    }

    /// Runs the machine until it reaches the accept or reject state.
    ///
    /// There is no halting guarantee: a machine that loops, or stalls in normal mode,
    /// never returns. Use [`TuringMachine::run_with_limit`] when that matters.
    pub fn run(&mut self) -> Result<Verdict, MachineError> {
        loop {
            if let Step::Halt(verdict) = self.step()? {
                debug!("Halted after {} steps: {}", self.step_count, verdict);
                return Ok(verdict);
            }
        }
    }

    /// Runs the machine for at most `max_steps` steps.
    ///
    /// Every step attempt counts against the budget, including stalls.
    ///
    /// # Returns
    ///
    /// * `Ok(Run::Halted(_))` if a terminal state was reached within the budget.
    /// * `Ok(Run::Exhausted { .. })` if the budget ran out first.
    /// * `Err(MachineError::Stall)` if a strict-mode machine stalled.
    pub fn run_with_limit(&mut self, max_steps: usize) -> Result<Run, MachineError> {
        for _ in 0..max_steps {
            if let Step::Halt(verdict) = self.step()? {
                debug!("Halted after {} steps: {}", self.step_count, verdict);
                return Ok(Run::Halted(verdict));
            }
        }

        if let Some(verdict) = self.verdict() {
            return Ok(Run::Halted(verdict));
        }

        debug!("Step budget of {} exhausted in state {}", max_steps, self.state);
        Ok(Run::Exhausted { steps: max_steps })
    }

    /// Returns the verdict if the machine is in a terminal state.
    ///
    /// The accept state is checked first, so it wins when it coincides with the reject state.
    pub fn verdict(&self) -> Option<Verdict> {
        if self.state == self.config.accept {
            Some(Verdict::Accepted)
        } else if self.state == self.config.reject {
            Some(Verdict::Rejected)
        } else {
            None
        }
    }

    /// Checks if the machine is in the accept or reject state.
    pub fn is_halted(&self) -> bool {
        self.verdict().is_some()
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the state the machine started in.
    pub fn initial_state(&self) -> &str {
        &self.start
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.tape.head()
    }

    /// Returns the symbol under the head (blank past the end of the tape).
    pub fn symbol(&self) -> char {
        self.tape.read()
    }

    /// Returns the tape contents as a string.
    pub fn tape_as_string(&self) -> String {
        self.tape.to_string()
    }

    /// Returns the number of rules applied so far. Stalls are not counted.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Returns the machine configuration.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Checks whether the tape holds only blanks and the default marker symbols.
    ///
    /// This is informational and has no effect on halting.
    pub fn is_completed(&self) -> bool {
        self.is_completed_with(&DEFAULT_MARKERS)
    }

    /// Checks whether the tape holds only blanks and the given marker symbols.
    pub fn is_completed_with(&self, markers: &[char]) -> bool {
        self.tape.is_completed(markers)
    }

    /// Resets the machine to its initial configuration.
    /// This includes resetting the state, tape, head position, and step count.
    pub fn reset(&mut self) {
        self.state = self.start.clone();
        self.tape = Tape::new(&self.input);
        self.step_count = 0;
    }

    /// Replaces the input and resets the machine.
    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: [&str; 4] = ["s1", "s2", "sAccept", "sReject"];

    fn config() -> MachineConfig {
        MachineConfig::new(&STATES, "sAccept", "sReject")
    }

    fn machine(table: TransitionTable, input: &str) -> TuringMachine {
        TuringMachine::new(table, config(), input).unwrap()
    }

    #[test]
    fn test_machine_creation() {
        let table = TransitionTable::new().with_rule("s1", 'a', "s2", 'b', Direction::Right);
        let machine = machine(table, "ab");

        assert_eq!(machine.state(), "s1");
        assert_eq!(machine.initial_state(), "s1");
        assert_eq!(machine.tape_as_string(), "ab");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_explicit_start_state() {
        let table = TransitionTable::new().with_rule("s2", 'a', "sAccept", 'a', Direction::Right);
        let mut machine =
            TuringMachine::new(table, config().with_start("s2"), "a").unwrap();

        assert_eq!(machine.state(), "s2");
        assert_eq!(machine.run().unwrap(), Verdict::Accepted);
    }

    #[test]
    fn test_accepts_simple_input() {
        let table = TransitionTable::new()
            .with_rule("s1", 'a', "s2", 'b', Direction::Right)
            .with_rule("s2", 'b', "sAccept", 'b', Direction::Right);
        let mut machine = machine(table, "ab");

        assert_eq!(machine.step().unwrap(), Step::Continue);
        assert_eq!(machine.state(), "s2");
        assert_eq!(machine.head(), 1);

        assert_eq!(machine.step().unwrap(), Step::Halt(Verdict::Accepted));
        assert_eq!(machine.tape_as_string(), "bb");
        assert_eq!(machine.head(), 2);
        assert_eq!(machine.step_count(), 2);
    }

    #[test]
    fn test_left_at_zero_is_clamped() {
        let table = TransitionTable::new()
            .with_rule("s1", 'a', "s2", 'x', Direction::Left)
            .with_rule("s2", 'x', "sAccept", 'x', Direction::Right);
        let mut machine = machine(table, "a");

        assert_eq!(machine.step().unwrap(), Step::Continue);
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.tape_as_string(), "x");
        assert_eq!(machine.state(), "s2");
    }

    #[test]
    fn test_right_past_end_then_right_rejects() {
        let table = TransitionTable::new()
            .with_rule("s1", 'a', "s2", 'a', Direction::Right)
            .with_rule("s2", '_', "sAccept", 'z', Direction::Right);
        let mut machine = machine(table, "a");

        machine.step().unwrap();
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.symbol(), '_');

        assert_eq!(machine.step().unwrap(), Step::Halt(Verdict::Rejected));
        assert_eq!(machine.state(), "sReject");
        assert_eq!(machine.tape_as_string(), "a", "nothing is written past the end");
    }

    #[test]
    fn test_right_past_end_then_left_retreats() {
        let table = TransitionTable::new()
            .with_rule("s1", 'a', "s1", 'a', Direction::Right)
            .with_rule("s1", '_', "s2", 'z', Direction::Left);
        let mut machine = machine(table, "aa");

        machine.step().unwrap();
        machine.step().unwrap();
        assert_eq!(machine.head(), 2);

        assert_eq!(machine.step().unwrap(), Step::Continue);
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.state(), "s2");
        assert_eq!(machine.tape_as_string(), "aa");
    }

    #[test]
    fn test_stall_is_a_no_op() {
        let table = TransitionTable::new().with_rule("s1", 'b', "s2", 'b', Direction::Right);
        let mut machine = machine(table, "a");

        assert_eq!(machine.step().unwrap(), Step::Stall);
        assert_eq!(machine.state(), "s1");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.tape_as_string(), "a");
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_stall_in_strict_mode() {
        let table = TransitionTable::new().with_rule("s1", 'b', "s2", 'b', Direction::Right);
        let mut machine =
            TuringMachine::new(table, config().with_mode(Mode::Strict), "a").unwrap();

        assert_eq!(
            machine.step(),
            Err(MachineError::Stall {
                state: "s1".to_string(),
                symbol: 'a',
            })
        );
    }

    #[test]
    fn test_terminal_state_takes_no_steps() {
        let table = TransitionTable::new().with_rule("sAccept", 'a', "s1", 'b', Direction::Right);
        let mut machine =
            TuringMachine::new(table, config().with_start("sAccept"), "a").unwrap();

        assert_eq!(machine.step().unwrap(), Step::Halt(Verdict::Accepted));
        assert_eq!(machine.tape_as_string(), "a");
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_accept_wins_when_states_coincide() {
        let config = MachineConfig::new(&["s1", "sDone"], "sDone", "sDone");
        let table = TransitionTable::new().with_rule("s1", 'a', "sDone", 'a', Direction::Right);
        let mut machine = TuringMachine::new(table, config, "a").unwrap();

        assert_eq!(machine.run().unwrap(), Verdict::Accepted);
    }

    #[test]
    fn test_run_with_limit_exhausts() {
        let table = TransitionTable::new().with_rule("s1", 'a', "s1", 'a', Direction::Left);
        let mut machine = machine(table, "a");

        assert_eq!(machine.run_with_limit(50).unwrap(), Run::Exhausted { steps: 50 });
        assert_eq!(machine.step_count(), 50);
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.state(), "s1");
    }

    #[test]
    fn test_run_with_zero_budget() {
        let table = TransitionTable::new().with_rule("s1", 'a', "sAccept", 'a', Direction::Right);
        let mut machine = machine(table, "a");

        assert_eq!(machine.run_with_limit(0).unwrap(), Run::Exhausted { steps: 0 });
        assert_eq!(machine.run_with_limit(1).unwrap(), Run::Halted(Verdict::Accepted));
        assert_eq!(machine.run_with_limit(0).unwrap(), Run::Halted(Verdict::Accepted));
    }

    #[test]
    fn test_empty_input() {
        let table = TransitionTable::new().with_rule("s1", '_', "s2", 'x', Direction::Left);
        let mut machine = machine(table, "");

        assert_eq!(machine.symbol(), '_');
        assert_eq!(machine.step().unwrap(), Step::Continue);
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.state(), "s2");
        assert_eq!(machine.tape_as_string(), "");
    }

    #[test]
    fn test_reset_and_set_input() {
        let table = TransitionTable::new()
            .with_rule("s1", 'a', "s2", 'b', Direction::Right)
            .with_rule("s2", 'b', "sAccept", 'b', Direction::Right);
        let mut machine = machine(table, "ab");

        machine.run().unwrap();
        machine.reset();
        assert_eq!(machine.state(), "s1");
        assert_eq!(machine.tape_as_string(), "ab");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);

        machine.set_input("bb");
        assert_eq!(machine.tape_as_string(), "bb");
        assert_eq!(machine.run_with_limit(10).unwrap(), Run::Exhausted { steps: 10 });
    }

    #[test]
    fn test_is_completed() {
        let table = TransitionTable::new()
            .with_rule("s1", 'a', "s1", 'x', Direction::Right)
            .with_rule("s1", 'b', "s1", 'y', Direction::Right)
            .with_rule("s1", '_', "s1", '_', Direction::Right);
        let mut machine = machine(table, "ab");

        assert!(!machine.is_completed());
        assert_eq!(machine.run().unwrap(), Verdict::Rejected);
        assert_eq!(machine.tape_as_string(), "xy");
        assert!(machine.is_completed());
        assert!(!machine.is_completed_with(&['x']));
    }

    #[test]
    fn test_invalid_configuration() {
        let table = TransitionTable::new();

        let result = TuringMachine::new(
            table.clone(),
            MachineConfig::new(&["s1"], "sAccept", "sReject"),
            "a",
        );
        assert!(matches!(result, Err(MachineError::UnknownState(_))));

        let result = TuringMachine::new(table, MachineConfig::new(&[], "a", "r"), "a");
        assert!(matches!(result, Err(MachineError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_deserialization() {
        let config: MachineConfig = serde_json::from_str(
            r#"{"states": ["q0", "qa", "qr"], "accept": "qa", "reject": "qr", "mode": "strict"}"#,
        )
        .unwrap();

        assert_eq!(config.start_state(), Some("q0"));
        assert_eq!(config.mode, Mode::Strict);
    }
}
