//! This module provides the `TransitionTable`, the immutable lookup structure mapping
//! (state, symbol) pairs to rules. Tables are built from the JSON ruleset format:
//!
//! ```json
//! {
//!   "s1": { "a": { "next_state": "s2", "replacement_symbol": "b", "direction": "R" } }
//! }
//! ```

use crate::types::{Direction, MachineError, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// A single rule as it appears in a ruleset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct WireRule {
    next_state: String,
    replacement_symbol: String,
    direction: String,
}

/// The two-level mapping of a ruleset file: state, then symbol, then rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct WireTable(BTreeMap<String, BTreeMap<String, WireRule>>);

/// Maps each state to the rules selected by the symbol under the head.
///
/// Lookups are exact matches; there are no wildcard symbols. Serializing a table
/// yields the ruleset format it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireTable", into = "WireTable")]
pub struct TransitionTable {
    rules: BTreeMap<String, BTreeMap<char, Rule>>,
}

impl TransitionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a table from ruleset JSON.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the JSON has the two-level shape and every rule is well formed.
    /// * `Err(MachineError::MalformedRuleset)` otherwise.
    pub fn from_json(input: &str) -> Result<Self, MachineError> {
        serde_json::from_str(input).map_err(|e| MachineError::MalformedRuleset(e.to_string()))
    }

    /// Parses a table from a reader yielding ruleset JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MachineError> {
        serde_json::from_reader(reader).map_err(|e| MachineError::MalformedRuleset(e.to_string()))
    }

    /// Serializes the table back into ruleset JSON.
    pub fn to_json(&self) -> Result<String, MachineError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MachineError::MalformedRuleset(e.to_string()))
    }

    /// Adds a rule for `(state, symbol)`, replacing any previous one.
    pub fn insert(&mut self, state: &str, symbol: char, rule: Rule) {
        self.rules
            .entry(state.to_string())
            .or_default()
            .insert(symbol, rule);
    }

    /// Builder-style variant of [`TransitionTable::insert`].
    pub fn with_rule(
        mut self,
        state: &str,
        symbol: char,
        next_state: &str,
        replacement: char,
        direction: Direction,
    ) -> Self {
        self.insert(
            state,
            symbol,
            Rule {
                next_state: next_state.to_string(),
                replacement,
                direction,
            },
        );
        self
    }

    /// Finds the rule for the given state and symbol.
    pub fn lookup(&self, state: &str, symbol: char) -> Option<&Rule> {
        self.rules.get(state).and_then(|rules| rules.get(&symbol))
    }

    /// Returns the rules defined for a single state.
    pub fn rules_for(&self, state: &str) -> Option<&BTreeMap<char, Rule>> {
        self.rules.get(state)
    }

    /// Iterates over every `(state, symbol, rule)` entry in the table.
    pub fn iter(&self) -> impl Iterator<Item = (&str, char, &Rule)> {
        self.rules.iter().flat_map(|(state, rules)| {
            rules
                .iter()
                .map(move |(&symbol, rule)| (state.as_str(), symbol, rule))
        })
    }

    /// Returns the legal state-to-state edges implied by the rules.
    ///
    /// Self-loops are omitted. The result is sorted and free of duplicates.
    pub fn transitions(&self) -> Vec<(String, String)> {
        let mut edges: Vec<(String, String)> = self
            .iter()
            .filter(|(state, _, rule)| *state != rule.next_state)
            .map(|(state, _, rule)| (state.to_string(), rule.next_state.clone()))
            .collect();

        edges.sort();
        edges.dedup();
        edges
    }

    /// Returns the states that have at least one rule.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Returns every state used as a `next_state`.
    pub fn referenced_states(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(_, _, rule)| rule.next_state.as_str())
    }

    /// Returns the total number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(BTreeMap::len).sum()
    }

    /// Checks whether the table has no rules at all.
    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }
}

/// Converts a ruleset string that must hold exactly one character.
fn single_char(text: &str, what: &str, state: &str) -> Result<char, MachineError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(MachineError::MalformedRuleset(format!(
            "{} '{}' in state '{}' must be exactly one character",
            what, text, state
        ))),
    }
}

impl TryFrom<WireTable> for TransitionTable {
    type Error = MachineError;

    fn try_from(wire: WireTable) -> Result<Self, Self::Error> {
        let mut table = TransitionTable::new();

        for (state, entries) in wire.0 {
            // A state with an empty mapping is still declared by the ruleset.
            table.rules.entry(state.clone()).or_default();

            for (symbol, entry) in entries {
                let symbol = single_char(&symbol, "Symbol", &state)?;
                let rule = Rule {
                    replacement: single_char(&entry.replacement_symbol, "Replacement symbol", &state)?,
                    direction: entry.direction.parse()?,
                    next_state: entry.next_state,
                };
                table.insert(&state, symbol, rule);
            }
        }

        Ok(table)
    }
}

impl From<TransitionTable> for WireTable {
    fn from(table: TransitionTable) -> Self {
        WireTable(
            table
                .rules
                .into_iter()
                .map(|(state, rules)| {
                    let entries = rules
                        .into_iter()
                        .map(|(symbol, rule)| {
                            (
                                symbol.to_string(),
                                WireRule {
                                    next_state: rule.next_state,
                                    replacement_symbol: rule.replacement.to_string(),
                                    direction: rule.direction.to_string(),
                                },
                            )
                        })
                        .collect();
                    (state, entries)
                })
                .collect(),
        )
    }
}
