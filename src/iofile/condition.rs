// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use serde::Serialize;

/// Conjunction of control signals that must be asserted before the simulated
/// environment may read (inputs) or commit (outputs) an io file.
///
/// Clauses form a set: requiring a signal that is already present changes
/// nothing, so re-running a handshake hook cannot stack redundant clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IoCondition {
    clauses: Vec<String>,
}

impl IoCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(name: &str) -> Self {
        let mut condition = Self::new();
        condition.require(name);
        condition
    }

    /// Adds `signal` to the conjunction. Returns `false` if it was already
    /// required.
    pub fn require(&mut self, signal: &str) -> bool {
        let signal = signal.trim();
        if signal.is_empty() || self.clauses.iter().any(|c| c == signal) {
            return false;
        }
        self.clauses.push(signal.to_string());
        true
    }

    /// Conjoins an expression such as `"&& initdone"` or `"reset_n && initdone"`.
    /// Returns how many new clauses were added.
    pub fn append(&mut self, expr: &str) -> usize {
        expr.split("&&")
            .filter(|clause| self.require(clause))
            .count()
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when every clause is asserted. An empty condition always holds.
    pub fn is_satisfied<F>(&self, asserted: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        self.clauses.iter().all(|c| asserted(c))
    }
}

impl fmt::Display for IoCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str("1");
        }
        f.write_str(&self.clauses.join(" && "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_parses_conjunction_fragments() {
        let mut condition = IoCondition::signal("outputs_valid");
        assert_eq!(condition.append("&& initdone"), 1);
        assert_eq!(condition.to_string(), "outputs_valid && initdone");
    }

    #[test]
    fn test_reapplying_a_clause_is_a_no_op() {
        let mut condition = IoCondition::signal("outputs_valid");
        condition.append("&& initdone");
        assert_eq!(condition.append("&& initdone"), 0);
        assert!(!condition.require("initdone"));
        assert_eq!(condition.clauses().len(), 2);
    }

    #[test]
    fn test_empty_condition_always_holds() {
        let condition = IoCondition::new();
        assert!(condition.is_satisfied(|_| false));
        assert_eq!(condition.to_string(), "1");
    }

    #[test]
    fn test_satisfied_only_when_all_clauses_asserted() {
        let mut condition = IoCondition::signal("initdone");
        condition.require("outputs_valid");
        assert!(!condition.is_satisfied(|s| s == "initdone"));
        assert!(condition.is_satisfied(|_| true));
    }
}
