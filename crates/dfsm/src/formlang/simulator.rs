//! Table-driven DFA execution.

use std::fmt;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::formlang::dfa::DFA;
use crate::formlang::state::{StateId, StateSet};

/// Outcome of running an automaton over an input sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Accepted => "yes",
            Verdict::Rejected => "no",
        })
    }
}

/// Runs DFAs over input sequences.
#[derive(Debug, Clone, Copy)]
pub struct DfaSimulator {
    /// Reject DFAs in which two symbols of one row share a target.
    require_injective_rows: bool,
}

impl Default for DfaSimulator {
    fn default() -> Self {
        Self {
            require_injective_rows: true,
        }
    }
}

impl DfaSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the rule that no two symbols of a row may share a
    /// target.
    ///
    /// The rule is on by default. Most DFAs have rows that break it (the dead
    /// state does whenever the alphabet has two symbols), so switching it off
    /// is the only way to run them.
    pub fn require_injective_rows(mut self, yes: bool) -> Self {
        self.require_injective_rows = yes;
        self
    }

    /// Check the shape of `dfa`, naming the first violation found.
    ///
    /// Every row must have exactly one entry per alphabet symbol, every
    /// target and accepting state must be a defined state and, unless
    /// disabled, no two entries of a row may be equal.
    pub fn check_well_formed(&self, dfa: &DFA) -> Result<()> {
        let width = dfa.alphabet().len();
        let num_states = dfa.num_states();
        let defined = |target: StateId| (1..=num_states).contains(&target);

        for (state, row) in dfa.rows() {
            if row.len() != width {
                return Err(Error::malformed(format!(
                    "state {state} has {} transitions, expected {width}",
                    row.len()
                )));
            }
            if let Some((column, &target)) =
                row.iter().enumerate().find(|&(_, &target)| !defined(target))
            {
                let symbol = dfa.alphabet().symbol(column).unwrap_or('?');
                return Err(Error::malformed(format!(
                    "state {state} on {symbol:?} goes to undefined state {target}"
                )));
            }

            if self.require_injective_rows {
                let mut seen = StateSet::with_capacity(dfa.num_states() as usize + 1);
                for (column, &target) in row.iter().enumerate() {
                    if !seen.insert(target) {
                        let symbol = dfa.alphabet().symbol(column).unwrap_or('?');
                        return Err(Error::malformed(format!(
                            "state {state} reaches state {target} on more than one symbol (again on {symbol:?})"
                        )));
                    }
                }
            }
        }

        if let Some(state) = dfa.final_states().iter().find(|&state| !defined(state)) {
            return Err(Error::malformed(format!(
                "accepting state {state} is not defined"
            )));
        }
        Ok(())
    }

    pub fn is_well_formed(&self, dfa: &DFA) -> bool {
        self.check_well_formed(dfa).is_ok()
    }

    /// Run `dfa` over `input`, one `char` per symbol.
    ///
    /// The DFA is checked first; a DFA that is not well formed fails with
    /// [`Error::MalformedSpec`] before any input is read, so every step of
    /// the run stays inside the table.
    pub fn run(&self, dfa: &DFA, input: &str) -> Result<Verdict> {
        self.check_well_formed(dfa)?;

        let mut state = dfa.start_state();
        if dfa.row(state).is_none() {
            return Err(Error::malformed("the automaton has no states"));
        }

        for (position, symbol) in input.chars().enumerate() {
            let column = dfa
                .alphabet()
                .index_of(symbol)
                .ok_or(Error::UnknownSymbolInInput { symbol, position })?;
            let next = dfa.transition(state, column).ok_or_else(|| {
                Error::malformed(format!("state {state} has no transition on {symbol:?}"))
            })?;
            trace!("{state} --{symbol:?}--> {next}");
            state = next;
        }

        let verdict = Verdict::from(dfa.is_final(state));
        debug!("input of {} symbols ends in state {state}: {verdict}", input.chars().count());
        Ok(verdict)
    }
}

/// Check a DFA with the default rules.
pub fn is_well_formed(dfa: &DFA) -> bool {
    DfaSimulator::default().is_well_formed(dfa)
}

/// Run a DFA with the default rules.
pub fn run(dfa: &DFA, input: &str) -> Result<Verdict> {
    DfaSimulator::default().run(dfa, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formlang::symbol::Alphabet;

    fn alphabet(symbols: &str) -> Alphabet {
        Alphabet::try_from_symbols(symbols.chars()).unwrap()
    }

    /// Substring DFA for "ab" as produced by subset construction.
    fn ab_dfa() -> DFA {
        DFA::from_table(
            alphabet("ab"),
            vec![vec![2, 1], vec![2, 3], vec![4, 3], vec![4, 3]],
            [3, 4],
        )
    }

    #[test]
    fn test_run_substring_dfa() {
        let dfa = ab_dfa();
        assert!(is_well_formed(&dfa));
        assert_eq!(run(&dfa, "aab").unwrap(), Verdict::Accepted);
        assert_eq!(run(&dfa, "ba").unwrap(), Verdict::Rejected);
        assert_eq!(run(&dfa, "").unwrap(), Verdict::Rejected);
    }

    #[test]
    fn test_unknown_symbol() {
        let err = run(&ab_dfa(), "xab").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownSymbolInInput {
                symbol: 'x',
                position: 0
            }
        ));
    }

    #[test]
    fn test_first_symbol_is_not_confused_with_unknown() {
        // Column 0 must be reachable like any other column.
        let dfa = DFA::from_table(alphabet("ab"), vec![vec![2, 1], vec![1, 2]], [2]);
        assert_eq!(run(&dfa, "a").unwrap(), Verdict::Accepted);
        assert_eq!(run(&dfa, "aa").unwrap(), Verdict::Rejected);
    }

    #[test]
    fn test_wrong_row_width() {
        let dfa = DFA::from_table(alphabet("ab"), vec![vec![1]], [1]);
        assert!(!is_well_formed(&dfa));
        assert!(matches!(run(&dfa, "a"), Err(Error::MalformedSpec(_))));
    }

    #[test]
    fn test_shared_target_in_row() {
        // 'a' and 'b' both loop on state 1.
        let dfa = DFA::from_table(alphabet("ab"), vec![vec![1, 1]], [1]);
        assert!(!is_well_formed(&dfa));

        let err = run(&dfa, "ab").unwrap_err();
        assert!(err.to_string().contains("more than one symbol"));

        let lenient = DfaSimulator::new().require_injective_rows(false);
        assert!(lenient.is_well_formed(&dfa));
        assert_eq!(lenient.run(&dfa, "ab").unwrap(), Verdict::Accepted);
    }

    #[test]
    fn test_single_symbol_rows_are_injective() {
        let dfa = DFA::from_table(alphabet("a"), vec![vec![1]], [1]);
        assert!(is_well_formed(&dfa));
        assert_eq!(run(&dfa, "aaaa").unwrap(), Verdict::Accepted);
    }

    #[test]
    fn test_undefined_target() {
        // Row 1 names state 7 on 'b'; rejected even if the input never reads 'b'.
        let dfa = DFA::from_table(alphabet("ab"), vec![vec![2, 7], vec![2, 1]], [2]);
        assert!(!is_well_formed(&dfa));
        for input in ["", "a", "b"] {
            let err = run(&dfa, input).unwrap_err();
            assert!(err.to_string().contains("undefined state 7"), "{input:?}: {err}");
        }

        let lenient = DfaSimulator::new().require_injective_rows(false);
        assert!(matches!(lenient.run(&dfa, "a"), Err(Error::MalformedSpec(_))));
    }

    #[test]
    fn test_huge_target_rejected_before_injectivity_check() {
        let dfa = DFA::from_table(alphabet("ab"), vec![vec![StateId::MAX, 1]], [1]);
        let err = run(&dfa, "a").unwrap_err();
        assert!(err.to_string().contains("undefined state 4294967295"));
    }

    #[test]
    fn test_undefined_accepting_state() {
        let dfa = DFA::from_table(alphabet("a"), vec![vec![1]], [5]);
        assert!(!is_well_formed(&dfa));

        let err = run(&dfa, "a").unwrap_err();
        assert!(matches!(err, Error::MalformedSpec(_)));
        assert!(err.to_string().contains("accepting state 5"));

        let lenient = DfaSimulator::new().require_injective_rows(false);
        assert!(!lenient.is_well_formed(&dfa));
    }

    #[test]
    fn test_empty_dfa() {
        let dfa = DFA::new(alphabet("a"));
        assert!(matches!(run(&dfa, ""), Err(Error::MalformedSpec(_))));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Accepted.to_string(), "yes");
        assert_eq!(Verdict::Rejected.to_string(), "no");
        assert!(Verdict::from(true).is_accepted());
    }
}
