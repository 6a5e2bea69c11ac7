//! Run-time options shared by the library pipeline and the CLI.

use std::path::PathBuf;

use crate::formlang::{DEFAULT_EPSILON, DfaSimulator, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Marker for the epsilon column of NFAs built from patterns.
    pub epsilon: Symbol,
    /// Where to write the intermediate NFA, if anywhere.
    pub nfa_output: Option<PathBuf>,
    /// Where to write the constructed DFA, if anywhere.
    pub dfa_output: Option<PathBuf>,
    /// Reject DFAs whose rows reach one state on two symbols.
    pub require_injective_rows: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            nfa_output: None,
            dfa_output: None,
            require_injective_rows: true,
        }
    }
}

impl Config {
    pub fn simulator(&self) -> DfaSimulator {
        DfaSimulator::new().require_injective_rows(self.require_injective_rows)
    }
}
