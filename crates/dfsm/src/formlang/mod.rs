//! Table-based finite automata over `char` alphabets.
//!
//! - [`EpsilonNFA`] and its cached [`EpsilonClosures`]
//! - [`subset_construction`], producing a total [`DFA`]
//! - [`DfaSimulator`], which runs a DFA over an input sequence

mod closure;
mod dfa;
mod epsilon_nfa;
mod simulator;
mod state;
mod subset_construction;
mod symbol;

pub use closure::EpsilonClosures;
pub use dfa::DFA;
pub use epsilon_nfa::{Cell, EpsilonNFA};
pub use simulator::{DfaSimulator, Verdict, is_well_formed, run};
pub use state::{START_STATE, StateId, StateSet};
pub use subset_construction::subset_construction;
pub use symbol::{Alphabet, DEFAULT_EPSILON, Symbol, SymbolId};
