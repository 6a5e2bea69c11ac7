//! Deterministic Finite Automaton (DFA) implementation.

use std::collections::HashMap;

use crate::formlang::state::{START_STATE, StateId, StateSet, row_index};
use crate::formlang::symbol::{Alphabet, Symbol, SymbolId};

/// A Deterministic Finite Automaton.
///
/// States are numbered `1..=num_states`, state 1 is the start state and each
/// state has one row holding a target per alphabet symbol. DFAs produced by
/// subset construction are total; DFAs read from text are kept as written and
/// checked by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFA {
    alphabet: Alphabet,
    /// Transitions: `rows[state - 1][column]`
    rows: Vec<Vec<StateId>>,
    /// Final (accepting) states
    final_states: StateSet,
    /// The non-accepting sink, if one was created
    dead_state: Option<StateId>,
    /// Mapping from DFA states to original NFA states (if created via subset construction)
    state_mapping: Option<HashMap<StateId, Vec<StateId>>>,
}

impl DFA {
    /// Create a DFA without states.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            rows: Vec::new(),
            final_states: StateSet::default(),
            dead_state: None,
            state_mapping: None,
        }
    }

    /// Create a DFA from a complete transition table.
    pub fn from_table<F>(alphabet: Alphabet, rows: Vec<Vec<StateId>>, finals: F) -> Self
    where
        F: IntoIterator<Item = StateId>,
    {
        Self {
            alphabet,
            rows,
            final_states: finals.into_iter().collect(),
            dead_state: None,
            state_mapping: None,
        }
    }

    /// Add a new state with an empty row and return its ID.
    pub fn add_state(&mut self) -> StateId {
        self.rows.push(Vec::with_capacity(self.alphabet.len()));
        self.rows.len() as StateId
    }

    /// Add a non-accepting state that loops to itself on every symbol.
    pub fn add_dead_state(&mut self) -> StateId {
        let id = self.add_state();
        self.rows[row_index(id)] = vec![id; self.alphabet.len()];
        self.dead_state = Some(id);
        id
    }

    /// Replace the whole row of an existing state.
    ///
    /// # Panics
    ///
    /// If `state` was not created by [`DFA::add_state`].
    pub fn set_row(&mut self, state: StateId, row: Vec<StateId>) {
        self.rows[row_index(state)] = row;
    }

    /// Add a final (accepting) state.
    pub fn add_final_state(&mut self, state: StateId) {
        self.final_states.insert(state);
    }

    /// Get the transition from a state on a symbol column.
    pub fn transition(&self, source: StateId, symbol: SymbolId) -> Option<StateId> {
        self.row(source).and_then(|row| row.get(symbol)).copied()
    }

    pub fn row(&self, state: StateId) -> Option<&[StateId]> {
        self.rows.get(row_index(state)).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = (StateId, &[StateId])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx as StateId + 1, row.as_slice()))
    }

    pub fn num_states(&self) -> StateId {
        self.rows.len() as StateId
    }

    pub fn start_state(&self) -> StateId {
        START_STATE
    }

    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(state)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn dead_state(&self) -> Option<StateId> {
        self.dead_state
    }

    /// Set the state mapping from original NFA states.
    pub fn set_state_mapping(&mut self, mapping: HashMap<StateId, Vec<StateId>>) {
        self.state_mapping = Some(mapping);
    }

    /// Get the state mapping.
    pub fn state_mapping(&self) -> Option<&HashMap<StateId, Vec<StateId>>> {
        self.state_mapping.as_ref()
    }

    /// Get all transitions as an iterator, in row then column order.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.rows().flat_map(move |(src, row)| {
            self.alphabet
                .iter()
                .zip(row.iter())
                .map(move |((_, symbol), &dst)| (src, symbol, dst))
        })
    }

    /// Whether every state has exactly one in-range target per symbol.
    pub fn is_total(&self) -> bool {
        let num_states = self.num_states();
        self.rows.iter().all(|row| {
            row.len() == self.alphabet.len()
                && row.iter().all(|&dst| dst >= 1 && dst <= num_states)
        })
    }
}
