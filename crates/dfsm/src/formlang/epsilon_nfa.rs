//! Epsilon Non-deterministic Finite Automaton (ε-NFA) implementation.

use crate::error::{Error, Result};
use crate::formlang::closure::EpsilonClosures;
use crate::formlang::state::{StateId, StateSet, row_index};
use crate::formlang::symbol::{Alphabet, Symbol, SymbolId};

/// The successors of one state on one column.
pub type Cell = Vec<StateId>;

/// An Epsilon Non-deterministic Finite Automaton.
///
/// States are numbered `1..=num_states` and state 1 is the start state. Each
/// state owns a row with one cell per alphabet symbol followed by one cell
/// for its epsilon successors.
///
/// The table is stored as given: a row may be too short or name states that
/// do not exist. [`EpsilonNFA::validate`] and the closure computation report
/// such problems, so that a parsed automaton can be inspected before it is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpsilonNFA {
    /// All symbols except epsilon, in column order.
    alphabet: Alphabet,
    /// The marker written for the epsilon column.
    epsilon: Symbol,
    /// Transitions: `rows[state - 1][column]`, epsilon is the last column.
    rows: Vec<Vec<Cell>>,
    /// Final (accepting) states
    final_states: StateSet,
}

impl EpsilonNFA {
    /// Create an ε-NFA without states over the given alphabet.
    pub fn new(alphabet: Alphabet, epsilon: Symbol) -> Self {
        Self {
            alphabet,
            epsilon,
            rows: Vec::new(),
            final_states: StateSet::default(),
        }
    }

    /// Create an ε-NFA from a complete transition table.
    pub fn from_table<F>(
        alphabet: Alphabet,
        epsilon: Symbol,
        rows: Vec<Vec<Cell>>,
        finals: F,
    ) -> Self
    where
        F: IntoIterator<Item = StateId>,
    {
        Self {
            alphabet,
            epsilon,
            rows,
            final_states: finals.into_iter().collect(),
        }
    }

    /// Add a new state with no outgoing transitions and return its ID.
    pub fn add_state(&mut self) -> StateId {
        self.rows.push(vec![Vec::new(); self.width()]);
        self.rows.len() as StateId
    }

    /// Ensure a state exists, adding states up to it if needed.
    fn ensure_state(&mut self, state: StateId) {
        while (self.rows.len() as StateId) < state {
            self.add_state();
        }
    }

    /// Add a transition from source to destination on the given symbol.
    ///
    /// The epsilon marker selects the epsilon column.
    pub fn add_transition(
        &mut self,
        source: StateId,
        symbol: Symbol,
        destination: StateId,
    ) -> Result<()> {
        let column = if symbol == self.epsilon {
            self.epsilon_column()
        } else {
            self.alphabet.index_of(symbol).ok_or_else(|| {
                Error::malformed(format!("symbol {symbol:?} is not in the alphabet"))
            })?
        };
        if source == 0 || destination == 0 {
            return Err(Error::malformed("state ids start at 1"));
        }

        self.ensure_state(source.max(destination));
        let cell = &mut self.rows[row_index(source)][column];
        if !cell.contains(&destination) {
            cell.push(destination);
        }
        Ok(())
    }

    /// Add an epsilon transition from source to destination.
    pub fn add_epsilon_transition(
        &mut self,
        source: StateId,
        destination: StateId,
    ) -> Result<()> {
        self.add_transition(source, self.epsilon, destination)
    }

    /// Add a final (accepting) state.
    pub fn add_final_state(&mut self, state: StateId) {
        self.ensure_state(state);
        self.final_states.insert(state);
    }

    pub fn num_states(&self) -> StateId {
        self.rows.len() as StateId
    }

    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    /// Get the alphabet (all symbols except epsilon).
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn epsilon(&self) -> Symbol {
        self.epsilon
    }

    /// Column holding the epsilon successors.
    pub fn epsilon_column(&self) -> SymbolId {
        self.alphabet.len()
    }

    /// Number of cells a well-formed row has.
    pub fn width(&self) -> usize {
        self.alphabet.len() + 1
    }

    /// The transition row of a state.
    pub fn row(&self, state: StateId) -> Option<&[Cell]> {
        self.rows.get(row_index(state)).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = (StateId, &[Cell])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (idx as StateId + 1, row.as_slice()))
    }

    /// Successors of `state` on `column`. Missing rows and cells are empty.
    pub fn successors(&self, state: StateId, column: SymbolId) -> &[StateId] {
        self.row(state)
            .and_then(|row| row.get(column))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn epsilon_successors(&self, state: StateId) -> &[StateId] {
        self.successors(state, self.epsilon_column())
    }

    fn in_range(&self, state: StateId) -> bool {
        state >= 1 && state <= self.num_states()
    }

    /// Check the structure that subset construction relies on.
    ///
    /// Epsilon targets are checked by [`EpsilonClosures::compute`], which
    /// reports them as [`Error::InvalidEpsilonReference`].
    pub fn validate(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(Error::malformed("the automaton has no states"));
        }
        if self.alphabet.contains(self.epsilon) {
            return Err(Error::malformed(format!(
                "epsilon marker {:?} is also an alphabet symbol",
                self.epsilon
            )));
        }

        let width = self.width();
        for (state, row) in self.rows() {
            if row.len() != width {
                return Err(Error::malformed(format!(
                    "state {state} has {} transition columns, expected {width}",
                    row.len()
                )));
            }
            for (column, cell) in row[..self.epsilon_column()].iter().enumerate() {
                if let Some(&target) = cell.iter().find(|&&target| !self.in_range(target)) {
                    return Err(Error::malformed(format!(
                        "state {state} on {:?} goes to undefined state {target}",
                        self.alphabet.symbol(column).unwrap_or(self.epsilon)
                    )));
                }
            }
        }

        if let Some(state) = self.final_states.iter().find(|&s| !self.in_range(s)) {
            return Err(Error::malformed(format!(
                "accepting state {state} is not defined"
            )));
        }
        Ok(())
    }

    /// Get the states reachable from a set of states on one symbol column,
    /// without following epsilon transitions afterwards.
    pub fn move_on_symbol(&self, states: &StateSet, column: SymbolId) -> StateSet {
        debug_assert!(column < self.epsilon_column(), "use closures for epsilon moves");

        let mut reached = StateSet::with_capacity(self.rows.len() + 1);
        for state in states.iter() {
            for &target in self.successors(state, column) {
                reached.insert(target);
            }
        }
        reached
    }

    /// Decide membership by simulating the automaton directly, tracking the
    /// set of active states.
    ///
    /// This is the reference semantics a converted DFA must agree with.
    pub fn accepts(&self, input: &str) -> Result<bool> {
        self.validate()?;
        let closures = EpsilonClosures::compute(self)?;

        let mut current = closures.closure_of(1).clone();
        for (position, symbol) in input.chars().enumerate() {
            let column = self
                .alphabet
                .index_of(symbol)
                .ok_or(Error::UnknownSymbolInInput { symbol, position })?;
            current = closures.closure_of_set(&self.move_on_symbol(&current, column));
        }

        Ok(current.intersects(&self.final_states))
    }
}
