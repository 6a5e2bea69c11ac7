//! Subset construction algorithm for converting ε-NFA to DFA.

use indexmap::IndexMap;
use log::debug;
use std::collections::{HashMap, VecDeque};

use crate::error::Result;
use crate::formlang::closure::EpsilonClosures;
use crate::formlang::dfa::DFA;
use crate::formlang::epsilon_nfa::EpsilonNFA;
use crate::formlang::state::{START_STATE, StateId, StateSet};

/// Hands out DFA state ids in discovery order for one construction.
#[derive(Debug)]
struct StateAllocator {
    next: StateId,
}

impl StateAllocator {
    fn new() -> Self {
        Self { next: START_STATE }
    }

    fn allocate(&mut self, dfa: &mut DFA) -> StateId {
        let id = dfa.add_state();
        debug_assert_eq!(id, self.next);
        self.next += 1;
        id
    }

    fn allocate_dead(&mut self, dfa: &mut DFA) -> StateId {
        let id = dfa.add_dead_state();
        debug_assert_eq!(id, self.next);
        self.next += 1;
        id
    }
}

/// Convert an epsilon-NFA to a DFA using the powerset construction algorithm.
///
/// The result is total: a subset with no successors on a symbol leads to a
/// single dead state, created the first time it is needed. DFA ids are
/// assigned in the order the subsets are first reached, starting with the
/// closure of NFA state 1 as DFA state 1.
pub fn subset_construction(nfa: &EpsilonNFA) -> Result<DFA> {
    nfa.validate()?;
    let closures = EpsilonClosures::compute(nfa)?;
    let alphabet = nfa.alphabet();

    // Each DFA state corresponds to a set of NFA states, keyed by its sorted
    // members.
    let mut state_mapping: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut allocator = StateAllocator::new();
    let mut dead_state: Option<StateId> = None;
    let mut dfa = DFA::new(alphabet.clone());

    // Queue of DFA states to process (as NFA state sets)
    let mut worklist: VecDeque<(StateId, StateSet)> = VecDeque::new();

    let initial_set = closures.closure_of(START_STATE).clone();
    let initial_dfa_state = allocator.allocate(&mut dfa);
    state_mapping.insert(initial_set.to_vec(), initial_dfa_state);
    worklist.push_back((initial_dfa_state, initial_set));

    while let Some((current_dfa_state, current_nfa_set)) = worklist.pop_front() {
        let mut row = Vec::with_capacity(alphabet.len());

        for (column, _) in alphabet.iter() {
            let moved = nfa.move_on_symbol(&current_nfa_set, column);
            let next_nfa_set = closures.closure_of_set(&moved);

            let next_dfa_state = if next_nfa_set.is_empty() {
                *dead_state.get_or_insert_with(|| allocator.allocate_dead(&mut dfa))
            } else {
                let next_vec = next_nfa_set.to_vec();
                match state_mapping.get(&next_vec) {
                    Some(&existing) => existing,
                    None => {
                        let new_state = allocator.allocate(&mut dfa);
                        state_mapping.insert(next_vec, new_state);
                        worklist.push_back((new_state, next_nfa_set));
                        new_state
                    }
                }
            };
            row.push(next_dfa_state);
        }

        dfa.set_row(current_dfa_state, row);
        if current_nfa_set.intersects(nfa.final_states()) {
            dfa.add_final_state(current_dfa_state);
        }
    }

    debug!(
        "subset construction: {} NFA states -> {} DFA states (dead state: {:?})",
        nfa.num_states(),
        dfa.num_states(),
        dead_state
    );

    // Store the NFA-to-DFA state mapping in the DFA for later use
    let mut inverse_mapping: HashMap<StateId, Vec<StateId>> = state_mapping
        .into_iter()
        .map(|(nfa_states, dfa_state)| (dfa_state, nfa_states))
        .collect();
    if let Some(dead) = dead_state {
        inverse_mapping.insert(dead, Vec::new());
    }
    dfa.set_state_mapping(inverse_mapping);

    Ok(dfa)
}
