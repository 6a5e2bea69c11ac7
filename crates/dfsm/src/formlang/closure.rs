//! Epsilon closures of every state of an ε-NFA.

use log::trace;

use crate::error::{Error, Result};
use crate::formlang::epsilon_nfa::EpsilonNFA;
use crate::formlang::state::{StateId, StateSet, row_index};

/// The epsilon closure of every state, computed once up front.
#[derive(Debug, Clone)]
pub struct EpsilonClosures {
    /// `closures[state - 1]` is the closure of `state`.
    closures: Vec<StateSet>,
}

impl EpsilonClosures {
    /// Compute the closure of every state of `nfa`.
    ///
    /// Fails with [`Error::InvalidEpsilonReference`] if an epsilon transition
    /// names a state outside `1..=nfa.num_states()`.
    pub fn compute(nfa: &EpsilonNFA) -> Result<Self> {
        let num_states = nfa.num_states();

        for state in 1..=num_states {
            if let Some(&target) = nfa
                .epsilon_successors(state)
                .iter()
                .find(|&&target| target == 0 || target > num_states)
            {
                return Err(Error::InvalidEpsilonReference { state, target });
            }
        }

        let closures = (1..=num_states)
            .map(|state| closure_single(nfa, state))
            .collect();
        Ok(Self { closures })
    }

    /// The closure of a single state. Always contains `state` itself.
    ///
    /// # Panics
    ///
    /// If `state` is not a state of the automaton the closures were computed
    /// for.
    pub fn closure_of(&self, state: StateId) -> &StateSet {
        &self.closures[row_index(state)]
    }

    /// The union of the closures of every member of `states`.
    pub fn closure_of_set(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::with_capacity(self.closures.len() + 1);
        for state in states.iter() {
            closure.union_with(self.closure_of(state));
        }
        closure
    }

    pub fn len(&self) -> usize {
        self.closures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }
}

/// Depth-first walk over epsilon edges with an explicit stack.
///
/// A state is pushed at most once: it is marked when first reached, so cycles
/// end the walk instead of repeating it.
fn closure_single(nfa: &EpsilonNFA, state: StateId) -> StateSet {
    let mut closure = StateSet::with_capacity(nfa.num_states() as usize + 1);
    let mut stack = vec![state];
    closure.insert(state);

    while let Some(s) = stack.pop() {
        for &dest in nfa.epsilon_successors(s) {
            if closure.insert(dest) {
                stack.push(dest);
            }
        }
    }

    trace!("epsilon closure of {state}: {closure:?}");
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formlang::symbol::Alphabet;

    fn nfa_with_epsilons(num_states: StateId, epsilons: &[(StateId, StateId)]) -> EpsilonNFA {
        let alphabet = Alphabet::try_from_symbols(['a']).unwrap();
        let mut nfa = EpsilonNFA::new(alphabet, '$');
        for _ in 0..num_states {
            nfa.add_state();
        }
        for &(from, to) in epsilons {
            nfa.add_epsilon_transition(from, to).unwrap();
        }
        nfa
    }

    #[test]
    fn test_epsilon_chain() {
        // 1 -ε-> 2 -ε-> 3
        let nfa = nfa_with_epsilons(3, &[(1, 2), (2, 3)]);
        let closures = EpsilonClosures::compute(&nfa).unwrap();

        assert_eq!(closures.len(), 3);
        assert_eq!(closures.closure_of(1).to_vec(), vec![1, 2, 3]);
        assert_eq!(closures.closure_of(2).to_vec(), vec![2, 3]);
        assert_eq!(closures.closure_of(3).to_vec(), vec![3]);
    }

    #[test]
    fn test_epsilon_cycle() {
        // 1 -ε-> 2, cycle 2 -> 3 -> 4 -> 2, and 4 -ε-> 5 leaving the cycle
        let nfa = nfa_with_epsilons(5, &[(1, 2), (2, 3), (3, 4), (4, 2), (4, 5)]);
        let closures = EpsilonClosures::compute(&nfa).unwrap();

        let expected = vec![2, 3, 4, 5];
        assert_eq!(closures.closure_of(2).to_vec(), expected);
        assert_eq!(closures.closure_of(3).to_vec(), expected);
        assert_eq!(closures.closure_of(4).to_vec(), expected);
        assert_eq!(closures.closure_of(1).to_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(closures.closure_of(5).to_vec(), vec![5]);
    }

    #[test]
    fn test_self_loop() {
        let nfa = nfa_with_epsilons(2, &[(1, 1)]);
        let closures = EpsilonClosures::compute(&nfa).unwrap();
        assert_eq!(closures.closure_of(1).to_vec(), vec![1]);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let n = 5_000;
        let edges: Vec<_> = (1..n).map(|s| (s, s + 1)).collect();
        let nfa = nfa_with_epsilons(n, &edges);
        let closures = EpsilonClosures::compute(&nfa).unwrap();
        assert_eq!(closures.closure_of(1).len(), n as usize);
    }

    #[test]
    fn test_closure_of_set_is_idempotent() {
        let nfa = nfa_with_epsilons(4, &[(1, 2), (3, 4), (4, 3)]);
        let closures = EpsilonClosures::compute(&nfa).unwrap();

        let set: StateSet = [1, 3].iter().collect();
        let once = closures.closure_of_set(&set);
        let twice = closures.closure_of_set(&once);
        assert_eq!(once.to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_epsilon_reference() {
        let alphabet = Alphabet::try_from_symbols(['a']).unwrap();
        let nfa = EpsilonNFA::from_table(
            alphabet,
            '$',
            vec![vec![vec![], vec![2]], vec![vec![], vec![3]]],
            [],
        );
        let err = EpsilonClosures::compute(&nfa).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEpsilonReference {
                state: 2,
                target: 3
            }
        ));
    }
}
