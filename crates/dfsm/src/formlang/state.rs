//! State types for automata.

use fixedbitset::FixedBitSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A state identifier. States are numbered densely starting at 1.
pub type StateId = u32;

/// The start state of every automaton.
pub const START_STATE: StateId = 1;

/// Index of a state's row in a transition table.
#[inline]
pub(crate) fn row_index(state: StateId) -> usize {
    (state as usize).wrapping_sub(1)
}

/// A set of states backed by a growable bit set.
///
/// Equality and hashing look only at the members, never at the capacity of
/// the underlying bits, so two sets built in different orders or with
/// different capacities compare equal whenever they hold the same states.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state into the set. Returns `true` if it was not present.
    pub fn insert(&mut self, state: StateId) -> bool {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        !self.bits.put(idx)
    }

    /// Check if the set contains a state.
    pub fn contains(&self, state: StateId) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over all states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check if this set intersects with another.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.bits.intersection(&other.bits).next().is_some()
    }

    /// Check whether every member of this set is also in `other`.
    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.iter().all(|state| other.contains(state))
    }

    /// Canonical sorted representation, used as a map key during subset
    /// construction.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for member in self.iter() {
            member.hash(state);
        }
        self.len().hash(state);
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::default();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

impl<'a> FromIterator<&'a StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = &'a StateId>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(10);
        assert!(set.is_empty());

        assert!(set.insert(3));
        assert!(set.insert(7));
        assert!(!set.insert(7));
        assert!(!set.is_empty());
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(!set.contains(5));
        assert!(!set.contains(500));
    }

    #[test]
    fn test_state_set_union() {
        let mut set1: StateSet = [1, 3].iter().collect();
        let set2: StateSet = [2, 3].iter().collect();

        set1.union_with(&set2);
        assert_eq!(set1.to_vec(), vec![1, 2, 3]);
        assert!(set2.is_subset(&set1));
        assert!(!set1.is_subset(&set2));
    }

    #[test]
    fn test_state_set_intersects() {
        let set1: StateSet = [1, 3, 5].iter().collect();
        let set2: StateSet = [2, 5].iter().collect();
        let set3: StateSet = [2, 4].iter().collect();

        assert!(set1.intersects(&set2));
        assert!(!set1.intersects(&set3));
        assert!(!set1.intersects(&StateSet::default()));
    }

    #[test]
    fn test_equality_ignores_capacity_and_order() {
        let small: StateSet = [4, 2].iter().collect();
        let mut large = StateSet::with_capacity(128);
        large.insert(2);
        large.insert(4);

        assert_eq!(small, large);

        let mut seen = HashSet::new();
        seen.insert(small);
        assert!(seen.contains(&large));
    }

    #[test]
    fn test_state_set_singleton() {
        let set = StateSet::singleton(5, 10);
        assert_eq!(set.len(), 1);
        assert!(set.contains(5));
        assert_eq!(format!("{set:?}"), "{5}");
    }
}
