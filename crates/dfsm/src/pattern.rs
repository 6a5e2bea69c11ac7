//! Substring-matching NFAs built from literal patterns.

use log::debug;

use crate::error::{Error, Result};
use crate::formlang::{Alphabet, Cell, EpsilonNFA, StateId, Symbol};

/// Build an NFA accepting every string over the pattern's characters that
/// contains `pattern` as a substring.
///
/// The automaton has `len + 1` states in a chain. State 1 loops on every
/// symbol and also advances on the first pattern character, state `k`
/// advances on `pattern[k - 1]`, and the last state loops on every symbol and
/// is the only accepting state. The alphabet is the distinct characters of
/// the pattern in order of first occurrence. There are no epsilon
/// transitions.
pub fn build_substring_nfa(pattern: &str, epsilon: Symbol) -> Result<EpsilonNFA> {
    let chars: Vec<Symbol> = pattern.chars().collect();
    let Some(&first) = chars.first() else {
        return Err(Error::EmptySource("pattern".to_string()));
    };
    if chars.contains(&epsilon) {
        return Err(Error::malformed(format!(
            "pattern contains the epsilon marker {epsilon:?}"
        )));
    }

    let mut alphabet = Alphabet::new();
    for &symbol in &chars {
        alphabet.push(symbol);
    }

    let last = chars.len() as StateId + 1;
    let rows = (1..=last)
        .map(|state| {
            let mut row: Vec<Cell> = alphabet
                .iter()
                .map(|(_, symbol)| match state {
                    1 if symbol == first => vec![1, 2],
                    1 => vec![1],
                    s if s == last => vec![last],
                    s if chars[s as usize - 1] == symbol => vec![s + 1],
                    _ => Vec::new(),
                })
                .collect();
            row.push(Vec::new());
            row
        })
        .collect();

    debug!("substring NFA for {pattern:?}: {last} states over {alphabet:?}");
    Ok(EpsilonNFA::from_table(alphabet, epsilon, rows, [last]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_nfa_ab() {
        let nfa = build_substring_nfa("ab", '$').unwrap();

        assert_eq!(nfa.num_states(), 3);
        assert_eq!(nfa.alphabet().index_of('a'), Some(0));
        assert_eq!(nfa.alphabet().index_of('b'), Some(1));
        assert_eq!(nfa.row(1).unwrap(), &[vec![1, 2], vec![1], vec![]]);
        assert_eq!(nfa.row(2).unwrap(), &[vec![], vec![3], vec![]]);
        assert_eq!(nfa.row(3).unwrap(), &[vec![3], vec![3], vec![]]);
        assert_eq!(nfa.final_states().to_vec(), vec![3]);
        assert!(nfa.validate().is_ok());
    }

    #[test]
    fn test_repeated_characters() {
        let nfa = build_substring_nfa("aba", '$').unwrap();

        assert_eq!(nfa.num_states(), 4);
        assert_eq!(nfa.alphabet().len(), 2);
        assert_eq!(nfa.row(3).unwrap(), &[vec![4], vec![], vec![]]);
        assert!(nfa.accepts("bbaba").unwrap());
        assert!(nfa.accepts("abab").unwrap());
        assert!(!nfa.accepts("abba").unwrap());
    }

    #[test]
    fn test_single_character_pattern() {
        let nfa = build_substring_nfa("z", '$').unwrap();
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.row(1).unwrap(), &[vec![1, 2], vec![]]);
        assert!(nfa.accepts("z").unwrap());
        assert!(!nfa.accepts("").unwrap());
    }

    #[test]
    fn test_empty_pattern() {
        let err = build_substring_nfa("", '$').unwrap_err();
        assert!(matches!(err, Error::EmptySource(_)));
    }

    #[test]
    fn test_pattern_with_epsilon_marker() {
        let err = build_substring_nfa("a$", '$').unwrap_err();
        assert!(matches!(err, Error::MalformedSpec(_)));
        assert!(build_substring_nfa("a$", '#').is_ok());
    }
}
