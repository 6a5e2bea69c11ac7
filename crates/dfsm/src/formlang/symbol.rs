//! Symbol types for automata transitions.

use indexmap::IndexSet;
use std::fmt;

use crate::error::{Error, Result};

/// A single input symbol.
pub type Symbol = char;

/// Column of a symbol in a transition table.
pub type SymbolId = usize;

/// The epsilon marker used when no other is configured.
pub const DEFAULT_EPSILON: Symbol = '$';

/// An ordered alphabet of distinct symbols.
///
/// The position of a symbol is its column in every transition table built
/// over this alphabet. Lookup goes through the index map, so any `char` can
/// be a symbol.
#[derive(Clone, Default)]
pub struct Alphabet {
    symbols: IndexSet<Symbol>,
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an alphabet, rejecting duplicate symbols.
    pub fn try_from_symbols<I>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut alphabet = Self::new();
        for symbol in symbols {
            if !alphabet.push(symbol) {
                return Err(Error::malformed(format!(
                    "duplicate symbol {symbol:?} in alphabet"
                )));
            }
        }
        Ok(alphabet)
    }

    /// Append a symbol. Returns `false` if it was already present.
    pub fn push(&mut self, symbol: Symbol) -> bool {
        self.symbols.insert(symbol)
    }

    /// Column index of a symbol, if it belongs to the alphabet.
    #[inline]
    pub fn index_of(&self, symbol: Symbol) -> Option<SymbolId> {
        self.symbols.get_index_of(&symbol)
    }

    pub fn symbol(&self, index: SymbolId) -> Option<Symbol> {
        self.symbols.get_index(index).copied()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate over `(column, symbol)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, Symbol)> + '_ {
        self.symbols.iter().copied().enumerate()
    }
}

// `IndexSet` equality ignores order, but columns depend on it.
impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.symbols.iter().eq(other.symbols.iter())
    }
}

impl Eq for Alphabet {}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.symbols.iter()).finish()
    }
}
