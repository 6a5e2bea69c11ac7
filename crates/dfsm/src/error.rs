//! Error type shared by every stage of the pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::formlang::{StateId, Symbol};

/// Errors that abort a conversion or simulation.
///
/// A rejected input is not an error: it is reported as
/// [`Verdict::Rejected`](crate::Verdict::Rejected).
#[derive(Debug, Error)]
pub enum Error {
    /// A structural violation in an automaton: wrong row width, an
    /// out-of-range state or symbol, a missing section or a row that fails
    /// the well-formedness check.
    #[error("malformed automaton: {0}")]
    MalformedSpec(String),

    #[error("epsilon transition of state {state} names undefined state {target}")]
    InvalidEpsilonReference { state: StateId, target: StateId },

    #[error("symbol {symbol:?} at position {position} is not in the alphabet")]
    UnknownSymbolInInput { symbol: Symbol, position: usize },

    #[error("{0} is empty")]
    EmptySource(String),

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedSpec(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
