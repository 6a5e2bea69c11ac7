//! Substring matching through finite automata.
//!
//! A literal pattern becomes an epsilon-NFA, subset construction turns it into
//! a total DFA, and the DFA is run over an input sequence to decide whether
//! the pattern occurs in it. Automata can be read from and written to a
//! small text format, see [`text_format`].

pub mod config;
pub mod error;
pub mod formlang;
pub mod pattern;
pub mod pipeline;
pub mod text_format;

pub use config::Config;
pub use error::{Error, Result};
pub use formlang::Verdict;
pub use pipeline::Pipeline;
