//! Pattern to verdict: build the substring NFA, convert it and run the DFA.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::formlang::{DFA, DfaSimulator, EpsilonNFA, Verdict, subset_construction};
use crate::pattern::build_substring_nfa;
use crate::text_format::{serialize_dfa, serialize_nfa};

/// Read a whole text source. `what` names it in errors.
pub fn read_source(path: impl AsRef<Path>, what: &str) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    if text.trim().is_empty() {
        return Err(Error::EmptySource(format!("{what} {}", path.display())));
    }
    debug!("read {what} from {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

/// Read the input sequence from a file. Surrounding whitespace, including the
/// trailing newline, is not part of the sequence.
pub fn read_input_sequence(path: impl AsRef<Path>) -> Result<String> {
    read_source(path, "input sequence").map(|text| text.trim().to_string())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|err| Error::io(path, err))?;
    info!("wrote {}", path.display());
    Ok(())
}

pub struct Pipeline {
    config: Config,
    simulator: DfaSimulator,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let simulator = config.simulator();
        Self { config, simulator }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn build_nfa(&self, pattern: &str) -> Result<EpsilonNFA> {
        let nfa = build_substring_nfa(pattern, self.config.epsilon)?;
        if let Some(path) = &self.config.nfa_output {
            write_output(path, &serialize_nfa(&nfa))?;
        }
        Ok(nfa)
    }

    pub fn convert(&self, nfa: &EpsilonNFA) -> Result<DFA> {
        let dfa = subset_construction(nfa)?;
        info!(
            "converted NFA with {} states into DFA with {} states",
            nfa.num_states(),
            dfa.num_states()
        );
        if let Some(path) = &self.config.dfa_output {
            write_output(path, &serialize_dfa(&dfa))?;
        }
        Ok(dfa)
    }

    pub fn simulate(&self, dfa: &DFA, input: &str) -> Result<Verdict> {
        self.simulator.run(dfa, input)
    }

    /// Decide whether `input` contains `pattern`.
    pub fn match_pattern(&self, pattern: &str, input: &str) -> Result<Verdict> {
        let nfa = self.build_nfa(pattern)?;
        let dfa = self.convert(&nfa)?;
        self.simulate(&dfa, input)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::text_format::{parse_dfa, parse_nfa};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dfsm-pipeline-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_match_pattern() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.match_pattern("ab", "aab").unwrap(), Verdict::Accepted);
        assert_eq!(pipeline.match_pattern("ab", "ba").unwrap(), Verdict::Rejected);
        assert!(matches!(
            pipeline.match_pattern("ab", "xab"),
            Err(Error::UnknownSymbolInInput {
                symbol: 'x',
                position: 0
            })
        ));
        assert!(matches!(
            pipeline.match_pattern("", "ab"),
            Err(Error::EmptySource(_))
        ));
    }

    #[test]
    fn test_shared_targets_need_opt_out() {
        // State {1} of the "abc" DFA moves to itself on both 'b' and 'c'.
        let strict = Pipeline::default();
        assert!(matches!(
            strict.match_pattern("abc", "abc"),
            Err(Error::MalformedSpec(_))
        ));

        let lenient = Pipeline::new(Config {
            require_injective_rows: false,
            ..Config::default()
        });
        assert_eq!(lenient.match_pattern("abc", "cabca").unwrap(), Verdict::Accepted);
        assert_eq!(lenient.match_pattern("abc", "acbab").unwrap(), Verdict::Rejected);
    }

    #[test]
    fn test_writes_intermediate_automata() {
        let nfa_path = scratch_path("ab.nfa");
        let dfa_path = scratch_path("ab.dfa");
        let pipeline = Pipeline::new(Config {
            nfa_output: Some(nfa_path.clone()),
            dfa_output: Some(dfa_path.clone()),
            ..Config::default()
        });

        assert_eq!(pipeline.match_pattern("ab", "bab").unwrap(), Verdict::Accepted);

        let nfa = parse_nfa(&read_source(&nfa_path, "NFA").unwrap()).unwrap();
        assert_eq!(nfa.num_states(), 3);
        let dfa = parse_dfa(&read_source(&dfa_path, "DFA").unwrap()).unwrap();
        assert_eq!(pipeline.simulate(&dfa, "bab").unwrap(), Verdict::Accepted);

        fs::remove_file(nfa_path).unwrap();
        fs::remove_file(dfa_path).unwrap();
    }

    #[test]
    fn test_read_input_sequence() {
        let path = scratch_path("input.txt");

        fs::write(&path, "aab\n").unwrap();
        assert_eq!(read_input_sequence(&path).unwrap(), "aab");

        fs::write(&path, "  \n").unwrap();
        assert!(matches!(
            read_input_sequence(&path),
            Err(Error::EmptySource(_))
        ));

        fs::remove_file(&path).unwrap();
        assert!(matches!(read_input_sequence(&path), Err(Error::Io { .. })));
    }
}
