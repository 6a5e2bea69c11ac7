//! `dfsm`: match a literal pattern against an input file, or build, convert and run automata files.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use dfsm::formlang::Verdict;
use dfsm::pipeline::{read_input_sequence, read_source};
use dfsm::text_format::{parse_dfa, parse_nfa, serialize_dfa, serialize_nfa};
use dfsm::{Config, Error, Pipeline};

const USAGE: &str = "\
usage: dfsm [match] [OPTIONS] <pattern> <input-file>
       dfsm build    [OPTIONS] <pattern> <nfa-file>
       dfsm convert  [OPTIONS] <nfa-file> <dfa-file>
       dfsm simulate [OPTIONS] <dfa-file> <input-file>

options:
  --nfa-out <path>          write the NFA built from the pattern
  --dfa-out <path>          write the constructed DFA
  --epsilon <char>          epsilon marker for built NFAs (default '$')
  --allow-shared-targets    accept DFA rows that reach one state on two symbols
  -h, --help                print this message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Match,
    Build,
    Convert,
    Simulate,
}

struct Invocation {
    command: Command,
    config: Config,
    first: String,
    second: String,
}

enum Parsed {
    Run(Invocation),
    Help,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Parsed, String> {
    let mut config = Config::default();
    let mut command = None;
    let mut operands = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Parsed::Help),
            "--allow-shared-targets" => config.require_injective_rows = false,
            "--nfa-out" | "--dfa-out" | "--epsilon" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("{arg} needs a value"))?;
                match arg.as_str() {
                    "--nfa-out" => config.nfa_output = Some(PathBuf::from(value)),
                    "--dfa-out" => config.dfa_output = Some(PathBuf::from(value)),
                    _ => {
                        let mut chars = value.chars();
                        config.epsilon = match (chars.next(), chars.next()) {
                            (Some(symbol), None) => symbol,
                            _ => return Err(format!("--epsilon takes one character, got {value:?}")),
                        };
                    }
                }
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ if command.is_none() && operands.is_empty() => {
                command = Some(match arg.as_str() {
                    "match" => Command::Match,
                    "build" => Command::Build,
                    "convert" => Command::Convert,
                    "simulate" => Command::Simulate,
                    _ => {
                        operands.push(arg);
                        Command::Match
                    }
                });
            }
            _ => operands.push(arg),
        }
    }

    let command = command.ok_or("missing arguments")?;
    let [first, second]: [String; 2] = operands
        .try_into()
        .map_err(|operands: Vec<String>| format!("expected 2 operands, got {}", operands.len()))?;

    Ok(Parsed::Run(Invocation {
        command,
        config,
        first,
        second,
    }))
}

fn write_file(path: &str, contents: &str) -> dfsm::Result<()> {
    fs::write(path, contents).map_err(|source| Error::Io {
        path: PathBuf::from(path),
        source,
    })
}

fn execute(invocation: Invocation) -> dfsm::Result<Option<Verdict>> {
    let Invocation {
        command,
        config,
        first,
        second,
    } = invocation;
    let pipeline = Pipeline::new(config);

    match command {
        Command::Match => {
            let input = read_input_sequence(&second)?;
            pipeline.match_pattern(&first, &input).map(Some)
        }
        Command::Build => {
            let nfa = pipeline.build_nfa(&first)?;
            write_file(&second, &serialize_nfa(&nfa))?;
            Ok(None)
        }
        Command::Convert => {
            let nfa = parse_nfa(&read_source(&first, "NFA file")?)?;
            let dfa = pipeline.convert(&nfa)?;
            write_file(&second, &serialize_dfa(&dfa))?;
            Ok(None)
        }
        Command::Simulate => {
            let dfa = parse_dfa(&read_source(&first, "DFA file")?)?;
            let input = read_input_sequence(&second)?;
            pipeline.simulate(&dfa, &input).map(Some)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let invocation = match parse_args(env::args().skip(1)) {
        Ok(Parsed::Run(invocation)) => invocation,
        Ok(Parsed::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match execute(invocation) {
        Ok(Some(verdict)) => {
            println!("{verdict}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
