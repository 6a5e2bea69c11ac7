//! Section-delimited text format for automata.
//!
//! ```text
//! a b $
//!
//! [1,2] [1] #
//! # [3] #
//! [3] [3] #
//!
//! 3
//! ```
//!
//! The first section is the alphabet (for NFAs the last symbol is the
//! epsilon marker), the second has one transition row per state and the third
//! lists the accepting states. Sections are separated by blank lines. DFA
//! cells hold a single state id; NFA cells hold `#` or a bracketed list.

use std::str::FromStr;

use log::warn;
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res, value},
    multi::separated_list0,
    sequence::{delimited, preceded, terminated},
};

use crate::error::{Error, Result};
use crate::formlang::{Alphabet, Cell, DFA, EpsilonNFA, StateId, Symbol};

/// A non-blank line and its 1-based line number.
type Line<'a> = (usize, &'a str);

struct Sections<'a> {
    alphabet: Line<'a>,
    rows: Vec<Line<'a>>,
    accepting: Vec<Line<'a>>,
}

/// Split text into its three sections.
fn split_sections(text: &str) -> Result<Sections<'_>> {
    if text.trim().is_empty() {
        return Err(Error::EmptySource("automaton text".to_string()));
    }

    let mut sections: Vec<Vec<Line<'_>>> = vec![Vec::new()];
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            if sections.last().is_some_and(|section| !section.is_empty()) {
                sections.push(Vec::new());
            }
            continue;
        }
        if let Some(section) = sections.last_mut() {
            section.push((idx + 1, line));
        }
    }
    if sections.last().is_some_and(Vec::is_empty) {
        sections.pop();
    }

    if sections.len() > 3 {
        let (line, _) = sections[3][0];
        return Err(Error::malformed(format!(
            "line {line}: unexpected fourth section"
        )));
    }

    let mut sections = sections.into_iter();
    let alphabet = sections.next().unwrap_or_default();
    let alphabet = match alphabet.as_slice() {
        [line] => *line,
        [_, (line, _), ..] => {
            return Err(Error::malformed(format!(
                "line {line}: the alphabet must be a single line followed by a blank line"
            )));
        }
        [] => return Err(Error::malformed("the alphabet section is missing")),
    };

    let rows = sections.next().unwrap_or_default();
    if rows.is_empty() {
        return Err(Error::malformed("the transition section is empty"));
    }

    let accepting = sections.next().unwrap_or_default();
    if accepting.is_empty() {
        warn!("the accepting states section is empty; the automaton accepts nothing");
    }

    Ok(Sections {
        alphabet,
        rows,
        accepting,
    })
}

fn parse_symbols((line, text): Line<'_>) -> Result<Vec<Symbol>> {
    text.split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => Ok(symbol),
                _ => Err(Error::malformed(format!(
                    "line {line}: symbol {token:?} is not a single character"
                ))),
            }
        })
        .collect()
}

fn parse_state_id(line: usize, token: &str) -> Result<StateId> {
    match token.parse::<StateId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::malformed(format!(
            "line {line}: {token:?} is not a state id"
        ))),
    }
}

/// A state id that must name one of the `num_states` rows.
fn parse_defined_state(line: usize, token: &str, num_states: usize) -> Result<StateId> {
    let id = parse_state_id(line, token)?;
    if id as usize > num_states {
        return Err(Error::malformed(format!(
            "line {line}: state {id} is not defined ({num_states} states)"
        )));
    }
    Ok(id)
}

fn parse_accepting(lines: &[Line<'_>], num_states: usize) -> Result<Vec<StateId>> {
    let mut accepting = Vec::new();
    for &(line, text) in lines {
        for token in text.split_whitespace() {
            accepting.push(parse_defined_state(line, token, num_states)?);
        }
    }
    Ok(accepting)
}

fn state_id(input: &str) -> IResult<&str, StateId> {
    map_res(digit1, StateId::from_str).parse(input)
}

/// `#` or `[1,2,...]`, with optional spaces inside the brackets.
fn nfa_cell(input: &str) -> IResult<&str, Cell> {
    alt((
        value(Vec::new(), char('#')),
        delimited(
            terminated(char('['), space0),
            separated_list0(
                delimited(space0, char(','), space0),
                state_id,
            ),
            preceded(space0, char(']')),
        ),
    ))
    .parse(input)
}

fn parse_nfa_cell(line: usize, token: &str) -> Result<Cell> {
    let (_, cell) = all_consuming(nfa_cell)
        .parse(token)
        .map_err(|_| Error::malformed(format!("line {line}: cannot read cell {token:?}")))?;
    if cell.contains(&0) {
        return Err(Error::malformed(format!(
            "line {line}: state ids start at 1 in {token:?}"
        )));
    }
    Ok(cell)
}

/// Split a row into cells. Whitespace separates cells, except inside
/// brackets.
fn nfa_row_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(begin) = start.take() {
                    tokens.push(&text[begin..idx]);
                }
                continue;
            }
            _ => {}
        }
        start.get_or_insert(idx);
    }
    if let Some(begin) = start {
        tokens.push(&text[begin..]);
    }
    tokens
}

/// Parse an NFA. The last alphabet symbol is taken as the epsilon marker.
///
/// Accepting states must be defined rows. Row widths and transition targets
/// are not checked here; subset construction rejects automata that violate
/// them.
pub fn parse_nfa(text: &str) -> Result<EpsilonNFA> {
    let sections = split_sections(text)?;

    let mut symbols = parse_symbols(sections.alphabet)?;
    let Some(epsilon) = symbols.pop() else {
        return Err(Error::malformed("the alphabet section is empty"));
    };
    let alphabet = Alphabet::try_from_symbols(symbols)?;

    let rows = sections
        .rows
        .iter()
        .map(|&(line, text)| {
            nfa_row_tokens(text)
                .into_iter()
                .map(|token| parse_nfa_cell(line, token))
                .collect::<Result<Vec<Cell>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let accepting = parse_accepting(&sections.accepting, rows.len())?;
    Ok(EpsilonNFA::from_table(alphabet, epsilon, rows, accepting))
}

/// Parse a DFA.
///
/// Every target and accepting state must be a defined row. Row widths are
/// not checked here; the simulator's well-formedness check rejects rows of
/// the wrong width.
pub fn parse_dfa(text: &str) -> Result<DFA> {
    let sections = split_sections(text)?;

    let alphabet = Alphabet::try_from_symbols(parse_symbols(sections.alphabet)?)?;
    if alphabet.is_empty() {
        return Err(Error::malformed("the alphabet section is empty"));
    }

    let num_states = sections.rows.len();
    let rows = sections
        .rows
        .iter()
        .map(|&(line, text)| {
            text.split_whitespace()
                .map(|token| parse_defined_state(line, token, num_states))
                .collect::<Result<Vec<StateId>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let accepting = parse_accepting(&sections.accepting, num_states)?;
    Ok(DFA::from_table(alphabet, rows, accepting))
}

fn write_alphabet(out: &mut String, symbols: impl Iterator<Item = Symbol>) {
    let line: Vec<String> = symbols.map(String::from).collect();
    out.push_str(&line.join(" "));
    out.push_str("\n\n");
}

fn write_accepting(out: &mut String, accepting: impl Iterator<Item = StateId>) {
    let line: Vec<String> = accepting.map(|state| state.to_string()).collect();
    out.push('\n');
    out.push_str(&line.join(" "));
    out.push('\n');
}

fn write_cell(out: &mut String, cell: &[StateId]) {
    if cell.is_empty() {
        out.push('#');
        return;
    }
    let states: Vec<String> = cell.iter().map(|state| state.to_string()).collect();
    out.push('[');
    out.push_str(&states.join(","));
    out.push(']');
}

/// Write an NFA in the text format, epsilon marker last.
pub fn serialize_nfa(nfa: &EpsilonNFA) -> String {
    let mut out = String::new();
    write_alphabet(
        &mut out,
        nfa.alphabet()
            .iter()
            .map(|(_, symbol)| symbol)
            .chain([nfa.epsilon()]),
    );

    for (_, row) in nfa.rows() {
        for (idx, cell) in row.iter().enumerate() {
            if idx > 0 {
                out.push(' ');
            }
            write_cell(&mut out, cell);
        }
        out.push('\n');
    }

    write_accepting(&mut out, nfa.final_states().iter());
    out
}

/// Write a DFA in the text format.
pub fn serialize_dfa(dfa: &DFA) -> String {
    let mut out = String::new();
    write_alphabet(&mut out, dfa.alphabet().iter().map(|(_, symbol)| symbol));

    for (_, row) in dfa.rows() {
        let line: Vec<String> = row.iter().map(|state| state.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }

    write_accepting(&mut out, dfa.final_states().iter());
    out
}
