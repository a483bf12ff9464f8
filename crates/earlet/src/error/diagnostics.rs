//! Derivation-path reconstruction: turning the last chart column into a list
//! of expected terminals, each with the chain of productions that was being
//! matched when the parse stopped.

use crate::error::ParseFailure;
use crate::grammar::{Grammar, Symbol};
use crate::parser::chart::{Chart, Column, State};
use thiserror::Error;

/// One way the parse could have continued: a terminal some live state
/// expected next, with the derivation path that led to expecting it.
///
/// The path runs inside out: the expecting state first, then each caller in
/// turn, ending at the synthetic start rule.
#[derive(Debug)]
pub struct Expectation<'f, V> {
    /// The expected terminal's name.
    pub terminal: &'f str,
    /// The productions being matched, innermost first.
    pub path: Vec<&'f State<V>>,
}

/// The chart contradicts itself.
///
/// Every partially matched state was once inserted as a prediction at its
/// origin column, so the backward walk finding that prediction cannot fail on
/// an engine-built chart. A hand-assembled or truncated chart can break the
/// property, and that is reported rather than papered over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnoseError {
    #[error("no predicted ancestor for `{symbol}` anchored at column {column}")]
    BrokenDerivation { symbol: String, column: usize },
}

/// Reconstruct every way the failed parse could have continued.
///
/// Candidates are the incomplete states of the last column whose next symbol
/// is a terminal, in reverse insertion order, so the most recently predicted
/// (most specific) expectation comes first. States stuck on a nonterminal are
/// skipped: whatever terminal could begin that nonterminal is expected by a
/// deeper state that is its own candidate.
///
/// # Errors
///
/// [`DiagnoseError::BrokenDerivation`] if a state's predicted ancestor is
/// missing from its origin column.
pub fn diagnose<'f, V>(
    failure: &'f ParseFailure<'_, V>,
) -> Result<Vec<Expectation<'f, V>>, DiagnoseError> {
    let chart = failure.chart();
    let grammar = failure.grammar();
    let column = failure.last_column();
    let column_index = column.index();

    let mut expectations = Vec::new();
    for position in (0..column.len()).rev() {
        let state = &column.states()[position];
        let Some(Symbol::Terminal(key)) = state.next_symbol() else {
            continue;
        };
        let path = build_path(chart, grammar, state, column_index, position)?;
        expectations.push(Expectation {
            terminal: grammar.name(key),
            path,
        });
    }
    Ok(expectations)
}

/// Walk backward from `state` (sitting at `position` in column `column`) to
/// the production that predicted it, recursively, down to the start rule.
///
/// A just-predicted state (dot 0) was inserted by the predictor while
/// processing some earlier state expecting its left-hand side; that state is
/// found by scanning backward through the chart, wrapping from the top of a
/// column to the end of the previous one. A partially matched state (dot > 0)
/// instead jumps straight to its dot-0 twin at its origin column and borrows
/// that twin's path, since both describe the same production instance.
fn build_path<'f, V>(
    chart: &'f Chart<V>,
    grammar: &Grammar<V>,
    state: &'f State<V>,
    column: usize,
    position: usize,
) -> Result<Vec<&'f State<V>>, DiagnoseError> {
    if state.dot == 0 {
        let expected = Symbol::NonTerminal(state.rule.lhs);
        let mut col = column;
        let mut pos = position;
        loop {
            if pos == 0 {
                if col == 0 {
                    // Nothing predicted the state: it is the seed.
                    return Ok(vec![state]);
                }
                col -= 1;
                pos = chart.column(col).map_or(0, Column::len);
                continue;
            }
            pos -= 1;
            let Some(prev) = chart.column(col).map(|c| &c.states()[pos]) else {
                continue;
            };
            if prev.next_symbol() == Some(expected) {
                let mut path = vec![state];
                path.extend(build_path(chart, grammar, prev, col, pos)?);
                return Ok(path);
            }
        }
    }

    let signature = state.origin_key().at_dot(0);
    let found = chart.column(state.origin).and_then(|origin| {
        origin
            .position(&signature)
            .map(|pos| (&origin.states()[pos], pos))
    });
    let Some((twin, twin_position)) = found else {
        return Err(DiagnoseError::BrokenDerivation {
            symbol: grammar.name(state.rule.lhs).to_string(),
            column: state.origin,
        });
    };
    let rest = build_path(chart, grammar, twin, state.origin, twin_position)?;
    let mut path = vec![state];
    // rest starts with the twin, which describes the same production
    // instance as `state`.
    path.extend(rest.into_iter().skip(1));
    Ok(path)
}
