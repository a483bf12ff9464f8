//! # Error Module
//!
//! Failure reporting: what a parse failure carries, how derivation paths are
//! reconstructed from the chart ([`diagnose`]), and how the whole thing is
//! rendered as an annotated source excerpt ([`explain`]).
//!
//! A [`ParseFailure`] is a snapshot of the parse at the moment it stopped:
//! the offending token, the full chart, the raw input text, and a borrow of
//! the grammar for turning interned names back into text. Diagnosis and
//! rendering are separate passes over that snapshot, so callers that only
//! need the expected-terminal list never pay for report formatting.

pub mod diagnostics;
pub mod report;

pub use diagnostics::{DiagnoseError, Expectation, diagnose};
pub use report::{AnsiHighlight, EmphasisId, Highlight, PlainHighlight, explain};

use crate::grammar::Grammar;
use crate::lexer::Token;
use crate::parser::chart::{Chart, Column};
use std::fmt;

/// How a parse stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A token arrived that no state in the last column could scan.
    UnexpectedToken,
    /// Input ended before the entry rule was complete.
    UnexpectedEof,
}

/// A failed parse, frozen at the moment it stopped.
///
/// Borrows the grammar for its lifetime so state labels and expected
/// terminals can be printed with real names.
pub struct ParseFailure<'g, V> {
    kind: FailureKind,
    token: Token,
    chart: Chart<V>,
    input: String,
    grammar: &'g Grammar<V>,
}

impl<'g, V> ParseFailure<'g, V> {
    pub(crate) fn blocked(
        token: Token,
        chart: Chart<V>,
        input: &str,
        grammar: &'g Grammar<V>,
    ) -> Self {
        Self {
            kind: FailureKind::UnexpectedToken,
            token,
            chart,
            input: input.to_string(),
            grammar,
        }
    }

    pub(crate) fn at_eof(chart: Chart<V>, input: &str, grammar: &'g Grammar<V>) -> Self {
        Self {
            kind: FailureKind::UnexpectedEof,
            token: Token::end_of_input(input),
            chart,
            input: input.to_string(),
            grammar,
        }
    }

    /// How the parse stopped.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// The token that could not be consumed. Synthetic end-of-input marker
    /// for [`FailureKind::UnexpectedEof`].
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// The chart as it stood when the parse stopped.
    #[must_use]
    pub const fn chart(&self) -> &Chart<V> {
        &self.chart
    }

    /// The grammar the parse ran against.
    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar<V> {
        self.grammar
    }

    /// The raw input text the tokens were lexed from.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The most recent chart column: every hypothesis that was still alive
    /// when the parse stopped.
    #[must_use]
    pub fn last_column(&self) -> &Column<V> {
        self.chart.last()
    }
}

impl<V> fmt::Debug for ParseFailure<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseFailure")
            .field("kind", &self.kind)
            .field("token", &self.token)
            .field("columns", &self.chart.len())
            .finish_non_exhaustive()
    }
}

impl<V> fmt::Display for ParseFailure<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::UnexpectedToken => write!(
                f,
                "unexpected {} at line {}, column {}",
                self.token, self.token.line, self.token.col
            ),
            FailureKind::UnexpectedEof => f.write_str("unexpected end of input"),
        }
    }
}

impl<V> std::error::Error for ParseFailure<'_, V> {}
