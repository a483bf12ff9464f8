//! Rendering a failure as an annotated source excerpt.
//!
//! For every expectation the report quotes the input up to the offending
//! line, paints the region each production on the derivation path has
//! consumed so far, marks the offending token, and lists the productions
//! with matching colors. Styling goes through the [`Highlight`] trait so the
//! same renderer drives ANSI terminals and plain text.

use crate::error::ParseFailure;
use crate::error::diagnostics::{DiagnoseError, Expectation, diagnose};
use crate::lexer::{Token, TokenKind};
use ahash::RandomState;
use hashbrown::HashMap;
use std::fmt::Write;

/// A slot in the emphasis palette. Ids grow without bound; stylers are
/// expected to cycle a fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmphasisId(pub usize);

/// How report fragments are styled.
pub trait Highlight {
    /// Style a consumed-region fragment or its matching production label.
    fn emphasis(&self, id: EmphasisId, text: &str) -> String;

    /// Style the offending token.
    fn failing(&self, text: &str) -> String;

    /// Style line numbers.
    fn dim(&self, text: &str) -> String;
}

/// ANSI escape styling: a cycling palette of background colors for emphasis,
/// a red background for the offending token, gray line numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiHighlight;

/// Background colors: yellow, green, cyan, magenta, blue.
const PALETTE: [u8; 5] = [43, 42, 46, 45, 44];

impl Highlight for AnsiHighlight {
    fn emphasis(&self, id: EmphasisId, text: &str) -> String {
        format!("\x1b[{}m{text}\x1b[0m", PALETTE[id.0 % PALETTE.len()])
    }

    fn failing(&self, text: &str) -> String {
        format!("\x1b[41m{text}\x1b[0m")
    }

    fn dim(&self, text: &str) -> String {
        format!("\x1b[90m{text}\x1b[0m")
    }
}

/// No styling at all, for logs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlight;

impl Highlight for PlainHighlight {
    fn emphasis(&self, _id: EmphasisId, text: &str) -> String {
        text.to_string()
    }

    fn failing(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Who gets to style a byte of the quoted input. The offending token is
/// claimed first, then each production on the path claims what is left, so
/// inner productions win overlaps with the outer productions that contain
/// them.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Claim {
    Emphasis(EmphasisId),
    Failing,
}

/// Render the full failure report.
///
/// The header names the offending token; each expectation then gets its own
/// block with the annotated excerpt and the `from:` production list.
///
/// # Errors
///
/// Forwards [`DiagnoseError`] from [`diagnose`].
pub fn explain<V>(
    failure: &ParseFailure<'_, V>,
    style: &dyn Highlight,
) -> Result<String, DiagnoseError> {
    let expectations = diagnose(failure)?;
    let token = failure.token();

    let mut out = String::new();
    let _ = writeln!(out, "Unexpected {}:", format_token(token, style));
    let _ = writeln!(out);
    let _ = writeln!(out, "I was expecting one of the following:");
    for expectation in &expectations {
        let _ = writeln!(out);
        render_expectation(&mut out, failure, expectation, style);
    }
    Ok(out)
}

/// One expectation block: header, annotated excerpt, caret, `from:` list.
fn render_expectation<V>(
    out: &mut String,
    failure: &ParseFailure<'_, V>,
    expectation: &Expectation<'_, V>,
    style: &dyn Highlight,
) {
    let chart = failure.chart();
    let grammar = failure.grammar();
    let input = failure.input();
    let token = failure.token();

    let _ = writeln!(
        out,
        "a \"{}\" in place of a {} here:",
        expectation.terminal,
        token.type_label()
    );

    // Per-byte claims over the input. The offending token claims its span
    // first; each path production then claims the bytes from its first
    // consumed token to the end of the last consumed token, innermost first.
    let mut claims: Vec<Option<Claim>> = vec![None; input.len()];
    let failing_end = (token.offset + token.text.len()).min(input.len());
    for claim in &mut claims[token.offset.min(input.len())..failing_end] {
        *claim = Some(Claim::Failing);
    }

    let consumed_end = chart
        .last()
        .token()
        .map_or(0, |last| last.offset + last.text.len())
        .min(input.len());

    // One palette slot per chart column, in path order, shared between the
    // excerpt and the `from:` labels.
    let mut column_ids: HashMap<usize, EmphasisId, RandomState> = HashMap::default();
    let mut next_id = 0;
    for state in &expectation.path {
        let column = state.origin + 1;
        let Some(first) = chart.column(column).and_then(|col| col.token()) else {
            continue;
        };
        let id = *column_ids.entry(column).or_insert_with(|| {
            let id = EmphasisId(next_id);
            next_id += 1;
            id
        });
        for claim in &mut claims[first.offset.min(consumed_end)..consumed_end] {
            if claim.is_none() {
                *claim = Some(Claim::Emphasis(id));
            }
        }
    }

    // Quote the input up to and including the offending line.
    let mut line_start = 0;
    for (index, line) in input.split('\n').enumerate() {
        let number = index + 1;
        if number > token.line as usize {
            break;
        }
        let _ = write!(out, "{}", style.dim(&format!("{number:<5}")));
        let mut segment = String::new();
        let mut segment_claim = None;
        for (position, ch) in line.char_indices() {
            let claim = claims.get(line_start + position).copied().flatten();
            if claim != segment_claim && !segment.is_empty() {
                emit(out, &segment, segment_claim, style);
                segment.clear();
            }
            segment_claim = claim;
            segment.push(ch);
        }
        if !segment.is_empty() {
            emit(out, &segment, segment_claim, style);
        }
        out.push('\n');
        line_start += line.len() + 1;
    }

    // Caret under the offending column, past the 5-wide line number gutter.
    let _ = writeln!(out, "{}^", " ".repeat(4 + token.col as usize));

    let _ = writeln!(out, "from:");
    for state in &expectation.path {
        let label = state.label(grammar).to_string();
        let styled = column_ids
            .get(&(state.origin + 1))
            .map_or(label.clone(), |&id| style.emphasis(id, &label));
        let _ = writeln!(out, "  {styled}");
    }
}

fn emit(out: &mut String, text: &str, claim: Option<Claim>, style: &dyn Highlight) {
    match claim {
        None => out.push_str(text),
        Some(Claim::Failing) => out.push_str(&style.failing(text)),
        Some(Claim::Emphasis(id)) => out.push_str(&style.emphasis(id, text)),
    }
}

/// The offending token as shown in the report header. Literal-ish token
/// types (numbers, strings) read better with their type name in front.
fn format_token(token: &Token, style: &dyn Highlight) -> String {
    match &token.kind {
        TokenKind::Eof => style.failing("end of input"),
        TokenKind::Keyword => style.failing(&token.text),
        TokenKind::Typed(name) if name == "number" || name == "string" => {
            format!("{name} {}", style.failing(&token.text))
        }
        TokenKind::Typed(_) => style.failing(&token.text),
    }
}
