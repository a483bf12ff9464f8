//! # Token Model
//!
//! The token shape the engine consumes and the minimal pull interface a lexer
//! has to implement. Earlet does not lex: embedders bring their own tokenizer
//! and adapt it to [`TokenSource`], or pre-lex into a [`TokenBuffer`].
//!
//! Tokens carry their position in the raw source text (1-based line and
//! column, 0-based byte offset) so that failure reports can point back into
//! the input.

use compact_str::CompactString;
use std::fmt;

/// How a token is matched against grammar terminals.
///
/// Grammar terminals are plain names. Most tokens match the terminal named by
/// their *type* (a `number` token matches the terminal `number`), but
/// keyword-class tokens match the terminal named by their *literal text*, so
/// a grammar can spell out `"true"`, `"{"`, or `"while"` directly. The
/// distinction is decided by the lexer, once, when the token is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Matches the grammar terminal named by the token's literal text.
    Keyword,
    /// Matches the grammar terminal named by this type name.
    Typed(CompactString),
    /// Synthetic end-of-input marker; matches no terminal.
    Eof,
}

/// One lexed token with its position in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Comparison class of this token.
    pub kind: TokenKind,
    /// The source text this token covers. Empty for the end-of-input marker.
    pub text: CompactString,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column.
    pub col: u32,
    /// 0-based byte offset into the source text.
    pub offset: usize,
}

impl Token {
    /// Create a token that matches a terminal by type name.
    #[must_use]
    pub fn typed(
        type_name: impl Into<CompactString>,
        text: impl Into<CompactString>,
        line: u32,
        col: u32,
        offset: usize,
    ) -> Self {
        Self {
            kind: TokenKind::Typed(type_name.into()),
            text: text.into(),
            line,
            col,
            offset,
        }
    }

    /// Create a keyword-class token, matched by its literal text.
    #[must_use]
    pub fn keyword(text: impl Into<CompactString>, line: u32, col: u32, offset: usize) -> Self {
        Self {
            kind: TokenKind::Keyword,
            text: text.into(),
            line,
            col,
            offset,
        }
    }

    /// Create the synthetic end-of-input token, positioned just past the last
    /// character of `input` so failure reports render a usable excerpt.
    #[must_use]
    pub fn end_of_input(input: &str) -> Self {
        let line = input.split('\n').count().max(1);
        let last_line = input.rsplit('\n').next().unwrap_or("");
        Self {
            kind: TokenKind::Eof,
            text: CompactString::default(),
            line: u32::try_from(line).unwrap_or(u32::MAX),
            col: u32::try_from(last_line.chars().count() + 1).unwrap_or(u32::MAX),
            offset: input.len(),
        }
    }

    /// The name this token is compared against grammar terminals with, or
    /// `None` for the end-of-input marker, which matches nothing.
    #[must_use]
    pub fn comparison_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Keyword => Some(self.text.as_str()),
            TokenKind::Typed(name) => Some(name.as_str()),
            TokenKind::Eof => None,
        }
    }

    /// The token's type name as shown in reports.
    #[must_use]
    pub fn type_label(&self) -> &str {
        match &self.kind {
            TokenKind::Keyword => "keyword",
            TokenKind::Typed(name) => name.as_str(),
            TokenKind::Eof => "eof",
        }
    }

    /// Whether this is the synthetic end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            f.write_str("end of input")
        } else {
            f.write_str(&self.text)
        }
    }
}

/// The pull interface the engine consumes tokens through.
///
/// The engine calls [`reset`](TokenSource::reset) once with the raw input
/// text, then pulls exactly one token per chart column with
/// [`next_token`](TokenSource::next_token); it never looks further ahead.
/// `None` signals end of input.
pub trait TokenSource {
    /// Prepare to tokenize `text` from the beginning.
    fn reset(&mut self, text: &str);

    /// Pull the next token, or `None` at end of input.
    fn next_token(&mut self) -> Option<Token>;
}

/// A [`TokenSource`] over a pre-lexed token vector.
///
/// Used by the test suites and by embedders whose tokens are produced up
/// front. [`reset`](TokenSource::reset) rewinds to the first token; the text
/// argument is ignored because the tokens are already assembled.
#[derive(Debug, Clone, Default)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenBuffer {
    /// Wrap a token vector.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }
}

impl TokenSource for TokenBuffer {
    fn reset(&mut self, _text: &str) {
        self.pos = 0;
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_tokens_compare_by_text() {
        let tok = Token::keyword("true", 1, 1, 0);
        assert_eq!(tok.comparison_name(), Some("true"));
        assert_eq!(tok.type_label(), "keyword");
    }

    #[test]
    fn typed_tokens_compare_by_type() {
        let tok = Token::typed("number", "42", 1, 1, 0);
        assert_eq!(tok.comparison_name(), Some("number"));
        assert_eq!(tok.type_label(), "number");
    }

    #[test]
    fn eof_token_sits_past_the_last_character() {
        let tok = Token::end_of_input("[1,\n2");
        assert_eq!(tok.comparison_name(), None);
        assert_eq!(tok.line, 2);
        assert_eq!(tok.col, 2);
        assert_eq!(tok.offset, 5);
        assert_eq!(tok.to_string(), "end of input");
    }

    #[test]
    fn eof_token_on_empty_input() {
        let tok = Token::end_of_input("");
        assert_eq!(tok.line, 1);
        assert_eq!(tok.col, 1);
        assert_eq!(tok.offset, 0);
    }

    #[test]
    fn token_buffer_rewinds_on_reset() {
        let mut buf = TokenBuffer::new(vec![Token::keyword("a", 1, 1, 0)]);
        assert!(buf.next_token().is_some());
        assert!(buf.next_token().is_none());
        buf.reset("a");
        assert!(buf.next_token().is_some());
    }
}
