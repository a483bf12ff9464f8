//! # Earlet
//!
//! An Earley chart parser that either produces a resolved semantic value for
//! the whole input, or explains *why* parsing got stuck: which terminals were
//! expected at the point of failure, and the chain of grammar productions that
//! were being matched when the input stopped fitting.
//!
//! ## Overview
//!
//! Earlet accepts any context-free grammar, including ambiguous and
//! left-recursive ones. A parse runs in one left-to-right pass, building a
//! chart of parse states via the classic predictor/scanner/completer closure:
//!
//! - **Grammar definition**: terminals, ordered rules, optional per-rule
//!   reduction functions ([`grammar::GrammarBuilder`])
//! - **Token pull interface**: bring your own lexer ([`lexer::TokenSource`])
//! - **Chart engine**: deduplicated, insertion-ordered state sets per input
//!   position ([`parser`])
//! - **Failure diagnosis**: backward reconstruction of derivation paths
//!   through the chart ([`error::diagnose`])
//! - **Explanatory reports**: source-annotated text with pluggable emphasis
//!   styling ([`error::explain`])
//!
//! ## Quick Start
//!
//! ```rust
//! use earlet::{GrammarBuilder, ParseValue, Token, TokenBuffer, parse};
//!
//! // 1. Define a grammar. Terminals are named; everything else is a
//! //    nonterminal. Rules may carry a resolve function that folds the
//! //    values collected for the rule's right-hand side.
//! let grammar = GrammarBuilder::new()
//!     .terminals(["number"])
//!     .entry_point("expr")
//!     .rule_with("expr", ["number"], |mut data| match data.pop() {
//!         Some(ParseValue::Token(tok)) => tok.text.parse::<i64>().unwrap_or(0),
//!         _ => 0,
//!     })
//!     .build()
//!     .expect("grammar is well formed");
//!
//! // 2. Feed tokens through the pull interface. `TokenBuffer` adapts a
//! //    pre-lexed token vector; any lexer implementing `TokenSource` works.
//! let mut tokens = TokenBuffer::new(vec![Token::typed("number", "42", 1, 1, 0)]);
//!
//! // 3. Parse. On success the start rule's resolved value comes back.
//! let value = parse(&mut tokens, "42", &grammar).expect("input is in the language");
//! assert_eq!(value.into_resolved(), Some(42));
//! ```
//!
//! ## Explaining failures
//!
//! When the input does not fit the grammar, [`parse`] returns a
//! [`ParseFailure`] snapshot: the chart built so far, the token that could not
//! be placed, the raw input, and the grammar. [`error::explain`] turns that
//! into a source-annotated explanation, one block per expected terminal:
//!
//! ```rust
//! use earlet::{GrammarBuilder, PlainHighlight, Token, TokenBuffer, parse, explain};
//!
//! let grammar = GrammarBuilder::<()>::new()
//!     .terminals(["a", "b"])
//!     .entry_point("start")
//!     .rule("start", ["a", "b"])
//!     .build()
//!     .expect("grammar is well formed");
//!
//! let mut tokens = TokenBuffer::new(vec![
//!     Token::keyword("a", 1, 1, 0),
//!     Token::keyword("c", 1, 3, 2),
//! ]);
//! let failure = parse(&mut tokens, "a c", &grammar).unwrap_err();
//! let report = explain(&failure, &PlainHighlight).expect("chart is connected");
//! assert!(report.contains("a \"b\" in place of a keyword here:"));
//! ```
//!
//! ## What earlet is not
//!
//! Ambiguous derivations are not preserved as a parse forest: a state's
//! identity ignores its collected data, so when two derivations collide on
//! the same rule, origin, and dot, the most recently derived value wins.
//! Grammars are not validated beyond cheap construction checks, and parsing
//! is a single full pass, not incremental.

pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;

pub use error::{
    AnsiHighlight, DiagnoseError, EmphasisId, Expectation, FailureKind, Highlight, ParseFailure,
    PlainHighlight, diagnose, explain,
};
pub use grammar::{Grammar, GrammarBuilder, GrammarError, ParseValue, Rule, Symbol};
pub use lexer::{Token, TokenBuffer, TokenKind, TokenSource};
pub use parser::{Chart, Column, State, parse};
