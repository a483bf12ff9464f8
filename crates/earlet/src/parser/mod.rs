//! # Parser Module
//!
//! The Earley recognition engine and the chart it builds.
//!
//! [`parse`] drives a [`TokenSource`](crate::lexer::TokenSource) against a
//! [`Grammar`](crate::grammar::Grammar), building one [`Column`] per consumed
//! token and closing each column under prediction, scanning, and completion
//! before pulling the next token. Semantic values are folded into the chart
//! as rules complete, so a successful parse hands back the finished value
//! directly; a failed parse hands back the chart itself, which the
//! [`error`](crate::error) module mines for an explanation.

pub mod chart;
mod engine;
pub mod signature;

pub use chart::{Chart, Column, State};
pub use engine::parse;
pub use signature::{OriginKey, Signature, StateLabel};
