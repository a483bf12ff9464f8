//! State identity and display labels.
//!
//! A state's [`Signature`] — rule origin, left-hand side, right-hand side,
//! and dot — is its canonical identity inside one column: the chart keeps at
//! most one state per signature and a colliding insert replaces the previous
//! state's data. Collected data is deliberately excluded, which is what makes
//! ambiguous derivations collapse (last writer wins).
//!
//! [`OriginKey`] drops the dot: it identifies "the same rule anchored at the
//! same origin, at any stage of matching", and is how the diagnoser jumps
//! from a partially matched state to its just-predicted ancestor.

use crate::grammar::{Grammar, Symbol};
use crate::parser::chart::State;
use lasso::Spur;
use std::fmt;
use std::sync::Arc;

/// Canonical identity of a state within a column: `(origin, lhs, rhs, dot)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub origin: usize,
    pub lhs: Spur,
    pub rhs: Arc<[Symbol]>,
    pub dot: usize,
}

/// Dot-independent identity of a state: `(origin, lhs, rhs)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OriginKey {
    pub origin: usize,
    pub lhs: Spur,
    pub rhs: Arc<[Symbol]>,
}

impl OriginKey {
    /// Re-attach a dot position, yielding the signature of the state this
    /// rule/origin pair would have at that stage.
    #[must_use]
    pub fn at_dot(&self, dot: usize) -> Signature {
        Signature {
            origin: self.origin,
            lhs: self.lhs,
            rhs: Arc::clone(&self.rhs),
            dot,
        }
    }
}

/// Human-readable rendering of a state: `[origin] lhs -> a "b" • c`.
///
/// Terminals are quoted, nonterminals are bare, and `•` marks the dot. This
/// is the label failure reports print for each production on a derivation
/// path.
pub struct StateLabel<'a, V> {
    pub(crate) state: &'a State<V>,
    pub(crate) grammar: &'a Grammar<V>,
}

impl<V> fmt::Display for StateLabel<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = &self.state.rule;
        write!(
            f,
            "[{}] {} ->",
            self.state.origin,
            self.grammar.name(rule.lhs)
        )?;
        for (position, symbol) in rule.rhs.iter().enumerate() {
            if position == self.state.dot {
                f.write_str(" •")?;
            }
            let name = self.grammar.name(symbol.name_key());
            match symbol {
                Symbol::Terminal(_) => write!(f, " \"{name}\"")?,
                Symbol::NonTerminal(_) => write!(f, " {name}")?,
            }
        }
        if self.state.dot == rule.rhs.len() {
            f.write_str(" •")?;
        }
        Ok(())
    }
}
