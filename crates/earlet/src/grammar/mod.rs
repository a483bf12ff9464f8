//! # Grammar Module
//!
//! Context-free grammar definition: terminals, ordered production rules, and
//! optional per-rule reduction functions.
//!
//! Symbol names are interned once at construction and every right-hand side
//! symbol is classified as terminal or nonterminal up front, so the engine
//! dispatches on a closed [`Symbol`] variant instead of consulting a name set
//! in its hot path.
//!
//! ## Usage
//!
//! ```rust
//! use earlet::grammar::{GrammarBuilder, ParseValue};
//!
//! let grammar = GrammarBuilder::<i64>::new()
//!     .terminals(["number", "+"])
//!     .entry_point("sum")
//!     .rule_with("sum", ["sum", "+", "number"], |data| {
//!         let [lhs, _, rhs]: [ParseValue<i64>; 3] = data.try_into().unwrap_or_default();
//!         lhs.into_resolved().unwrap_or_default() + number(rhs)
//!     })
//!     .rule_with("sum", ["number"], |mut data| number(data.remove(0)))
//!     .build()
//!     .expect("grammar is well formed");
//!
//! fn number(value: ParseValue<i64>) -> i64 {
//!     match value {
//!         ParseValue::Token(tok) => tok.text.parse().unwrap_or(0),
//!         other => other.into_resolved().unwrap_or(0),
//!     }
//! }
//! # let _ = grammar;
//! ```

mod builder;

pub use builder::{GrammarBuilder, GrammarError};

use crate::lexer::Token;
use ahash::RandomState;
use hashbrown::{HashMap, HashSet};
use lasso::{Rodeo, Spur};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// A grammar symbol, classified once at grammar construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A terminal, matched against a token's comparison name.
    Terminal(Spur),
    /// A nonterminal, expanded by the predictor.
    NonTerminal(Spur),
}

impl Symbol {
    /// The interned name behind this symbol, terminal or not.
    #[must_use]
    pub const fn name_key(self) -> Spur {
        match self {
            Self::Terminal(key) | Self::NonTerminal(key) => key,
        }
    }

    /// Whether this symbol is a terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

/// A reduction function folding the values collected for a rule's right-hand
/// side into one caller-defined value.
pub type Resolve<V> = Arc<dyn Fn(Vec<ParseValue<V>>) -> V + Send + Sync>;

/// One production rule: `lhs -> rhs...`, with an optional resolve function.
pub struct Rule<V> {
    /// Interned left-hand side nonterminal name.
    pub lhs: Spur,
    /// Right-hand side symbol sequence; may be empty.
    pub rhs: Arc<[Symbol]>,
    /// Reduction applied when the rule completes.
    pub resolve: Option<Resolve<V>>,
}

impl<V> Clone for Rule<V> {
    fn clone(&self) -> Self {
        Self {
            lhs: self.lhs,
            rhs: Arc::clone(&self.rhs),
            resolve: self.resolve.clone(),
        }
    }
}

impl<V> fmt::Debug for Rule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .field("resolve", &self.resolve.is_some())
            .finish()
    }
}

/// A value flowing through the chart.
///
/// The scanner inserts matched tokens as [`ParseValue::Token`]. When a rule
/// completes, its collected values are folded: a rule with a resolve function
/// produces [`ParseValue::Resolved`]; without one, a single collected value
/// passes through unchanged and multiple values stay together as
/// [`ParseValue::List`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseValue<V> {
    /// A matched terminal's token.
    Token(Token),
    /// The output of a rule's resolve function.
    Resolved(V),
    /// The collected values of a resolver-less rule with several children.
    List(Vec<ParseValue<V>>),
}

impl<V> ParseValue<V> {
    /// Extract the resolved value, if this is one.
    #[must_use]
    pub fn into_resolved(self) -> Option<V> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Token(_) | Self::List(_) => None,
        }
    }

    /// Borrow the token, if this is one.
    #[must_use]
    pub const fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            Self::Resolved(_) | Self::List(_) => None,
        }
    }
}

impl<V: Default> Default for ParseValue<V> {
    fn default() -> Self {
        Self::Resolved(V::default())
    }
}

/// An immutable context-free grammar: terminal set, ordered rule list, and
/// the synthetic start rule wrapping the entry nonterminal.
///
/// Built once through [`GrammarBuilder`] and then only read; a single grammar
/// can serve any number of parse calls.
pub struct Grammar<V> {
    pub(crate) interner: Rodeo,
    pub(crate) terminals: HashSet<Spur, RandomState>,
    pub(crate) rules: Vec<Rule<V>>,
    pub(crate) by_lhs: HashMap<Spur, SmallVec<[usize; 4]>, RandomState>,
    pub(crate) start: Rule<V>,
}

impl<V> fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("terminals", &self.terminals.len())
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl<V> Grammar<V> {
    /// The ordered rule list, as given to the builder.
    #[must_use]
    pub fn rules(&self) -> &[Rule<V>] {
        &self.rules
    }

    /// The synthetic start rule `start -> entry`.
    #[must_use]
    pub const fn start_rule(&self) -> &Rule<V> {
        &self.start
    }

    /// All rules producing `lhs`, in grammar order.
    pub fn rules_for(&self, lhs: Spur) -> impl Iterator<Item = &Rule<V>> {
        self.by_lhs
            .get(&lhs)
            .into_iter()
            .flatten()
            .map(|&index| &self.rules[index])
    }

    /// Resolve an interned symbol name back to its text.
    #[must_use]
    pub fn name(&self, key: Spur) -> &str {
        self.interner.resolve(&key)
    }

    /// The interned key of the terminal a token matches, if any.
    #[must_use]
    pub fn terminal_key(&self, token: &Token) -> Option<Spur> {
        let name = token.comparison_name()?;
        let key = self.interner.get(name)?;
        self.terminals.contains(&key).then_some(key)
    }

    /// Whether `name` names a terminal.
    #[must_use]
    pub fn is_terminal(&self, name: &str) -> bool {
        self.interner
            .get(name)
            .is_some_and(|key| self.terminals.contains(&key))
    }
}
