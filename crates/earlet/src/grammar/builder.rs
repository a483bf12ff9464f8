//! Builder for [`Grammar`]: collects names, interns them, and classifies
//! every right-hand side symbol as terminal or nonterminal.

use crate::grammar::{Grammar, ParseValue, Resolve, Rule, Symbol};
use ahash::RandomState;
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use lasso::Rodeo;
use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;

/// The left-hand side name reserved for the synthetic start rule.
const START_NAME: &str = "start";

/// Errors detected while assembling a grammar.
///
/// These are cheap construction checks, not grammar validation: earlet does
/// not analyze reachability, nullability, or ambiguity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar has no rules")]
    NoRules,

    #[error("entry point `{name}` has no rules")]
    UnknownEntryPoint { name: String },

    #[error("`{name}` is reserved for the synthetic start rule")]
    ReservedName { name: String },
}

/// Incrementally assembles a [`Grammar`].
///
/// Rule order is preserved: the predictor expands alternatives in the order
/// they were added, which in turn drives the "most specific expectation
/// first" ordering of failure diagnoses.
///
/// The entry point defaults to the first rule's left-hand side.
pub struct GrammarBuilder<V> {
    terminals: Vec<CompactString>,
    rules: Vec<ProtoRule<V>>,
    entry: Option<CompactString>,
}

struct ProtoRule<V> {
    lhs: CompactString,
    rhs: Vec<CompactString>,
    resolve: Option<Resolve<V>>,
}

impl<V> Default for GrammarBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> GrammarBuilder<V> {
    /// Create an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            terminals: Vec::new(),
            rules: Vec::new(),
            entry: None,
        }
    }

    /// Declare terminal names.
    #[must_use]
    pub fn terminals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.terminals.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare a single terminal name.
    #[must_use]
    pub fn terminal(mut self, name: impl Into<CompactString>) -> Self {
        self.terminals.push(name.into());
        self
    }

    /// Set the entry nonterminal. Defaults to the first rule's left-hand side.
    #[must_use]
    pub fn entry_point(mut self, name: impl Into<CompactString>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Add a rule without a resolve function.
    ///
    /// On completion, a single collected value passes through unchanged and
    /// multiple values stay together as a [`ParseValue::List`].
    #[must_use]
    pub fn rule<I, S>(mut self, lhs: impl Into<CompactString>, rhs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.rules.push(ProtoRule {
            lhs: lhs.into(),
            rhs: rhs.into_iter().map(Into::into).collect(),
            resolve: None,
        });
        self
    }

    /// Add a rule with a resolve function folding the collected values.
    #[must_use]
    pub fn rule_with<I, S, F>(mut self, lhs: impl Into<CompactString>, rhs: I, resolve: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
        F: Fn(Vec<ParseValue<V>>) -> V + Send + Sync + 'static,
    {
        self.rules.push(ProtoRule {
            lhs: lhs.into(),
            rhs: rhs.into_iter().map(Into::into).collect(),
            resolve: Some(Arc::new(resolve)),
        });
        self
    }

    /// Intern, classify, and index everything into an immutable [`Grammar`].
    pub fn build(self) -> Result<Grammar<V>, GrammarError> {
        let Some(first) = self.rules.first() else {
            return Err(GrammarError::NoRules);
        };
        let entry_name = self.entry.clone().unwrap_or_else(|| first.lhs.clone());

        if self.rules.iter().any(|rule| rule.lhs == START_NAME) && entry_name != START_NAME {
            // A user rule named like the synthetic wrapper would collide with
            // the acceptance signature unless it is itself the entry point.
            return Err(GrammarError::ReservedName {
                name: START_NAME.to_string(),
            });
        }

        let mut interner = Rodeo::default();
        let mut terminals: HashSet<_, RandomState> = HashSet::default();
        for name in &self.terminals {
            terminals.insert(interner.get_or_intern(name.as_str()));
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        let mut by_lhs: HashMap<_, SmallVec<[usize; 4]>, RandomState> = HashMap::default();
        for proto in self.rules {
            let lhs = interner.get_or_intern(proto.lhs.as_str());
            let rhs: Arc<[Symbol]> = proto
                .rhs
                .iter()
                .map(|name| {
                    let key = interner.get_or_intern(name.as_str());
                    if terminals.contains(&key) {
                        Symbol::Terminal(key)
                    } else {
                        Symbol::NonTerminal(key)
                    }
                })
                .collect();
            by_lhs.entry(lhs).or_default().push(rules.len());
            rules.push(Rule {
                lhs,
                rhs,
                resolve: proto.resolve,
            });
        }

        let entry = interner.get_or_intern(entry_name.as_str());
        if !by_lhs.contains_key(&entry) {
            return Err(GrammarError::UnknownEntryPoint {
                name: entry_name.to_string(),
            });
        }

        let start = Rule {
            lhs: interner.get_or_intern(START_NAME),
            rhs: Arc::from([Symbol::NonTerminal(entry)]),
            resolve: None,
        };

        Ok(Grammar {
            interner,
            terminals,
            rules,
            by_lhs,
            start,
        })
    }
}
