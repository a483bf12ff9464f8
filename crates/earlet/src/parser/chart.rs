//! Chart data structures: states, columns, and the chart itself.
//!
//! A column holds every state reachable at one input position, in insertion
//! order, deduplicated by [`Signature`]. Columns only grow during a parse;
//! a same-signature insert replaces the previous state in place, keeping its
//! original position.

use crate::grammar::{Grammar, ParseValue, Rule, Symbol};
use crate::lexer::Token;
use crate::parser::signature::{OriginKey, Signature, StateLabel};
use ahash::RandomState;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use std::fmt::Write;
use std::sync::Arc;

/// A partial match of one rule: the dot splits the right-hand side into the
/// symbols already matched (whose values sit in `data`) and those still
/// expected. `origin` is the column the match started at.
#[derive(Debug, Clone)]
pub struct State<V> {
    /// The rule being matched.
    pub rule: Rule<V>,
    /// Dot position, `0..=rule.rhs.len()`.
    pub dot: usize,
    /// Column index the match started at.
    pub origin: usize,
    /// Values collected for the symbols before the dot. After the completer
    /// resolves a finished state, this holds the single resolved value.
    pub data: Vec<ParseValue<V>>,
}

impl<V> State<V> {
    /// A freshly predicted state: dot at 0, no data.
    #[must_use]
    pub const fn predicted(rule: Rule<V>, origin: usize) -> Self {
        Self {
            rule,
            dot: 0,
            origin,
            data: Vec::new(),
        }
    }

    /// Whether the dot has reached the end of the right-hand side.
    ///
    /// Empty-rhs states are complete the moment they are predicted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.dot >= self.rule.rhs.len()
    }

    /// The symbol just after the dot, or `None` when complete.
    #[must_use]
    pub fn next_symbol(&self) -> Option<Symbol> {
        self.rule.rhs.get(self.dot).copied()
    }

    /// This state's deduplication identity.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature {
            origin: self.origin,
            lhs: self.rule.lhs,
            rhs: Arc::clone(&self.rule.rhs),
            dot: self.dot,
        }
    }

    /// This state's dot-independent identity.
    #[must_use]
    pub fn origin_key(&self) -> OriginKey {
        OriginKey {
            origin: self.origin,
            lhs: self.rule.lhs,
            rhs: Arc::clone(&self.rule.rhs),
        }
    }

    /// Displayable `[origin] lhs -> a • b` label.
    #[must_use]
    pub fn label<'a>(&'a self, grammar: &'a Grammar<V>) -> StateLabel<'a, V> {
        StateLabel {
            state: self,
            grammar,
        }
    }
}

impl<V: Clone> State<V> {
    /// A copy of this state with the dot advanced over one matched symbol,
    /// its value appended to the collected data.
    #[must_use]
    pub fn advanced(&self, value: ParseValue<V>) -> Self {
        let mut data = Vec::with_capacity(self.data.len() + 1);
        data.extend(self.data.iter().cloned());
        data.push(value);
        Self {
            rule: self.rule.clone(),
            dot: self.dot + 1,
            origin: self.origin,
            data,
        }
    }

    /// Fold the collected data into this rule's value: the resolve function
    /// if there is one, otherwise a single value passes through and several
    /// stay together as a list.
    #[must_use]
    pub fn resolve_value(&self) -> ParseValue<V> {
        let mut data = self.data.clone();
        match &self.rule.resolve {
            Some(resolve) => ParseValue::Resolved(resolve(data)),
            None if data.len() == 1 => data.remove(0),
            None => ParseValue::List(data),
        }
    }
}

/// One chart entry: all states reachable at input position `index`, plus the
/// token that was consumed to get there (`None` only for column 0).
#[derive(Debug)]
pub struct Column<V> {
    index: usize,
    token: Option<Token>,
    states: Vec<State<V>>,
    by_signature: HashMap<Signature, usize, RandomState>,
}

impl<V> Column<V> {
    pub(crate) fn new(index: usize, token: Option<Token>) -> Self {
        Self {
            index,
            token,
            states: Vec::new(),
            by_signature: HashMap::default(),
        }
    }

    /// This column's input position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The token consumed to reach this column; `None` for column 0.
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// The states in insertion order.
    #[must_use]
    pub fn states(&self) -> &[State<V>] {
        &self.states
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the column holds no states.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Look up a state by signature.
    #[must_use]
    pub fn get(&self, signature: &Signature) -> Option<&State<V>> {
        self.by_signature
            .get(signature)
            .map(|&position| &self.states[position])
    }

    /// A state's insertion position, if present.
    #[must_use]
    pub fn position(&self, signature: &Signature) -> Option<usize> {
        self.by_signature.get(signature).copied()
    }

    /// Insert a state, replacing any previous state with the same signature
    /// in place. Returns `true` when the state was newly appended.
    pub(crate) fn insert(&mut self, state: State<V>) -> bool {
        match self.by_signature.entry(state.signature()) {
            Entry::Occupied(entry) => {
                self.states[*entry.get()] = state;
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(self.states.len());
                self.states.push(state);
                true
            }
        }
    }

    pub(crate) fn state_mut(&mut self, position: usize) -> &mut State<V> {
        &mut self.states[position]
    }
}

/// The full chart: one column per input position, built left to right.
///
/// Length is always the number of successfully consumed tokens plus one.
#[derive(Debug)]
pub struct Chart<V> {
    columns: Vec<Column<V>>,
}

impl<V> Chart<V> {
    /// A chart whose column 0 holds the seed state.
    pub(crate) fn seeded(seed: State<V>) -> Self {
        let mut column = Column::new(0, None);
        column.insert(seed);
        Self {
            columns: vec![column],
        }
    }

    /// The columns in position order.
    #[must_use]
    pub fn columns(&self) -> &[Column<V>] {
        &self.columns
    }

    /// The column at `index`, if built.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&Column<V>> {
        self.columns.get(index)
    }

    /// The most recent column. The chart is never empty.
    #[must_use]
    pub fn last(&self) -> &Column<V> {
        // seeded() guarantees column 0.
        &self.columns[self.columns.len() - 1]
    }

    /// Number of columns built so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the chart holds no columns. Always `false` for a chart built
    /// by the engine.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn column_mut(&mut self, index: usize) -> &mut Column<V> {
        &mut self.columns[index]
    }

    /// The column at `index`, created on demand when it is the next position.
    pub(crate) fn ensure_column(&mut self, index: usize, token: &Token) -> &mut Column<V> {
        debug_assert!(index <= self.columns.len());
        if index == self.columns.len() {
            self.columns.push(Column::new(index, Some(token.clone())));
        }
        &mut self.columns[index]
    }

    /// Debug dump of every column: `S<i>` headers with the consumed token,
    /// then one label per state. Predicted states are marked `.`, states in
    /// progress `>`, complete states `*`.
    #[must_use]
    pub fn dump(&self, grammar: &Grammar<V>) -> String {
        let mut out = String::new();
        for column in &self.columns {
            let token = column
                .token()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            let _ = writeln!(out, "S{}: {token}", column.index());
            for state in column.states() {
                let marker = if state.is_complete() {
                    '*'
                } else if state.dot == 0 {
                    '.'
                } else {
                    '>'
                };
                let _ = writeln!(out, "  {marker} {}", state.label(grammar));
            }
        }
        out
    }
}
