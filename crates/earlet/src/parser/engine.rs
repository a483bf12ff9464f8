//! The recognition loop: one column per token, closed under prediction,
//! scanning, and completion before the next token is pulled.

use crate::error::ParseFailure;
use crate::grammar::{Grammar, ParseValue, Symbol};
use crate::lexer::{Token, TokenSource};
use crate::parser::chart::{Chart, State};

/// Parse `source`'s tokens against `grammar`, producing the entry rule's
/// value or a failure that explains what was expected instead.
///
/// `input` is the raw text the tokens were lexed from; it is only consulted
/// by failure reports, which quote it with the offending region highlighted.
///
/// The engine pulls exactly one token per column and never looks further
/// ahead. Ambiguous grammars do not produce parse forests: when two
/// derivations of one rule cover the same span, the later one replaces the
/// earlier one's value.
///
/// # Errors
///
/// [`ParseFailure`] when a token matches no expected terminal (every state
/// in the last column is stuck) or when the input ends before the entry rule
/// is complete.
pub fn parse<'g, V, S>(
    source: &mut S,
    input: &str,
    grammar: &'g Grammar<V>,
) -> Result<ParseValue<V>, ParseFailure<'g, V>>
where
    V: Clone,
    S: TokenSource + ?Sized,
{
    source.reset(input);

    let seed = State::predicted(grammar.start_rule().clone(), 0);
    let mut chart = Chart::seeded(seed);
    let mut index = 0;

    loop {
        let token = source.next_token();
        close_column(&mut chart, index, token.as_ref(), grammar);
        let Some(token) = token else { break };
        index += 1;
        if chart.len() <= index {
            // No state in the previous column could scan this token.
            return Err(ParseFailure::blocked(token, chart, input, grammar));
        }
    }

    let start = grammar.start_rule();
    let accepted = start.rhs.len();
    let signature = State::predicted(start.clone(), 0).origin_key().at_dot(accepted);
    if let Some(state) = chart.column(index).and_then(|column| column.get(&signature)) {
        if let Some(value) = state.data.first() {
            return Ok(value.clone());
        }
    }
    Err(ParseFailure::at_eof(chart, input, grammar))
}

/// Run the predictor, scanner, and completer over column `index` until no
/// step adds anything new.
///
/// The column is a work list: states appended while sweeping are themselves
/// swept, and signature deduplication guarantees the sweep terminates. Each
/// position is visited exactly once.
fn close_column<V: Clone>(
    chart: &mut Chart<V>,
    index: usize,
    token: Option<&Token>,
    grammar: &Grammar<V>,
) {
    let scan_key = token.and_then(|tok| grammar.terminal_key(tok));

    let mut pos = 0;
    while pos < chart.column_mut(index).len() {
        let state = chart.column_mut(index).state_mut(pos).clone();
        match state.next_symbol() {
            // Predictor: expand the expected nonterminal's alternatives, in
            // grammar order, anchored at this column.
            Some(Symbol::NonTerminal(lhs)) => {
                let predictions: Vec<_> = grammar
                    .rules_for(lhs)
                    .map(|rule| State::predicted(rule.clone(), index))
                    .collect();
                let column = chart.column_mut(index);
                for prediction in predictions {
                    column.insert(prediction);
                }
            }
            // Scanner: if the lookahead token matches the expected terminal,
            // advance into the next column.
            Some(Symbol::Terminal(key)) => {
                if let (Some(tok), Some(scan)) = (token, scan_key) {
                    if scan == key {
                        let advanced = state.advanced(ParseValue::Token(tok.clone()));
                        chart.ensure_column(index + 1, tok).insert(advanced);
                    }
                }
            }
            // Completer: fold the finished rule's value, store it back into
            // the completed state, and advance every parent waiting on this
            // nonterminal at the origin column.
            None => {
                let value = state.resolve_value();
                chart.column_mut(index).state_mut(pos).data = vec![value.clone()];

                let lhs = state.rule.lhs;
                let parents: Vec<_> = chart
                    .column(state.origin)
                    .map(|origin| {
                        origin
                            .states()
                            .iter()
                            .filter(|parent| {
                                parent.next_symbol() == Some(Symbol::NonTerminal(lhs))
                            })
                            .map(|parent| parent.advanced(value.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                let column = chart.column_mut(index);
                for parent in parents {
                    column.insert(parent);
                }
            }
        }
        pos += 1;
    }
}
