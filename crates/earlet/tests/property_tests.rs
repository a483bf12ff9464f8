//! Property-based tests for the chart engine
//!
//! These generate random token streams and verify that acceptance matches
//! language membership and that resolved values track the input.

use earlet::{Grammar, GrammarBuilder, ParseValue, Token, TokenBuffer, diagnose, parse};
use proptest::prelude::*;

/// Lay words out on one space-separated line, producing both the raw text
/// and the matching token stream. Digit-only words become `number` tokens.
fn tokens_from<S: AsRef<str>>(words: &[S]) -> (String, Vec<Token>) {
    let mut input = String::new();
    let mut tokens = Vec::new();
    for word in words {
        let word = word.as_ref();
        if !input.is_empty() {
            input.push(' ');
        }
        let offset = input.len();
        let col = u32::try_from(offset + 1).unwrap_or(u32::MAX);
        let token = if !word.is_empty() && word.chars().all(|ch| ch.is_ascii_digit()) {
            Token::typed("number", word, 1, col, offset)
        } else {
            Token::keyword(word, 1, col, offset)
        };
        input.push_str(word);
        tokens.push(token);
    }
    (input, tokens)
}

fn sum_grammar() -> Grammar<i64> {
    fn number(value: &ParseValue<i64>) -> i64 {
        value
            .as_token()
            .and_then(|tok| tok.text.parse().ok())
            .unwrap_or(0)
    }

    GrammarBuilder::new()
        .terminals(["number", "+"])
        .entry_point("sum")
        .rule_with("sum", ["sum", "+", "number"], |data| {
            data[0].clone().into_resolved().unwrap_or(0) + number(&data[2])
        })
        .rule_with("sum", ["number"], |data| number(&data[0]))
        .build()
        .expect("grammar is well formed")
}

fn group_grammar() -> Grammar<()> {
    GrammarBuilder::new()
        .terminals(["(", ")", "x"])
        .rule("group", ["(", "group", ")"])
        .rule("group", ["x"])
        .build()
        .expect("grammar is well formed")
}

proptest! {
    #[test]
    fn sums_resolve_to_arithmetic(values in prop::collection::vec(0i64..1000, 1..20)) {
        let grammar = sum_grammar();
        let mut words = Vec::new();
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                words.push("+".to_string());
            }
            words.push(value.to_string());
        }
        let (input, tokens) = tokens_from(&words);
        let mut source = TokenBuffer::new(tokens);
        let parsed = parse(&mut source, &input, &grammar);
        prop_assert!(parsed.is_ok());
        if let Ok(value) = parsed {
            prop_assert_eq!(value.into_resolved(), Some(values.iter().sum::<i64>()));
        }
    }

    #[test]
    fn only_the_exact_pair_is_accepted(
        letters in prop::collection::vec(prop::sample::select(vec!["a", "b"]), 0..6),
    ) {
        let grammar = GrammarBuilder::<()>::new()
            .terminals(["a", "b"])
            .rule("pair", ["a", "b"])
            .build()
            .expect("grammar is well formed");
        let (input, tokens) = tokens_from(&letters);
        let mut source = TokenBuffer::new(tokens);
        let accepted = parse(&mut source, &input, &grammar).is_ok();
        prop_assert_eq!(accepted, letters == ["a", "b"]);
    }

    #[test]
    fn nested_groups_parse_at_any_depth(depth in 0usize..12) {
        let grammar = group_grammar();
        let mut words = vec!["("; depth];
        words.push("x");
        words.extend(std::iter::repeat_n(")", depth));
        let (input, tokens) = tokens_from(&words);
        let mut source = TokenBuffer::new(tokens);
        prop_assert!(parse(&mut source, &input, &grammar).is_ok());
    }

    #[test]
    fn unclosed_groups_expect_the_closing_paren(depth in 1usize..8) {
        let grammar = group_grammar();
        let mut words = vec!["("; depth];
        words.push("x");
        words.extend(std::iter::repeat_n(")", depth - 1));
        let (input, tokens) = tokens_from(&words);
        let mut source = TokenBuffer::new(tokens);
        let failure = parse(&mut source, &input, &grammar).unwrap_err();
        prop_assert!(failure.token().is_eof());
        let expectations = diagnose(&failure).expect("chart is connected");
        prop_assert!(expectations.iter().any(|exp| exp.terminal == ")"));
    }
}
