//! Tests for the chart engine against realistic grammars

use earlet::{GrammarBuilder, ParseValue, Token, TokenBuffer, parse};

/// Minimal JSON-flavored value for resolver tests.
#[derive(Debug, Clone, PartialEq)]
enum Json {
    Null,
    Bool(bool),
    Number(i64),
    Array(Vec<Json>),
}

fn json_grammar() -> earlet::Grammar<Json> {
    fn unwrap(value: ParseValue<Json>) -> Json {
        value.into_resolved().unwrap_or(Json::Null)
    }

    GrammarBuilder::new()
        .terminals(["number", "true", "false", "null", "[", "]", ","])
        .entry_point("value")
        .rule_with("value", ["number"], |data| {
            let text = data[0].as_token().map(|tok| tok.text.as_str()).unwrap_or("");
            Json::Number(text.parse().unwrap_or(0))
        })
        .rule_with("value", ["true"], |_| Json::Bool(true))
        .rule_with("value", ["false"], |_| Json::Bool(false))
        .rule_with("value", ["null"], |_| Json::Null)
        .rule_with("value", ["array"], |mut data| unwrap(data.remove(0)))
        .rule_with("array", ["[", "]"], |_| Json::Array(Vec::new()))
        .rule_with("array", ["[", "items", "]"], |mut data| {
            unwrap(data.remove(1))
        })
        .rule_with("items", ["value"], |mut data| {
            Json::Array(vec![unwrap(data.remove(0))])
        })
        .rule_with("items", ["items", ",", "value"], |mut data| {
            let last = unwrap(data.remove(2));
            match unwrap(data.remove(0)) {
                Json::Array(mut items) => {
                    items.push(last);
                    Json::Array(items)
                }
                other => Json::Array(vec![other, last]),
            }
        })
        .build()
        .expect("grammar is well formed")
}

/// Lex a bracket/number/word toy language, tracking positions the way a real
/// lexer would.
fn lex(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut col = 1;
    let mut chars = input.char_indices().peekable();
    while let Some(&(offset, ch)) = chars.peek() {
        if ch == '\n' {
            chars.next();
            line += 1;
            col = 1;
        } else if ch.is_whitespace() {
            chars.next();
            col += 1;
        } else if ch.is_ascii_digit() {
            let start_col = col;
            let mut text = String::new();
            while let Some(&(_, digit)) = chars.peek() {
                if !digit.is_ascii_digit() {
                    break;
                }
                text.push(digit);
                chars.next();
                col += 1;
            }
            tokens.push(Token::typed("number", text, line, start_col, offset));
        } else if ch.is_ascii_alphabetic() {
            let start_col = col;
            let mut text = String::new();
            while let Some(&(_, letter)) = chars.peek() {
                if !letter.is_ascii_alphabetic() {
                    break;
                }
                text.push(letter);
                chars.next();
                col += 1;
            }
            tokens.push(Token::keyword(text, line, start_col, offset));
        } else {
            chars.next();
            tokens.push(Token::keyword(ch.to_string(), line, col, offset));
            col += 1;
        }
    }
    tokens
}

#[test]
fn nested_arrays_resolve_in_source_order() {
    let grammar = json_grammar();
    let input = "[1,[2,true],null]";
    let mut tokens = TokenBuffer::new(lex(input));
    let value = parse(&mut tokens, input, &grammar).expect("input is valid");
    assert_eq!(
        value.into_resolved(),
        Some(Json::Array(vec![
            Json::Number(1),
            Json::Array(vec![Json::Number(2), Json::Bool(true)]),
            Json::Null,
        ]))
    );
}

#[test]
fn empty_array_uses_the_dedicated_rule() {
    let grammar = json_grammar();
    let mut tokens = TokenBuffer::new(lex("[]"));
    let value = parse(&mut tokens, "[]", &grammar).expect("input is valid");
    assert_eq!(value.into_resolved(), Some(Json::Array(Vec::new())));
}

#[test]
fn left_recursion_folds_left_to_right() {
    let grammar = GrammarBuilder::<i64>::new()
        .terminals(["number", "+", "-"])
        .entry_point("sum")
        .rule_with("sum", ["sum", "+", "number"], |data| {
            lhs_value(&data) + number(&data[2])
        })
        .rule_with("sum", ["sum", "-", "number"], |data| {
            lhs_value(&data) - number(&data[2])
        })
        .rule_with("sum", ["number"], |data| number(&data[0]))
        .build()
        .expect("grammar is well formed");

    fn lhs_value(data: &[ParseValue<i64>]) -> i64 {
        data[0].clone().into_resolved().unwrap_or(0)
    }

    fn number(value: &ParseValue<i64>) -> i64 {
        value
            .as_token()
            .and_then(|tok| tok.text.parse().ok())
            .unwrap_or(0)
    }

    let input = "10 - 3 - 2 + 1";
    let mut tokens = TokenBuffer::new(lex(input));
    let value = parse(&mut tokens, input, &grammar).expect("input is valid");
    assert_eq!(value.into_resolved(), Some(6));
}

#[test]
fn typed_tokens_match_by_type_name_not_text() {
    let grammar = GrammarBuilder::<()>::new()
        .terminals(["ident"])
        .rule("expr", ["ident"])
        .build()
        .expect("grammar is well formed");

    let mut tokens = TokenBuffer::new(vec![Token::typed("ident", "whatever", 1, 1, 0)]);
    assert!(parse(&mut tokens, "whatever", &grammar).is_ok());

    // A keyword token spelled "ident" matches the same terminal by text.
    let mut tokens = TokenBuffer::new(vec![Token::keyword("ident", 1, 1, 0)]);
    assert!(parse(&mut tokens, "ident", &grammar).is_ok());
}

#[test]
fn resolverless_rules_pass_singletons_through_and_group_the_rest() {
    let grammar = GrammarBuilder::<()>::new()
        .terminals(["a", "b"])
        .entry_point("outer")
        .rule("outer", ["inner"])
        .rule("inner", ["a", "b"])
        .build()
        .expect("grammar is well formed");

    let input = "ab";
    let mut tokens = TokenBuffer::new(vec![
        Token::keyword("a", 1, 1, 0),
        Token::keyword("b", 1, 2, 1),
    ]);
    let value = parse(&mut tokens, input, &grammar).expect("input is valid");
    // `inner` groups its two tokens; `outer` passes the group through.
    let ParseValue::List(items) = value else {
        panic!("expected a grouped value");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_token().map(|tok| tok.text.as_str()), Some("a"));
    assert_eq!(items[1].as_token().map(|tok| tok.text.as_str()), Some("b"));
}

#[test]
fn colliding_derivations_keep_the_later_rule() {
    // Two rules with an identical shape collide in the chart; the one added
    // later replaces the earlier one, resolver included.
    let grammar = GrammarBuilder::<&'static str>::new()
        .terminals(["x"])
        .rule_with("expr", ["x"], |_| "first")
        .rule_with("expr", ["x"], |_| "second")
        .build()
        .expect("grammar is well formed");

    let mut tokens = TokenBuffer::new(vec![Token::keyword("x", 1, 1, 0)]);
    let value = parse(&mut tokens, "x", &grammar).expect("input is valid");
    assert_eq!(value.into_resolved(), Some("second"));
}

#[test]
fn grammar_is_reusable_across_parses() {
    let grammar = json_grammar();
    for input in ["[]", "[1]", "[1,[2],[]]"] {
        let mut tokens = TokenBuffer::new(lex(input));
        assert!(
            parse(&mut tokens, input, &grammar).is_ok(),
            "failed to parse {input:?}"
        );
    }
    let mut tokens = TokenBuffer::new(lex("[1,]"));
    assert!(parse(&mut tokens, "[1,]", &grammar).is_err());
}
