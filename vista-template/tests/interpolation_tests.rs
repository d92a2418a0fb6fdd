use vista_template::{Token, has_interpolation, interpolate_with, tokenize};

#[test]
fn hello_name_tokenizes_into_three_parts() {
    assert_eq!(
        tokenize("Hello {{name}}!"),
        vec![
            Token::Literal("Hello ".into()),
            Token::Expression("name".into()),
            Token::Literal("!".into()),
        ]
    );
}

#[test]
fn expressions_are_trimmed_and_adjacent() {
    assert_eq!(
        tokenize("{{ a }}{{b.c}}"),
        vec![Token::Expression("a".into()), Token::Expression("b.c".into())]
    );
}

#[test]
fn unclosed_open_stays_literal() {
    assert_eq!(tokenize("a {{ b"), vec![Token::Literal("a {{ b".into())]);
    assert!(!has_interpolation("a {{ b"));
}

#[test]
fn blank_expression_is_literal() {
    assert_eq!(tokenize("x{{ }}y"), vec![Token::Literal("x{{ }}y".into())]);
    assert!(!has_interpolation("x{{ }}y"));
}

#[test]
fn plain_text_has_no_interpolation() {
    assert!(!has_interpolation("just text"));
    assert!(has_interpolation("btn {{ kind }}"));
    assert!(tokenize("").is_empty());
}

#[test]
fn interpolate_with_resolves_each_expression() {
    let out = interpolate_with("{{ a }} + {{ b }} = ?", |expr| expr.to_uppercase());
    assert_eq!(out, "A + B = ?");
}
