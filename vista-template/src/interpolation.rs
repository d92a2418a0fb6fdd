use pest::Parser;

#[derive(pest_derive::Parser)]
#[grammar = "interpolation.pest"]
struct InterpolationParser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    /// Trimmed expression source between `{{` and `}}`.
    Expression(String),
}

/// Split `text` into literal and expression tokens. Adjacent literals are
/// merged; `{{}}` with a blank body stays literal.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let pairs = match InterpolationParser::parse(Rule::template, text) {
        Ok(pairs) => pairs,
        Err(_) => {
            push_literal(&mut tokens, text);
            return tokens;
        }
    };

    for pair in pairs {
        match pair.as_rule() {
            Rule::expression => {
                let raw = pair.as_str();
                let body = pair
                    .into_inner()
                    .next()
                    .map(|b| b.as_str().trim())
                    .unwrap_or("");
                if body.is_empty() {
                    push_literal(&mut tokens, raw);
                } else {
                    tokens.push(Token::Expression(body.to_string()));
                }
            }
            Rule::literal | Rule::stray_open => push_literal(&mut tokens, pair.as_str()),
            _ => {}
        }
    }
    tokens
}

fn push_literal(tokens: &mut Vec<Token>, s: &str) {
    if s.is_empty() {
        return;
    }
    if let Some(Token::Literal(prev)) = tokens.last_mut() {
        prev.push_str(s);
    } else {
        tokens.push(Token::Literal(s.to_string()));
    }
}

pub fn has_interpolation(text: &str) -> bool {
    // cheap reject before running the grammar
    if !text.contains("{{") {
        return false;
    }
    tokenize(text)
        .iter()
        .any(|t| matches!(t, Token::Expression(_)))
}

/// Render `text`, replacing each expression with `resolve(expr)`.
pub fn interpolate_with<F>(text: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    for token in tokenize(text) {
        match token {
            Token::Literal(s) => out.push_str(&s),
            Token::Expression(expr) => out.push_str(&resolve(&expr)),
        }
    }
    out
}
