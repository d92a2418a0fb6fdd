use thiserror::Error;
use vista_dom::Node;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected a tag name after `<` at byte {offset}")]
    MissingTagName { offset: usize },
    #[error("unterminated attribute value starting at byte {offset}")]
    UnterminatedAttribute { offset: usize },
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },
}

/// Minimal hand-rolled HTML-ish parser with support for:
/// - nested elements, self-closing tags (`<input/>`) and void tags (`<br>`)
/// - attributes in declaration order, boolean attributes as empty values
/// - comments, and raw `<script>` bodies
/// - text kept verbatim, `{{ interpolation }}` included
pub fn parse_template(input: &str) -> Result<Vec<Node>, ParseError> {
    let mut i = 0usize;
    let bytes = input.as_bytes();
    let mut stack: Vec<Node> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    fn push_child(stack: &[Node], roots: &mut Vec<Node>, node: Node) {
        if let Some(parent) = stack.last() {
            parent.append_child(&node);
        } else {
            roots.push(node);
        }
    }

    while i < bytes.len() {
        if bytes[i] == b'<' {
            // comment?
            if input[i..].starts_with("<!--") {
                let start = i;
                let Some(end) = input[i + 4..].find("-->") else {
                    return Err(ParseError::UnterminatedComment { offset: start });
                };
                let body = &input[i + 4..i + 4 + end];
                i += 4 + end + 3;
                push_child(&stack, &mut roots, Node::comment(body));
                continue;
            }

            // closing tag?
            if i + 1 < bytes.len() && bytes[i + 1] == b'/' {
                i += 2;
                let tag = read_ident(bytes, &mut i);
                skip_ws(bytes, &mut i);
                // expect '>'
                if i < bytes.len() && bytes[i] == b'>' {
                    i += 1;
                }
                // pop until matching tag; a stray close tag is ignored
                if let Some(pos) = stack.iter().rposition(|n| n.has_tag(&tag)) {
                    // unclosed inner elements end here too
                    while stack.len() > pos {
                        if let Some(n) = stack.pop() {
                            push_child(&stack, &mut roots, n);
                        }
                    }
                }
                continue;
            }

            // opening or self-closing tag
            let tag_start = i;
            i += 1;
            let tag = read_ident(bytes, &mut i);
            if tag.is_empty() {
                return Err(ParseError::MissingTagName { offset: tag_start });
            }
            let el = Node::element(tag.clone());
            let mut self_closing = false;

            loop {
                skip_ws(bytes, &mut i);
                if i >= bytes.len() {
                    break;
                }
                match bytes[i] {
                    b'/' => {
                        // possible "/>"
                        self_closing = true;
                        i += 1;
                        skip_ws(bytes, &mut i);
                        if i < bytes.len() && bytes[i] == b'>' {
                            i += 1;
                        }
                        break;
                    }
                    b'>' => {
                        i += 1;
                        break;
                    }
                    _ => {
                        // attribute
                        if let Some((name, value)) = read_attribute(bytes, &mut i)? {
                            el.set_attribute(name, value);
                        } else {
                            // skip unknown token
                            i += 1;
                        }
                    }
                }
            }

            if self_closing || is_void(&tag) {
                push_child(&stack, &mut roots, el);
            } else if tag.eq_ignore_ascii_case("script") {
                // raw body up to the closing tag
                let rest = &input[i..];
                let end = find_ci(rest, "</script").unwrap_or(rest.len());
                if end > 0 {
                    el.append_child(&Node::text(&rest[..end]));
                }
                i += end;
                if i < bytes.len() {
                    i += "</script".len();
                    while i < bytes.len() && bytes[i] != b'>' {
                        i += 1;
                    }
                    i = (i + 1).min(bytes.len());
                }
                push_child(&stack, &mut roots, el);
            } else {
                stack.push(el);
            }
        } else {
            // text until next '<'
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            let mut text = input[start..i].to_string();
            if !text.is_empty() {
                // normalize simple newlines around indentation
                if is_all_ws(&text) {
                    // keep a single space if inside element text
                    text = " ".to_string();
                }
                push_child(&stack, &mut roots, Node::text(text));
            }
        }
    }

    // Unclosed tags: fold the stack back into its parents (best-effort)
    while let Some(n) = stack.pop() {
        push_child(&stack, &mut roots, n);
    }

    // Trim root whitespace-only text nodes
    roots.retain(|n| !(n.is_text() && is_all_ws(&n.data())));

    Ok(roots)
}

/// Parse into a single fragment holding every root node.
pub fn parse_fragment(input: &str) -> Result<Node, ParseError> {
    Ok(Node::fragment(parse_template(input)?))
}

fn is_all_ws(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace())
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "br" | "hr" | "img" | "input" | "meta" | "link"
    )
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && (bytes[*i] as char).is_whitespace() {
        *i += 1;
    }
}

fn read_ident(bytes: &[u8], i: &mut usize) -> String {
    let start = *i;
    while *i < bytes.len() {
        let c = bytes[*i] as char;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            *i += 1;
        } else {
            break;
        }
    }
    String::from_utf8(bytes[start..*i].to_vec()).unwrap_or_default()
}

fn read_attribute(bytes: &[u8], i: &mut usize) -> Result<Option<(String, String)>, ParseError> {
    let name_start = *i;
    while *i < bytes.len() {
        let c = bytes[*i] as char;
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '@' | '.') {
            *i += 1;
        } else {
            break;
        }
    }
    if *i == name_start {
        return Ok(None);
    }
    let name = String::from_utf8_lossy(&bytes[name_start..*i]).into_owned();

    skip_ws(bytes, i);
    let mut value = String::new();
    if *i < bytes.len() && bytes[*i] == b'=' {
        *i += 1;
        skip_ws(bytes, i);
        value = read_quoted(bytes, i)?;
    }
    Ok(Some((name, value)))
}

fn read_quoted(bytes: &[u8], i: &mut usize) -> Result<String, ParseError> {
    if *i >= bytes.len() {
        return Ok(String::new());
    }
    let quote = bytes[*i];
    if quote != b'"' && quote != b'\'' {
        // unquoted value: up to whitespace or tag end
        let start = *i;
        while *i < bytes.len() && !(bytes[*i] as char).is_whitespace() && bytes[*i] != b'>' {
            *i += 1;
        }
        return Ok(String::from_utf8_lossy(&bytes[start..*i]).into_owned());
    }
    let open = *i;
    *i += 1;
    let start = *i;
    while *i < bytes.len() && bytes[*i] != quote {
        *i += 1;
    }
    if *i >= bytes.len() {
        return Err(ParseError::UnterminatedAttribute { offset: open });
    }
    let s = String::from_utf8_lossy(&bytes[start..*i]).into_owned();
    *i += 1; // consume closing quote
    Ok(s)
}
