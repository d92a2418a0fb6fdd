use crate::{Node, NodeKind};

/// Serialize a node (and its subtree) back to markup. Attribute values and
/// text are written verbatim.
pub fn to_markup(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Markup of the children only, e.g. for a mount point.
pub fn inner_markup(node: &Node) -> String {
    let mut out = String::new();
    for child in node.children() {
        write_node(&child, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node.kind() {
        NodeKind::Text => out.push_str(&node.data()),
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&node.data());
            out.push_str("-->");
        }
        NodeKind::Fragment => {
            for child in node.children() {
                write_node(&child, out);
            }
        }
        NodeKind::Element(tag) => {
            out.push('<');
            out.push_str(&tag);
            for (k, v) in node.attributes() {
                out.push(' ');
                out.push_str(&k);
                out.push_str("=\"");
                out.push_str(&v);
                out.push('"');
            }
            if !node.has_children() && is_void(&tag) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in node.children() {
                write_node(&child, out);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "br" | "hr" | "img" | "input" | "meta" | "link"
    )
}
