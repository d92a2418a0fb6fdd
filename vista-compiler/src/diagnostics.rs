use std::fmt;

use vista_dom::NodeId;

/// Non-fatal compile-time findings. Only collected when
/// [`CompilerConfig::diagnostics`](crate::CompilerConfig) is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnknownDirective {
        name: String,
        /// Triggering attribute; `None` for text interpolation.
        attribute: Option<String>,
        node: NodeId,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownDirective {
                name,
                attribute: Some(attr),
                node,
            } => write!(f, "unknown directive `{name}` (attribute `{attr}` on node {node})"),
            Diagnostic::UnknownDirective { name, node, .. } => {
                write!(f, "unknown directive `{name}` on node {node}")
            }
        }
    }
}
