use std::path::PathBuf;

use thiserror::Error;
use vista_dom::NodeId;
use vista_template::ParseError;

/// Failure reported by a directive while creating its live binding.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DirectiveError {
    message: String,
}

impl DirectiveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    /// The live tree no longer has the shape the unit was compiled from.
    #[error("tree shape changed after compilation: compiled {expected} node(s), found {found}")]
    StructuralMismatch { expected: usize, found: usize },
    #[error("directive `{name}` failed to bind")]
    Directive {
        name: String,
        #[source]
        source: DirectiveError,
    },
}

#[derive(Debug, Error)]
pub enum MountError {
    #[error("node {0} already has a binding program mounted")]
    AlreadyMounted(NodeId),
    #[error("component `{0}` has no compiled template")]
    NoTemplate(String),
    #[error("component `{0}` is already mounted")]
    ComponentMounted(String),
    #[error("component `{0}` was unmounted and its view-model disposed")]
    ComponentDisposed(String),
    #[error(transparent)]
    Link(#[from] LinkError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("template `{0}` not found")]
    NotFound(String),
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template does not parse")]
    Parse(#[from] ParseError),
}
