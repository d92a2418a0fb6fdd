use std::collections::HashMap;
use std::path::PathBuf;

use futures::future::{FutureExt, LocalBoxFuture, ready};

use crate::error::LoadError;

/// Asynchronous source of template markup, looked up by component name.
pub trait TemplateLoader {
    fn load(&self, name: &str) -> LocalBoxFuture<'_, Result<String, LoadError>>;
}

/// Templates registered up front.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    templates: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.templates.insert(name.into(), source.into());
        self
    }
}

impl TemplateLoader for MemoryLoader {
    fn load(&self, name: &str) -> LocalBoxFuture<'_, Result<String, LoadError>> {
        let result = self
            .templates
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(name.to_string()));
        ready(result).boxed_local()
    }
}

/// Reads `<root>/<name>.html`.
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.html"))
    }
}

impl TemplateLoader for DirLoader {
    fn load(&self, name: &str) -> LocalBoxFuture<'_, Result<String, LoadError>> {
        let path = self.path_for(name);
        let name = name.to_string();
        async move {
            match std::fs::read_to_string(&path) {
                Ok(source) => Ok(source),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    Err(LoadError::NotFound(name))
                }
                Err(source) => Err(LoadError::Io { path, source }),
            }
        }
        .boxed_local()
    }
}
