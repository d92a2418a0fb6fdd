use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use vista_compiler::{Compiler, CompilerConfig, Component, Diagnostic, DirectiveRegistry, MountTable};
use vista_core::ViewModel;
use vista_dom::h;
use vista_dom::markup::inner_markup;

/// Result of `vista check`.
#[derive(Debug)]
pub struct CheckReport {
    pub name: String,
    /// False for a template with nothing to bind.
    pub compiled: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.compiled { "bindings" } else { "static" };
        write!(f, "{}: {state}", self.name)?;
        for d in &self.diagnostics {
            write!(f, "\n  warning: {d}")?;
        }
        Ok(())
    }
}

fn compiler(config: CompilerConfig) -> Compiler {
    Compiler::new(DirectiveRegistry::with_builtins(), config)
}

fn component_name(input: &Path) -> &str {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("component")
}

fn read_template(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

/// Parse and compile a template file.
pub fn check_cmd(input: &Path, config: CompilerConfig) -> Result<CheckReport> {
    let src = read_template(input)?;
    let compiler = compiler(config);
    let component = Component::new(component_name(input), ViewModel::new(), &compiler, &src)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    let report = CheckReport {
        name: component.name().to_string(),
        compiled: component.unit().is_some(),
        diagnostics: compiler.take_diagnostics(),
    };
    tracing::info!(component = %report.name, compiled = report.compiled, diagnostics = report.diagnostics.len(), "checked");
    Ok(report)
}

/// Compile a template file, mount it against `data` (a JSON object file) and
/// return the rendered markup.
pub fn render_cmd(input: &Path, data: Option<&Path>, config: CompilerConfig) -> Result<String> {
    let src = read_template(input)?;
    let data = match data {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<Value>(&raw)
                .with_context(|| format!("invalid JSON in {}", path.display()))?
        }
        None => Value::Object(Default::default()),
    };
    if !data.is_object() {
        anyhow::bail!("view-model data must be a JSON object");
    }

    let compiler = compiler(config);
    let vm = ViewModel::from_json(data);
    let component = Component::new(component_name(input), vm, &compiler, &src)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    for d in compiler.take_diagnostics() {
        eprintln!("warning: {d}");
    }

    let table = MountTable::new();
    let root = h("body", (), vec![]);
    component
        .mount(&table, &root)
        .with_context(|| format!("failed to mount {}", component.name()))?;
    let markup = inner_markup(&root);
    component.unmount(&table);
    Ok(markup)
}
