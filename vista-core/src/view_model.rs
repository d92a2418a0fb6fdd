use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;

use crate::ledger::BindingLedger;
use crate::lifecycle::Lifecycle;
use crate::signal::Signal;

/// Runtime view object: named reactive fields, the binding ledger, and the
/// component lifecycle hooks.
pub struct ViewModel {
    fields: RefCell<BTreeMap<String, Rc<Signal<Value>>>>,
    bindings: BindingLedger,
    lifecycle: Lifecycle,
    disposed: Cell<bool>,
}

impl ViewModel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            fields: RefCell::new(BTreeMap::new()),
            bindings: BindingLedger::new(),
            lifecycle: Lifecycle::new(),
            disposed: Cell::new(false),
        })
    }

    /// Top-level keys of a JSON object become fields; anything else yields an
    /// empty view-model.
    pub fn from_json(data: Value) -> Rc<Self> {
        let vm = Self::new();
        if let Value::Object(map) = data {
            for (name, value) in map {
                vm.set(&name, value);
            }
        }
        vm
    }

    /// Install the field if missing (value `Null`) and return its signal.
    pub fn declare(&self, name: &str) -> Rc<Signal<Value>> {
        self.fields
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| Rc::new(Signal::new(Value::Null)))
            .clone()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.borrow().contains_key(name)
    }

    fn field(&self, name: &str) -> Option<Rc<Signal<Value>>> {
        self.fields.borrow().get(name).cloned()
    }

    pub fn set(&self, name: &str, value: Value) {
        // The fields borrow is released before set() runs subscribers.
        let signal = self.declare(name);
        signal.set(value);
    }

    /// Tracked read; `Null` for unknown fields.
    pub fn get(&self, name: &str) -> Value {
        self.field(name).map(|s| s.get()).unwrap_or(Value::Null)
    }

    /// Evaluate an expression against the current data.
    ///
    /// Supported forms: a dotted path whose first segment names a field
    /// (`user.name`, `items.0`), or a JSON literal (`'x'`, `"x"`, `42`,
    /// `true`). Unresolvable paths evaluate to `Null`.
    pub fn evaluate(&self, expr: &str) -> Value {
        let expr = expr.trim();
        if expr.is_empty() {
            return Value::Null;
        }
        if let Some(lit) = literal(expr) {
            return lit;
        }

        let mut segments = expr.split('.').map(str::trim);
        let Some(head) = segments.next() else {
            return Value::Null;
        };
        let mut current = self.get(head);
        for seg in segments {
            current = match current {
                Value::Object(mut map) => map.remove(seg).unwrap_or(Value::Null),
                Value::Array(mut items) => match seg.parse::<usize>() {
                    Ok(i) if i < items.len() => items.swap_remove(i),
                    _ => Value::Null,
                },
                _ => Value::Null,
            };
        }
        current
    }

    pub fn evaluate_string(&self, expr: &str) -> String {
        display_value(&self.evaluate(expr))
    }

    pub fn bindings(&self) -> &BindingLedger {
        &self.bindings
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn mark_disposed(&self) {
        self.disposed.set(true);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Declare `name` now and assign it when `source` settles.
    ///
    /// The field exists (as `Null`) as soon as this returns, before the
    /// future is polled. A rejected source is logged and leaves the field
    /// `Null`. Nothing is cancelled on disposal: a value settling after
    /// [`ViewModel::mark_disposed`] is still assigned.
    pub fn resolve_field<F, E>(self: &Rc<Self>, name: &str, source: F) -> LocalBoxFuture<'static, ()>
    where
        F: Future<Output = Result<Value, E>> + 'static,
        E: Display + 'static,
    {
        self.declare(name);
        let vm = Rc::clone(self);
        let name = name.to_string();
        async move {
            match source.await {
                Ok(value) => {
                    if vm.is_disposed() {
                        tracing::debug!(field = %name, "field settled after view-model disposal");
                    }
                    vm.set(&name, value);
                }
                Err(err) => {
                    tracing::warn!(field = %name, error = %err, "field initialization failed");
                }
            }
        }
        .boxed_local()
    }
}

fn literal(expr: &str) -> Option<Value> {
    let first = expr.chars().next()?;
    if first == '\'' && expr.len() >= 2 && expr.ends_with('\'') {
        return Some(Value::String(expr[1..expr.len() - 1].to_string()));
    }
    if first == '"' || first == '-' || first.is_ascii_digit() || matches!(expr, "true" | "false" | "null") {
        return serde_json::from_str(expr).ok();
    }
    None
}

/// Text form used when writing a value into the tree: strings verbatim,
/// `Null` as empty, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literals_parse() {
        assert_eq!(literal("'hi'"), Some(json!("hi")));
        assert_eq!(literal("42"), Some(json!(42)));
        assert_eq!(literal("true"), Some(json!(true)));
        assert_eq!(literal("name"), None);
    }

    #[test]
    fn display_formats() {
        assert_eq!(display_value(&Value::Null), "");
        assert_eq!(display_value(&json!("x")), "x");
        assert_eq!(display_value(&json!(3)), "3");
    }
}
