#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use vista_compiler::{
    Compiler, CompilerConfig, Descriptor, Directive, DirectiveError, DirectiveRegistry, Scope,
};
use vista_core::LiveBinding;
use vista_dom::Node;

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Records every bind and dispose as `bind name=expr` / `dispose name=expr`.
pub struct Recorder {
    log: Log,
    priority: i32,
    terminal: bool,
    retain: bool,
    fail: bool,
}

impl Recorder {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            priority: 0,
            terminal: false,
            retain: false,
            fail: false,
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn retain(mut self) -> Self {
        self.retain = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

struct RecordedBinding {
    label: String,
    log: Log,
}

impl LiveBinding for RecordedBinding {
    fn dispose(&self) {
        self.log.borrow_mut().push(format!("dispose {}", self.label));
    }
}

impl Directive for Recorder {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn retain_attribute(&self) -> bool {
        self.retain
    }

    fn bind(
        &self,
        _scope: &Scope<'_>,
        _node: &Node,
        descriptor: &Descriptor,
    ) -> Result<Box<dyn LiveBinding>, DirectiveError> {
        if self.fail {
            return Err(DirectiveError::new("record refused"));
        }
        let label = format!("{}={}", descriptor.name, descriptor.expression);
        self.log.borrow_mut().push(format!("bind {label}"));
        Ok(Box::new(RecordedBinding {
            label,
            log: self.log.clone(),
        }))
    }
}

/// Built-ins plus a plain `record` directive at priority 0.
pub fn recording_compiler(log: &Log) -> Compiler {
    let mut registry = DirectiveRegistry::with_builtins();
    registry.register("record", Recorder::new(log));
    Compiler::new(registry, CompilerConfig::default().with_diagnostics(true))
}
