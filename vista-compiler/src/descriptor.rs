use std::fmt;
use std::rc::Rc;

use crate::registry::Directive;

/// Compile-time record of one directive application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptor {
    /// Directive name, without the attribute prefix.
    pub name: String,
    pub expression: String,
    /// Attribute the binding writes to (attribute interpolation).
    pub attr_name: Option<String>,
    /// Attribute that triggered the directive; stripped at bind time unless
    /// the directive retains it.
    pub source_attr: Option<String>,
    pub terminal: bool,
    /// `expression` is a `{{ }}` template rather than a bare expression.
    pub interpolate: bool,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            ..Self::default()
        }
    }

    pub fn with_source_attr(mut self, attr: impl Into<String>) -> Self {
        self.source_attr = Some(attr.into());
        self
    }

    /// Implicit `attr` binding for an attribute whose value interpolates.
    pub fn attr_interpolation(attr: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: crate::directives::ATTR.to_string(),
            expression: template.into(),
            attr_name: Some(attr.into()),
            interpolate: true,
            ..Self::default()
        }
    }
}

/// A descriptor whose name matched a registered directive. Only the registry
/// constructs these.
#[derive(Clone)]
pub struct ResolvedDescriptor {
    pub descriptor: Descriptor,
    pub directive: Rc<dyn Directive>,
}

impl ResolvedDescriptor {
    pub fn priority(&self) -> i32 {
        self.directive.priority()
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

impl fmt::Debug for ResolvedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedDescriptor")
            .field("descriptor", &self.descriptor)
            .field("priority", &self.priority())
            .finish()
    }
}
