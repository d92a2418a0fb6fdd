//! Template-to-binding compiler.
//!
//! [`Compiler::compile`] turns a node tree into a [`CompiledUnit`];
//! [`execute`] runs a unit against a [`ViewModel`](vista_core::ViewModel)
//! and hands back a [`Disposer`] that removes exactly the bindings that run
//! created.

pub mod component;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod directives;
pub mod error;
pub mod link;
pub mod loader;
pub mod mount;
pub mod registry;
pub mod unit;

mod compiler;
mod node;

pub use compiler::Compiler;
pub use component::Component;
pub use config::CompilerConfig;
pub use descriptor::{Descriptor, ResolvedDescriptor};
pub use diagnostics::Diagnostic;
pub use error::{DirectiveError, LinkError, LoadError, MountError};
pub use link::{Disposer, execute, interpolate};
pub use loader::{DirLoader, MemoryLoader, TemplateLoader};
pub use mount::MountTable;
pub use registry::{Directive, DirectiveRegistry};
pub use unit::{CompiledUnit, LinkTarget, Scope};
