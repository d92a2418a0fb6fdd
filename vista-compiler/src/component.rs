use std::cell::RefCell;
use std::rc::Rc;

use vista_core::ViewModel;
use vista_dom::Node;
use vista_template::{ParseError, parse_fragment};

use crate::compiler::Compiler;
use crate::error::{LoadError, MountError};
use crate::loader::TemplateLoader;
use crate::mount::MountTable;
use crate::unit::{CompiledUnit, Scope};

/// A view-model plus its compiled template, mountable onto one node at a
/// time.
pub struct Component {
    name: String,
    vm: Rc<ViewModel>,
    template: Option<Node>,
    unit: Option<CompiledUnit>,
    /// Mount node and the top-level nodes moved into it.
    mounted: RefCell<Option<(Node, Vec<Node>)>>,
}

impl Component {
    /// Parse and compile `source`.
    pub fn new(
        name: impl Into<String>,
        vm: Rc<ViewModel>,
        compiler: &Compiler,
        source: &str,
    ) -> Result<Self, ParseError> {
        let template = parse_fragment(source)?;
        Ok(Self::assemble(name.into(), vm, compiler, Some(template)))
    }

    /// Fetch the template through `loader`. A failed fetch or parse is
    /// logged and leaves the component without a template.
    pub async fn load(
        name: impl Into<String>,
        vm: Rc<ViewModel>,
        compiler: &Compiler,
        loader: &dyn TemplateLoader,
    ) -> Self {
        let name = name.into();
        let template = loader
            .load(&name)
            .await
            .and_then(|source| parse_fragment(&source).map_err(LoadError::from));
        let template = match template {
            Ok(template) => Some(template),
            Err(err) => {
                tracing::warn!(component = %name, error = %err, "template unavailable");
                None
            }
        };
        Self::assemble(name, vm, compiler, template)
    }

    fn assemble(name: String, vm: Rc<ViewModel>, compiler: &Compiler, template: Option<Node>) -> Self {
        let unit = template.as_ref().and_then(|t| compiler.compile(t));
        Self {
            name,
            vm,
            template,
            unit,
            mounted: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vm(&self) -> &Rc<ViewModel> {
        &self.vm
    }

    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Compiled unit of the template; `None` for a static template too.
    pub fn unit(&self) -> Option<&CompiledUnit> {
        self.unit.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.borrow().is_some()
    }

    /// Bind a fresh copy of the template and append it to `el`. A component
    /// is mounted on at most one node at a time and cannot come back after
    /// [`Component::unmount`].
    pub fn mount(&self, table: &MountTable, el: &Node) -> Result<(), MountError> {
        self.mount_with(table, el, None)
    }

    /// Like [`Component::mount`], for a child component of `owner`.
    pub fn mount_with(
        &self,
        table: &MountTable,
        el: &Node,
        owner: Option<&Rc<ViewModel>>,
    ) -> Result<(), MountError> {
        let Some(template) = &self.template else {
            return Err(MountError::NoTemplate(self.name.clone()));
        };
        if self.is_mounted() {
            tracing::error!(component = %self.name, node = %el.id(), "component is already mounted");
            return Err(MountError::ComponentMounted(self.name.clone()));
        }
        if self.vm.is_disposed() {
            return Err(MountError::ComponentDisposed(self.name.clone()));
        }
        table.ensure_free(el)?;

        let instance = template.deep_clone();
        let mut scope = Scope::new(&self.vm);
        if let Some(owner) = owner {
            scope = scope.with_owner(owner);
        }
        table.mount(el, self.unit.as_ref(), &scope, &instance)?;

        let roots = instance.children();
        el.append_child(&instance);
        *self.mounted.borrow_mut() = Some((el.clone(), roots));
        self.vm.lifecycle().run_mounted_hooks();
        Ok(())
    }

    /// Tear down: destroy hooks, bindings, then the mounted nodes. Returns
    /// false when the component was not mounted.
    pub fn unmount(&self, table: &MountTable) -> bool {
        let Some((el, roots)) = self.mounted.borrow_mut().take() else {
            return false;
        };
        self.vm.lifecycle().run_destroy_hooks();
        table.unmount(&el);
        for node in roots {
            node.detach();
        }
        self.vm.mark_disposed();
        true
    }
}
