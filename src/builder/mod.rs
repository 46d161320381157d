//! Builder - Materializes documents into live component trees.
//!
//! A [`Builder`] is one session: it owns the widget registry, the branch
//! types, the live owners and the current-owner stack. Nothing here is
//! process-wide, so independent trees (and tests) never see each other.
//!
//! # Example
//!
//! ```ignore
//! let app = spark_tree::build(
//!     BranchType::new("Root", "Tk", || RootBranch).document("root.yaml"),
//!     [BranchType::plain("Item", "Frame").document("item.yaml")],
//!     Rc::new(MemoryToolkit::new()),
//!     Rc::new(FileLoader),
//!     BuilderConfig::default(),
//! )?;
//!
//! let list = app.widget("item_list").unwrap();
//! app.builder().add_branch("Item", None, Some(&list), None)?;
//! ```

mod context;
mod dispatch;
mod graft;
mod placement;

pub use context::*;

use std::rc::{Rc, Weak};

use crate::config::{BuilderConfig, DuplicateIds};
use crate::document::{DocumentLoader, NodePath};
use crate::engine::{BranchRegistry, BranchStack, BranchType, OwnerRef, OwnerStack, OwnerTable, WidgetRegistry};
use crate::error::{Error, Result};
use crate::primitives::{ComponentRef, Toolkit};
use crate::state::VariableCell;
use crate::types::{Body, Value};

struct BuilderInner {
    toolkit: Rc<dyn Toolkit>,
    loader: Rc<dyn DocumentLoader>,
    config: BuilderConfig,
    branches: BranchRegistry,
    widgets: WidgetRegistry,
    owners: OwnerTable,
    scope: OwnerStack,
    building: BranchStack,
}

/// One builder session. Clones share the session.
#[derive(Clone)]
pub struct Builder {
    inner: Rc<BuilderInner>,
}

/// Non-owning handle held by bound commands.
#[derive(Clone)]
pub struct WeakBuilder {
    inner: Weak<BuilderInner>,
}

impl WeakBuilder {
    pub fn upgrade(&self) -> Option<Builder> {
        self.inner.upgrade().map(|inner| Builder { inner })
    }
}

impl Builder {
    pub fn new(toolkit: Rc<dyn Toolkit>, loader: Rc<dyn DocumentLoader>, config: BuilderConfig) -> Self {
        Self {
            inner: Rc::new(BuilderInner {
                toolkit,
                loader,
                config,
                branches: BranchRegistry::new(),
                widgets: WidgetRegistry::new(),
                owners: OwnerTable::new(),
                scope: OwnerStack::new(),
                building: BranchStack::new(),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakBuilder {
        WeakBuilder {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.inner.config
    }

    pub fn toolkit(&self) -> &Rc<dyn Toolkit> {
        &self.inner.toolkit
    }

    /// Register a branch type. Documents naming it graft a new owner.
    pub fn register(&self, branch_type: BranchType) {
        log::debug!("register branch type {} (base {})", branch_type.name(), branch_type.base());
        if self.inner.branches.register(branch_type).is_some() {
            log::warn!("branch type registered twice; the later registration wins");
        }
    }

    pub fn is_branch(&self, type_name: &str) -> bool {
        self.inner.branches.contains(type_name)
    }

    /// Owner that variable and command references currently resolve against.
    pub fn current_owner(&self) -> Option<OwnerRef> {
        self.inner.scope.current()
    }

    /// Component registered under `id`.
    pub fn widget(&self, id: &str) -> Option<ComponentRef> {
        self.inner.widgets.get(id)
    }

    pub fn widget_ids(&self) -> Vec<String> {
        self.inner.widgets.ids()
    }

    /// Owner backed by `component`, if it is a branch's backing component.
    pub fn owner_of(&self, component: &ComponentRef) -> Option<OwnerRef> {
        self.inner.owners.owner_of(component)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Build one document node below `parent`, resolving variables and
    /// commands against the current owner.
    ///
    /// If construction fails the widget registry is left as it was.
    pub fn build(&self, node: &Value, parent: Option<&ComponentRef>) -> Result<ComponentRef> {
        self.transaction(|builder| builder.build_node(node, parent, &NodePath::root()))
    }

    /// [`build`](Self::build) with `owner` as the current owner.
    pub fn build_in(&self, owner: &OwnerRef, node: &Value, parent: Option<&ComponentRef>) -> Result<ComponentRef> {
        let _scope = self.inner.scope.enter(owner.clone());
        self.build(node, parent)
    }

    /// Graft a registered branch type below `parent`.
    ///
    /// `name` registers the backing component on the current owner and in
    /// the widget registry; `inline` is applied before the branch document.
    ///
    /// Branch names share the widget registry with `id:` values. A name
    /// equal to an existing id replaces that entry (or fails under
    /// [`DuplicateIds::Reject`]), and a later `id:` can shadow a branch name
    /// the same way.
    ///
    /// A branch type cannot be grafted while its own document is still being
    /// applied; that is reported as a `Definition` error instead of recursing
    /// forever. Grafting the same type again from a command is fine.
    pub fn add_branch(
        &self,
        type_name: &str,
        name: Option<&str>,
        parent: Option<&ComponentRef>,
        inline: Option<&Body>,
    ) -> Result<OwnerRef> {
        self.transaction(|builder| {
            graft::graft(builder, type_name, name, parent, inline, &NodePath::root().node(type_name))
        })
    }

    /// Register `root` and build it as the top of a new tree.
    pub fn build_root(&self, root: BranchType) -> Result<Application> {
        let type_name = root.name().to_string();
        self.register(root);
        log::debug!("building root {type_name}");
        let root = self.add_branch(&type_name, None, None, None)?;
        log::debug!(
            "root {type_name} built: {} ids, {} owners",
            self.inner.widgets.len(),
            self.inner.owners.len()
        );
        Ok(Application {
            builder: self.clone(),
            root,
        })
    }

    /// Detach `component` from its parent and forget every id, owner and
    /// named child inside it. Returns the ids that were dropped.
    pub fn remove(&self, component: &ComponentRef) -> Vec<String> {
        if let Some(parent) = component.parent() {
            parent.detach(component);
        }
        let ids = self.inner.widgets.remove_subtree(component);
        let owners = self.inner.owners.remove_subtree(component);
        log::debug!("removed {} ({} ids, {owners} owners)", component.type_name(), ids.len());
        ids
    }

    // =========================================================================
    // Owners
    // =========================================================================

    /// Run `f` with `owner` as the current owner.
    pub fn with_owner<T>(&self, owner: &OwnerRef, f: impl FnOnce(&BranchContext<'_>) -> Result<T>) -> Result<T> {
        let _scope = self.inner.scope.enter(owner.clone());
        f(&BranchContext::new(self, owner))
    }

    /// Call a method of `owner` by name, as a bound command would.
    pub fn run_method(&self, owner: &OwnerRef, name: &str) -> Result<()> {
        let method = owner.resolve_method(name).ok_or_else(|| Error::Binding {
            path: owner.type_name().to_string(),
            owner: owner.type_name().to_string(),
            method: name.to_string(),
        })?;
        log::trace!("run {}::{name}", owner.type_name());
        self.with_owner(owner, |ctx| method(ctx))
    }

    // =========================================================================
    // Internals shared by dispatch and graft
    // =========================================================================

    fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let checkpoint = self.inner.widgets.checkpoint();
        let mark = self.inner.owners.mark();
        let result = f(self);
        match &result {
            Ok(_) => self.inner.widgets.release(checkpoint),
            Err(err) => {
                log::debug!("construction failed, restoring registries: {err}");
                self.inner.widgets.rollback(checkpoint);
                self.inner.owners.rollback(mark);
            }
        }
        result
    }

    pub(crate) fn build_node(&self, node: &Value, parent: Option<&ComponentRef>, path: &NodePath) -> Result<ComponentRef> {
        let (type_name, body) = crate::document::node_parts(node, path)?;
        let path = path.node(&type_name);
        let name = dispatch::node_name(&body, &path)?;

        if self.is_branch(&type_name) {
            let owner = graft::graft(self, &type_name, name.as_deref(), parent, Some(&body), &path)?;
            return Ok(owner.component().clone());
        }

        let component = self
            .inner
            .toolkit
            .instantiate(&type_name, parent, name.as_deref())
            .ok_or_else(|| Error::definition(&path, format!("unknown component type '{type_name}'")))?;
        if let Some(parent) = parent {
            parent.attach(component.clone());
        }
        if let Some(name) = &name {
            self.name_child(name, &component);
        }
        dispatch::apply_body(self, &component, &body, &path)?;
        Ok(component)
    }

    pub(crate) fn require_owner(&self, path: &NodePath) -> Result<OwnerRef> {
        self.current_owner()
            .ok_or_else(|| Error::definition(path, "no current owner; build inside a branch"))
    }

    /// Record `component` as a named child of the current owner.
    pub(crate) fn name_child(&self, name: &str, component: &ComponentRef) {
        if let Some(owner) = self.current_owner() {
            owner.set_child(name, component.clone());
        }
    }

    pub(crate) fn register_id(&self, id: &str, component: &ComponentRef, path: &NodePath) -> Result<()> {
        if self.inner.widgets.contains(id) {
            match self.inner.config.duplicate_ids {
                DuplicateIds::Reject => {
                    return Err(Error::definition(path, format!("id '{id}' is already registered")));
                }
                DuplicateIds::Replace => log::warn!("{path}: id '{id}' re-registered, replacing"),
            }
        }
        self.inner.widgets.register(id, component.clone());
        Ok(())
    }

    pub(crate) fn loader(&self) -> &Rc<dyn DocumentLoader> {
        &self.inner.loader
    }

    pub(crate) fn branch_type(&self, type_name: &str) -> Option<BranchType> {
        self.inner.branches.get(type_name)
    }

    pub(crate) fn adopt(&self, owner: OwnerRef) {
        self.inner.owners.insert(owner);
    }

    pub(crate) fn scope(&self) -> &OwnerStack {
        &self.inner.scope
    }

    /// Branch types whose document is being applied.
    pub(crate) fn building(&self) -> &BranchStack {
        &self.inner.building
    }
}

// =============================================================================
// Application
// =============================================================================

/// A built tree: the session plus its root owner.
#[derive(Clone)]
pub struct Application {
    builder: Builder,
    root: OwnerRef,
}

impl Application {
    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn root(&self) -> &OwnerRef {
        &self.root
    }

    /// Root backing component.
    pub fn component(&self) -> &ComponentRef {
        self.root.component()
    }

    pub fn widget(&self, id: &str) -> Option<ComponentRef> {
        self.builder.widget(id)
    }

    /// Variable from the root owner's pool.
    pub fn variable(&self, name: &str) -> Option<VariableCell> {
        self.root.variable(name)
    }

    /// Named child of the root owner.
    pub fn child(&self, name: &str) -> Option<ComponentRef> {
        self.root.child(name)
    }

    pub fn run_method(&self, name: &str) -> Result<()> {
        self.builder.run_method(&self.root, name)
    }
}

/// Build a tree rooted at `root`, with `branches` available to documents.
pub fn build(
    root: BranchType,
    branches: impl IntoIterator<Item = BranchType>,
    toolkit: Rc<dyn Toolkit>,
    loader: Rc<dyn DocumentLoader>,
    config: BuilderConfig,
) -> Result<Application> {
    let builder = Builder::new(toolkit, loader, config);
    for branch_type in branches {
        builder.register(branch_type);
    }
    builder.build_root(root)
}
