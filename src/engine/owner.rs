//! Branch owners.
//!
//! A branch type is a reusable, separately declared subtree registered with
//! the builder. Each graft creates an [`Owner`]: the backing component, the
//! application's [`Branch`] behaviour, its own variable pool and the named
//! children declared inside it.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::builder::BranchContext;
use crate::document::NodePath;
use crate::error::{Error, Result};
use crate::primitives::{is_within, ComponentRef};
use crate::state::{VariableCell, VariablePool};
use crate::types::{Body, Value};

/// Application method bound by `app_command`.
pub type Method = Rc<dyn Fn(&BranchContext<'_>) -> Result<()>>;

/// Wrap a closure as a [`Method`].
pub fn method<F>(f: F) -> Method
where
    F: Fn(&BranchContext<'_>) -> Result<()> + 'static,
{
    Rc::new(f)
}

/// Arguments a document passes to [`Branch::on_built`]
/// through `post_build_args` / `post_build_kwargs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookArgs {
    pub args: Vec<Value>,
    pub kwargs: Body,
}

impl HookArgs {
    /// Collect hook arguments; inline values win over file values.
    pub fn collect(file: Option<&Body>, inline: Option<&Body>, path: &NodePath) -> Result<Self> {
        let lookup = |key: &str| {
            inline
                .and_then(|body| body.get(key))
                .or_else(|| file.and_then(|body| body.get(key)))
        };

        let args = match lookup("post_build_args") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => {
                return Err(Error::type_error(
                    path.key("post_build_args"),
                    format!("expected a sequence, found {}", crate::document::describe(other)),
                ));
            }
        };
        let kwargs = match lookup("post_build_kwargs") {
            None | Some(Value::Null) => Body::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(Error::type_error(
                    path.key("post_build_kwargs"),
                    format!("expected a mapping, found {}", crate::document::describe(other)),
                ));
            }
        };
        Ok(Self { args, kwargs })
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }
}

/// Behaviour an application attaches to a branch type.
pub trait Branch {
    /// Resolve a method referenced by `app_command`.
    fn method(&self, _name: &str) -> Option<Method> {
        None
    }

    /// Runs once the branch's subtree is built, while the branch is still
    /// the current owner.
    fn on_built(&self, _ctx: &BranchContext<'_>, _args: &HookArgs) -> Result<()> {
        Ok(())
    }
}

/// Branch without methods or hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Branch for Plain {}

// =============================================================================
// Branch Type
// =============================================================================

/// Registration record for a branch type.
#[derive(Clone)]
pub struct BranchType {
    name: String,
    base: String,
    document: Option<PathBuf>,
    factory: Rc<dyn Fn() -> Box<dyn Branch>>,
}

impl BranchType {
    /// `name` is the key used in documents, `base` the toolkit type of the
    /// backing component, `factory` creates one behaviour object per graft.
    pub fn new<B, F>(name: impl Into<String>, base: impl Into<String>, factory: F) -> Self
    where
        B: Branch + 'static,
        F: Fn() -> B + 'static,
    {
        Self {
            name: name.into(),
            base: base.into(),
            document: None,
            factory: Rc::new(move || Box::new(factory()) as Box<dyn Branch>),
        }
    }

    /// Branch with no behaviour of its own.
    pub fn plain(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self::new(name, base, || Plain)
    }

    /// Document holding this branch's subtree, keyed by the branch name.
    pub fn document(mut self, path: impl Into<PathBuf>) -> Self {
        self.document = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    pub(crate) fn create(&self) -> Box<dyn Branch> {
        (self.factory)()
    }
}

impl fmt::Debug for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchType")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("document", &self.document)
            .finish()
    }
}

// =============================================================================
// Owner
// =============================================================================

/// One live branch instance.
pub struct Owner {
    type_name: String,
    component: ComponentRef,
    branch: Box<dyn Branch>,
    variables: VariablePool,
    named: RefCell<IndexMap<String, ComponentRef>>,
}

pub type OwnerRef = Rc<Owner>;

impl Owner {
    pub fn new(type_name: impl Into<String>, component: ComponentRef, branch: Box<dyn Branch>) -> Self {
        Self {
            type_name: type_name.into(),
            component,
            branch,
            variables: VariablePool::new(),
            named: RefCell::new(IndexMap::new()),
        }
    }

    /// Branch type this owner was grafted from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Backing component.
    pub fn component(&self) -> &ComponentRef {
        &self.component
    }

    pub fn branch(&self) -> &dyn Branch {
        self.branch.as_ref()
    }

    pub fn variables(&self) -> &VariablePool {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<VariableCell> {
        self.variables.get(name)
    }

    /// Component declared with `name:` inside this owner.
    pub fn child(&self, name: &str) -> Option<ComponentRef> {
        self.named.borrow().get(name).cloned()
    }

    pub fn child_names(&self) -> Vec<String> {
        self.named.borrow().keys().cloned().collect()
    }

    pub fn resolve_method(&self, name: &str) -> Option<Method> {
        self.branch.method(name)
    }

    pub(crate) fn set_child(&self, name: &str, component: ComponentRef) {
        self.named.borrow_mut().insert(name.to_string(), component);
    }

    /// Drop named children that live inside `removed`.
    pub(crate) fn forget_within(&self, removed: &ComponentRef) {
        self.named
            .borrow_mut()
            .retain(|_, component| !is_within(component, removed));
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner")
            .field("type_name", &self.type_name)
            .field("component", &self.component.type_name())
            .field("variables", &self.variables.names())
            .field("named", &self.child_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{MemoryToolkit, Toolkit};
    use serde_json::json;

    #[test]
    fn test_hook_args_inline_wins() {
        let file = json!({ "post_build_args": ["file"], "post_build_kwargs": { "a": 1 } });
        let inline = json!({ "post_build_args": ["inline", "red"] });
        let args = HookArgs::collect(
            file.as_object(),
            inline.as_object(),
            &NodePath::root(),
        )
        .unwrap();
        assert_eq!(args.args, vec![json!("inline"), json!("red")]);
        assert_eq!(args.kwarg("a"), Some(&json!(1)));
    }

    #[test]
    fn test_hook_args_shape_errors() {
        let bad = json!({ "post_build_args": "oops" });
        let err = HookArgs::collect(bad.as_object(), None, &NodePath::root()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Type);

        let bad = json!({ "post_build_kwargs": [1] });
        let err = HookArgs::collect(None, bad.as_object(), &NodePath::root()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Type);
    }

    #[test]
    fn test_branch_type_builder() {
        let ty = BranchType::plain("Item", "Frame").document("item.yaml");
        assert_eq!(ty.name(), "Item");
        assert_eq!(ty.base(), "Frame");
        assert_eq!(ty.document_path(), Some(Path::new("item.yaml")));
        assert!(ty.create().method("anything").is_none());
    }

    #[test]
    fn test_named_children() {
        let toolkit = MemoryToolkit::new();
        let frame = toolkit.instantiate("Frame", None, None).unwrap();
        let label = toolkit.instantiate("Label", Some(&frame), None).unwrap();
        frame.attach(label.clone());

        let owner = Owner::new("Item", frame.clone(), Box::new(Plain));
        owner.set_child("title", label.clone());
        assert!(owner.child("title").is_some());

        owner.forget_within(&label);
        assert!(owner.child("title").is_none());
    }
}
