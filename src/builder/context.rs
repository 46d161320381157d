//! Branch context - What bound methods and hooks see.

use super::Builder;
use crate::engine::OwnerRef;
use crate::error::{Error, Result};
use crate::primitives::ComponentRef;
use crate::state::VariableCell;
use crate::types::Body;

/// Handed to [`Branch::on_built`](crate::engine::Branch::on_built) and to
/// methods bound with `app_command`. While it is alive, `owner` is the
/// current owner, so grafts made through it register their names there.
pub struct BranchContext<'a> {
    builder: &'a Builder,
    owner: &'a OwnerRef,
}

impl<'a> BranchContext<'a> {
    pub(crate) fn new(builder: &'a Builder, owner: &'a OwnerRef) -> Self {
        Self { builder, owner }
    }

    pub fn builder(&self) -> &Builder {
        self.builder
    }

    pub fn owner(&self) -> &OwnerRef {
        self.owner
    }

    /// The owner's backing component.
    pub fn component(&self) -> &ComponentRef {
        self.owner.component()
    }

    pub fn variable(&self, name: &str) -> Option<VariableCell> {
        self.owner.variable(name)
    }

    /// Like [`variable`](Self::variable), failing when the owner never
    /// declared `name`.
    pub fn require_variable(&self, name: &str) -> Result<VariableCell> {
        self.variable(name).ok_or_else(|| {
            Error::definition(
                self.owner.type_name(),
                format!("no variable '{name}' in this branch"),
            )
        })
    }

    pub fn child(&self, name: &str) -> Option<ComponentRef> {
        self.owner.child(name)
    }

    pub fn require_child(&self, name: &str) -> Result<ComponentRef> {
        self.child(name).ok_or_else(|| {
            Error::definition(
                self.owner.type_name(),
                format!("no child named '{name}' in this branch"),
            )
        })
    }

    /// Component registered under `id` anywhere in the session.
    pub fn widget(&self, id: &str) -> Option<ComponentRef> {
        self.builder.widget(id)
    }

    /// Graft an unnamed `type_name` branch below `parent`.
    pub fn add_branch(&self, type_name: &str, parent: &ComponentRef) -> Result<OwnerRef> {
        self.builder.add_branch(type_name, None, Some(parent), None)
    }

    /// Graft with a name and inline body.
    pub fn add_branch_with(
        &self,
        type_name: &str,
        name: Option<&str>,
        parent: &ComponentRef,
        inline: Option<&Body>,
    ) -> Result<OwnerRef> {
        self.builder.add_branch(type_name, name, Some(parent), inline)
    }
}
