//! Registries - Session-wide lookup tables.
//!
//! - [`WidgetRegistry`]: `id` → component, filled by `id:` directives
//! - [`BranchRegistry`]: branch type name → [`BranchType`]
//! - [`OwnerTable`]: every live owner, so commands can hold weak handles
//!
//! The widget registry and the owner table are journalled. A top-level build
//! takes a [`Checkpoint`] first and rolls back to it if construction fails,
//! so a failed graft never leaves ids pointing at a half-built subtree.

use std::cell::{Cell, RefCell};

use indexmap::IndexMap;

use super::owner::{BranchType, OwnerRef};
use crate::primitives::{is_within, same_component, ComponentRef};

/// Position in a registry's journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    at: usize,
    depth: usize,
}

impl Checkpoint {
    /// True for a checkpoint taken with no other checkpoint open.
    pub fn is_outermost(self) -> bool {
        self.depth == 0
    }
}

// =============================================================================
// Widget Registry
// =============================================================================

enum Change {
    Set {
        id: String,
        previous: Option<ComponentRef>,
    },
    Removed {
        id: String,
        component: ComponentRef,
    },
}

/// Changes are only journalled while a checkpoint is open.
#[derive(Default)]
pub struct WidgetRegistry {
    ids: RefCell<IndexMap<String, ComponentRef>>,
    journal: RefCell<Vec<Change>>,
    open: Cell<usize>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `id` to `component`. Returns the component it replaced, if any.
    pub fn register(&self, id: &str, component: ComponentRef) -> Option<ComponentRef> {
        let previous = self.ids.borrow_mut().insert(id.to_string(), component);
        self.record(Change::Set {
            id: id.to_string(),
            previous: previous.clone(),
        });
        previous
    }

    pub fn get(&self, id: &str) -> Option<ComponentRef> {
        self.ids.borrow().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.borrow().contains_key(id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.ids.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }

    /// Drop every id that points into the subtree rooted at `removed`.
    /// Returns the ids that were dropped.
    pub fn remove_subtree(&self, removed: &ComponentRef) -> Vec<String> {
        let doomed: Vec<(String, ComponentRef)> = self
            .ids
            .borrow()
            .iter()
            .filter(|(_, component)| is_within(component, removed))
            .map(|(id, component)| (id.clone(), component.clone()))
            .collect();

        for (id, component) in &doomed {
            self.ids.borrow_mut().shift_remove(id);
            self.record(Change::Removed {
                id: id.clone(),
                component: component.clone(),
            });
        }
        doomed.into_iter().map(|(id, _)| id).collect()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        let depth = self.open.get();
        self.open.set(depth + 1);
        Checkpoint {
            at: self.journal.borrow().len(),
            depth,
        }
    }

    /// Undo every change made after `checkpoint`, newest first.
    pub fn rollback(&self, checkpoint: Checkpoint) {
        let undone: Vec<Change> = {
            let mut journal = self.journal.borrow_mut();
            let at = checkpoint.at.min(journal.len());
            journal.drain(at..).collect()
        };
        self.close(checkpoint);

        let mut ids = self.ids.borrow_mut();
        for change in undone.into_iter().rev() {
            match change {
                Change::Set {
                    id,
                    previous: Some(previous),
                } => {
                    ids.insert(id, previous);
                }
                Change::Set { id, previous: None } => {
                    ids.shift_remove(&id);
                }
                Change::Removed { id, component } => {
                    ids.insert(id, component);
                }
            }
        }
    }

    /// Keep the changes made after `checkpoint`. The journal is only
    /// discarded once the outermost checkpoint is released.
    pub fn release(&self, checkpoint: Checkpoint) {
        self.close(checkpoint);
    }

    fn close(&self, checkpoint: Checkpoint) {
        self.open.set(checkpoint.depth);
        if checkpoint.is_outermost() {
            self.journal.borrow_mut().clear();
        }
    }

    fn record(&self, change: Change) {
        if self.open.get() > 0 {
            self.journal.borrow_mut().push(change);
        }
    }
}

// =============================================================================
// Branch Registry
// =============================================================================

#[derive(Debug, Default)]
pub struct BranchRegistry {
    types: RefCell<IndexMap<String, BranchType>>,
}

impl BranchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a branch type. A later registration under the same name
    /// replaces the earlier one, which is returned.
    pub fn register(&self, branch_type: BranchType) -> Option<BranchType> {
        self.types
            .borrow_mut()
            .insert(branch_type.name().to_string(), branch_type)
    }

    pub fn get(&self, name: &str) -> Option<BranchType> {
        self.types.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.borrow().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.types.borrow().keys().cloned().collect()
    }
}

// =============================================================================
// Owner Table
// =============================================================================

/// Strong handles to every live owner, tagged with a sequence number so a
/// rollback can drop exactly the owners created after a checkpoint.
#[derive(Default)]
pub struct OwnerTable {
    owners: RefCell<Vec<(usize, OwnerRef)>>,
    next_seq: Cell<usize>,
}

impl OwnerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, owner: OwnerRef) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.owners.borrow_mut().push((seq, owner));
    }

    /// Owner whose backing component is `component`.
    pub fn owner_of(&self, component: &ComponentRef) -> Option<OwnerRef> {
        self.owners
            .borrow()
            .iter()
            .find(|(_, owner)| same_component(owner.component(), component))
            .map(|(_, owner)| owner.clone())
    }

    pub fn len(&self) -> usize {
        self.owners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.borrow().is_empty()
    }

    /// Drop owners backed by components inside `removed`, and forget named
    /// children inside it on the owners that stay.
    pub fn remove_subtree(&self, removed: &ComponentRef) -> usize {
        let dropped: Vec<OwnerRef> = {
            let mut owners = self.owners.borrow_mut();
            let before = owners.len();
            let mut dropped = Vec::with_capacity(before);
            owners.retain(|(_, owner)| {
                if is_within(owner.component(), removed) {
                    dropped.push(owner.clone());
                    false
                } else {
                    true
                }
            });
            dropped
        };

        for (_, owner) in self.owners.borrow().iter() {
            owner.forget_within(removed);
        }
        dropped.len()
    }

    /// Sequence number the next inserted owner will get.
    pub fn mark(&self) -> usize {
        self.next_seq.get()
    }

    /// Drop every owner inserted since `mark`.
    pub fn rollback(&self, mark: usize) {
        self.owners.borrow_mut().retain(|(seq, _)| *seq < mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::owner::{Owner, Plain};
    use crate::primitives::{MemoryToolkit, Toolkit};
    use std::rc::Rc;

    fn frame(toolkit: &MemoryToolkit, parent: Option<&ComponentRef>) -> ComponentRef {
        let component = toolkit.instantiate("Frame", parent, None).unwrap();
        if let Some(parent) = parent {
            parent.attach(component.clone());
        }
        component
    }

    #[test]
    fn test_register_and_replace() {
        let toolkit = MemoryToolkit::new();
        let registry = WidgetRegistry::new();
        let a = frame(&toolkit, None);
        let b = frame(&toolkit, None);

        assert!(registry.register("main", a.clone()).is_none());
        let previous = registry.register("main", b.clone()).unwrap();
        assert!(same_component(&previous, &a));
        assert!(same_component(&registry.get("main").unwrap(), &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rollback_restores_previous_state() {
        let toolkit = MemoryToolkit::new();
        let registry = WidgetRegistry::new();
        let a = frame(&toolkit, None);
        let b = frame(&toolkit, None);
        registry.register("keep", a.clone());
        let base = registry.checkpoint();
        registry.release(base);

        let checkpoint = registry.checkpoint();
        assert!(checkpoint.is_outermost());
        registry.register("keep", b.clone());
        registry.register("new", b.clone());
        registry.rollback(checkpoint);

        assert_eq!(registry.ids(), vec!["keep".to_string()]);
        assert!(same_component(&registry.get("keep").unwrap(), &a));
    }

    #[test]
    fn test_nested_release_keeps_journal_for_outer_rollback() {
        let toolkit = MemoryToolkit::new();
        let registry = WidgetRegistry::new();
        let a = frame(&toolkit, None);

        let outer = registry.checkpoint();
        registry.register("outer", a.clone());
        let inner = registry.checkpoint();
        assert!(!inner.is_outermost());
        registry.register("inner", a.clone());
        registry.release(inner);

        registry.rollback(outer);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_subtree() {
        let toolkit = MemoryToolkit::new();
        let registry = WidgetRegistry::new();
        let root = frame(&toolkit, None);
        let branch = frame(&toolkit, Some(&root));
        let leaf = frame(&toolkit, Some(&branch));
        registry.register("root", root.clone());
        registry.register("branch", branch.clone());
        registry.register("leaf", leaf.clone());

        let dropped = registry.remove_subtree(&branch);
        assert_eq!(dropped, vec!["branch".to_string(), "leaf".to_string()]);
        assert_eq!(registry.ids(), vec!["root".to_string()]);
    }

    #[test]
    fn test_branch_registry() {
        let registry = BranchRegistry::new();
        assert!(registry.register(BranchType::plain("Item", "Frame")).is_none());
        assert!(registry.register(BranchType::plain("Item", "LabelFrame")).is_some());
        assert_eq!(registry.get("Item").unwrap().base(), "LabelFrame");
        assert!(!registry.contains("Other"));
        assert_eq!(registry.names(), vec!["Item".to_string()]);
    }

    #[test]
    fn test_owner_table() {
        let toolkit = MemoryToolkit::new();
        let table = OwnerTable::new();
        let root = frame(&toolkit, None);
        let child = frame(&toolkit, Some(&root));
        let root_owner = Rc::new(Owner::new("Root", root.clone(), Box::new(Plain)));
        root_owner.set_child("item", child.clone());
        table.insert(root_owner.clone());

        let mark = table.mark();
        table.insert(Rc::new(Owner::new("Item", child.clone(), Box::new(Plain))));
        assert_eq!(table.owner_of(&child).unwrap().type_name(), "Item");

        table.rollback(mark);
        assert!(table.owner_of(&child).is_none());
        assert_eq!(table.len(), 1);

        table.insert(Rc::new(Owner::new("Item", child.clone(), Box::new(Plain))));
        assert_eq!(table.remove_subtree(&child), 1);
        assert!(root_owner.child("item").is_none());
    }
}
