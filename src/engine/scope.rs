//! Owner Scope - The current-owner cursor.
//!
//! Exactly one branch owner is current while a subtree is being built. Entry
//! into a nested branch pushes its owner; the returned [`ScopeGuard`] pops it
//! when dropped, so the previous owner is restored on success, on `?` early
//! returns and while unwinding.

use std::cell::RefCell;

use super::owner::OwnerRef;

#[derive(Default)]
pub struct OwnerStack {
    stack: RefCell<Vec<OwnerRef>>,
}

impl OwnerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owner that variable and command references resolve against.
    pub fn current(&self) -> Option<OwnerRef> {
        self.stack.borrow().last().cloned()
    }

    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    /// Make `owner` current until the guard is dropped.
    #[must_use = "the owner is popped as soon as the guard is dropped"]
    pub fn enter(&self, owner: OwnerRef) -> ScopeGuard<'_> {
        let mut stack = self.stack.borrow_mut();
        let depth = stack.len();
        stack.push(owner);
        ScopeGuard { stack: self, depth }
    }
}

/// Restores the owner stack to its depth before [`OwnerStack::enter`].
pub struct ScopeGuard<'a> {
    stack: &'a OwnerStack,
    depth: usize,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.stack.stack.borrow_mut();
        debug_assert!(stack.len() > self.depth, "owner stack popped out of order");
        stack.truncate(self.depth);
    }
}

/// Branch types whose document body is being applied right now.
///
/// A document that builds its own type, directly or through another branch,
/// would never finish; [`BranchStack::contains`] lets the builder refuse it.
#[derive(Default)]
pub struct BranchStack {
    stack: RefCell<Vec<String>>,
}

impl BranchStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.stack.borrow().iter().any(|name| name == type_name)
    }

    /// Chain of branch types currently being built, outermost first.
    pub fn chain(&self) -> Vec<String> {
        self.stack.borrow().clone()
    }

    #[must_use = "the branch type is popped as soon as the guard is dropped"]
    pub fn enter(&self, type_name: &str) -> BranchGuard<'_> {
        let mut stack = self.stack.borrow_mut();
        let depth = stack.len();
        stack.push(type_name.to_string());
        BranchGuard { stack: self, depth }
    }
}

pub struct BranchGuard<'a> {
    stack: &'a BranchStack,
    depth: usize,
}

impl Drop for BranchGuard<'_> {
    fn drop(&mut self) {
        self.stack.stack.borrow_mut().truncate(self.depth);
    }
}
