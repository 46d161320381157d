//! Events - Named notification handlers.
//!
//! Components raise named notifications (virtual events such as
//! `<<SubtreeAdded>>`) and application code subscribes to them. This is the
//! decoupled path `app_command_event` uses: the button raises an event on its
//! owner, and whoever bound that event reacts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Event handler. Receives the event name.
pub type EventHandler = Rc<dyn Fn(&str)>;

/// Raised on a parent after a branch has been grafted under it.
pub const SUBTREE_ADDED: &str = "<<SubtreeAdded>>";

/// Wrap a bare notification name as a virtual event: `Saved` → `<<Saved>>`.
pub fn virtual_event(name: &str) -> String {
    if name.starts_with("<<") && name.ends_with(">>") {
        name.to_string()
    } else {
        format!("<<{name}>>")
    }
}

/// Handler registry for one component.
#[derive(Default)]
pub struct EventHandlers {
    handlers: RefCell<Vec<(usize, String, EventHandler)>>,
    next_id: Cell<usize>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `event`. Returns an id for [`off`](Self::off).
    pub fn on(&self, event: &str, handler: EventHandler) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers
            .borrow_mut()
            .push((id, event.to_string(), handler));
        id
    }

    /// Remove a handler. Returns false if it was already gone.
    pub fn off(&self, id: usize) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Call every handler bound to `event`, in subscription order.
    /// Returns how many handlers ran.
    pub fn emit(&self, event: &str) -> usize {
        // Handlers may subscribe or graft; don't hold the borrow while calling.
        let matching: Vec<EventHandler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .map(|(_, _, handler)| handler.clone())
            .collect();
        for handler in &matching {
            handler(event);
        }
        matching.len()
    }

    pub fn count(&self, event: &str) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .count()
    }
}
