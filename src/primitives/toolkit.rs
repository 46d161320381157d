//! MemoryToolkit - Schema-driven in-memory component library.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::schema::{Schema, BUILTIN_SCHEMAS};
use super::types::{ComponentRef, Toolkit};
use super::widget::Widget;

/// Reference [`Toolkit`]: widgets are plain in-memory records.
pub struct MemoryToolkit {
    schemas: RefCell<IndexMap<&'static str, Schema>>,
    created: RefCell<Vec<String>>,
}

impl Default for MemoryToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryToolkit {
    /// Toolkit with every built-in schema.
    pub fn new() -> Self {
        let schemas = BUILTIN_SCHEMAS
            .iter()
            .map(|schema| (schema.type_name, *schema))
            .collect();
        Self {
            schemas: RefCell::new(schemas),
            created: RefCell::new(Vec::new()),
        }
    }

    /// Add or replace a component type.
    pub fn register(&self, schema: Schema) {
        self.schemas.borrow_mut().insert(schema.type_name, schema);
    }

    pub fn schema(&self, type_name: &str) -> Option<Schema> {
        self.schemas.borrow().get(type_name).copied()
    }

    /// Type names of every component created so far, in creation order.
    pub fn created(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }
}

impl Toolkit for MemoryToolkit {
    fn instantiate(
        &self,
        type_name: &str,
        parent: Option<&ComponentRef>,
        name: Option<&str>,
    ) -> Option<ComponentRef> {
        let schema = self.schema(type_name)?;
        log::trace!("instantiate {type_name} (name: {name:?})");
        self.created.borrow_mut().push(type_name.to_string());
        Some(Rc::new(Widget::new(schema, parent, name)))
    }

    fn knows(&self, type_name: &str) -> bool {
        self.schemas.borrow().contains_key(type_name)
    }
}

/// Downcast a component handle to the reference widget.
pub fn as_widget(component: &ComponentRef) -> Option<&Widget> {
    component.as_any().downcast_ref::<Widget>()
}
