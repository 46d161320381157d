//! Widget - The reference toolkit's component.
//!
//! A widget keeps everything the builder did to it: options, placement,
//! minimum size, extension-method calls, children and event bindings.
//! Activation emulates a user click so bound commands and variables can be
//! exercised without a display.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::schema::{Activation, Schema};
use super::types::{same_component, Cleanup, Component, ComponentRef, Setting, ToolkitError};
use crate::error::{Error, Result};
use crate::state::{EventHandler, EventHandlers, VariableCell};
use crate::types::{Placement, Value, VarType, VarValue};

/// One recorded extension-method call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    pub args: Vec<Value>,
    pub result: Value,
}

/// Options that must hold a bound variable.
const VARIABLE_OPTIONS: &[&str] = &["variable", "textvariable", "listvariable"];

pub struct Widget {
    schema: Schema,
    name: Option<String>,
    parent: RefCell<Option<Weak<dyn Component>>>,
    children: RefCell<Vec<ComponentRef>>,
    options: RefCell<IndexMap<String, Setting>>,
    placement: RefCell<Placement>,
    min_size: Cell<Option<(f64, f64)>>,
    items: RefCell<Vec<Value>>,
    calls: RefCell<Vec<Call>>,
    events: Rc<EventHandlers>,
}

impl Widget {
    pub fn new(schema: Schema, parent: Option<&ComponentRef>, name: Option<&str>) -> Self {
        Self {
            schema,
            name: name.map(str::to_string),
            parent: RefCell::new(parent.map(Rc::downgrade)),
            children: RefCell::new(Vec::new()),
            options: RefCell::new(IndexMap::new()),
            placement: RefCell::new(Placement::None),
            min_size: Cell::new(None),
            items: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            events: Rc::new(EventHandlers::new()),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Extension-method calls in the order they happened.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn min_size(&self) -> Option<(f64, f64)> {
        self.min_size.get()
    }

    /// Entries added through `insert`.
    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    /// Bound variable of a Checkbutton/Radiobutton/Scale.
    pub fn variable(&self) -> Option<VariableCell> {
        self.setting("variable")
            .and_then(|setting| setting.as_variable().cloned())
    }

    /// True when the bound variable holds this widget's on/selected value.
    pub fn is_selected(&self) -> bool {
        let Some(cell) = self.variable() else {
            return false;
        };
        let target = match self.schema.activation {
            Activation::Select => self.select_value(&cell),
            _ => Some(self.on_value(&cell)),
        };
        target.is_some_and(|value| cell.get() == value)
    }

    fn setting(&self, key: &str) -> Option<Setting> {
        self.options.borrow().get(key).cloned()
    }

    fn option_value(&self, key: &str) -> Option<Value> {
        self.setting(key).and_then(|s| s.as_value().cloned())
    }

    fn on_value(&self, cell: &VariableCell) -> VarValue {
        self.option_value("onvalue")
            .and_then(|v| cell.var_type().coerce(&v))
            .unwrap_or_else(|| match cell.var_type() {
                VarType::Boolean => VarValue::Bool(true),
                VarType::Integer => VarValue::Int(1),
                VarType::Double => VarValue::Double(1.0),
                VarType::String => VarValue::Str("1".into()),
            })
    }

    fn off_value(&self, cell: &VariableCell) -> VarValue {
        self.option_value("offvalue")
            .and_then(|v| cell.var_type().coerce(&v))
            .unwrap_or_else(|| cell.var_type().zero())
    }

    fn select_value(&self, cell: &VariableCell) -> Option<VarValue> {
        self.option_value("value")
            .and_then(|v| cell.var_type().coerce(&v))
    }

    fn write(&self, cell: &VariableCell, value: VarValue) -> Result<(), ToolkitError> {
        cell.set(value).map_err(|e| ToolkitError::BadValue {
            key: "variable".into(),
            message: e.to_string(),
        })
    }

    fn select(&self) -> Result<(), ToolkitError> {
        let Some(cell) = self.variable() else {
            return Ok(());
        };
        let value = match self.schema.activation {
            Activation::Select => match self.select_value(&cell) {
                Some(value) => value,
                None => return Ok(()),
            },
            _ => self.on_value(&cell),
        };
        self.write(&cell, value)
    }

    fn deselect(&self) -> Result<(), ToolkitError> {
        match self.variable() {
            Some(cell) => {
                let off = self.off_value(&cell);
                self.write(&cell, off)
            }
            None => Ok(()),
        }
    }

    fn toggle(&self) -> Result<(), ToolkitError> {
        let Some(cell) = self.variable() else {
            return Ok(());
        };
        if cell.get() == self.on_value(&cell) {
            let off = self.off_value(&cell);
            self.write(&cell, off)
        } else {
            let on = self.on_value(&cell);
            self.write(&cell, on)
        }
    }

    fn insert(&self, index: &Value, value: &Value) -> Result<(), ToolkitError> {
        let mut items = self.items.borrow_mut();
        let position = match index {
            Value::String(s) if s == "end" => items.len(),
            Value::Number(n) => n
                .as_u64()
                .map(|i| (i as usize).min(items.len()))
                .ok_or_else(|| bad_index(index))?,
            Value::String(s) => s
                .parse::<usize>()
                .map(|i| i.min(items.len()))
                .map_err(|_| bad_index(index))?,
            _ => return Err(bad_index(index)),
        };
        items.insert(position, value.clone());
        Ok(())
    }

    fn delete(&self, first: &Value, last: &Value) -> Result<(), ToolkitError> {
        let mut items = self.items.borrow_mut();
        let resolve = |index: &Value| -> Result<usize, ToolkitError> {
            match index {
                Value::String(s) if s == "end" => Ok(items.len()),
                Value::Number(n) => n.as_u64().map(|i| i as usize).ok_or_else(|| bad_index(index)),
                Value::String(s) => s.parse::<usize>().map_err(|_| bad_index(index)),
                _ => Err(bad_index(index)),
            }
        };
        let start = resolve(first)?.min(items.len());
        let end = resolve(last)?.saturating_add(1).min(items.len());
        if start < end {
            items.drain(start..end);
        }
        Ok(())
    }
}

fn bad_index(index: &Value) -> ToolkitError {
    ToolkitError::BadValue {
        key: "index".into(),
        message: format!("{index} is not a valid index"),
    }
}

fn two_numbers(method: &str, args: &[Value]) -> Result<(f64, f64), ToolkitError> {
    match (args[0].as_f64(), args[1].as_f64()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ToolkitError::BadValue {
            key: method.to_string(),
            message: "expected two numbers".into(),
        }),
    }
}

impl Component for Widget {
    fn type_name(&self) -> &str {
        self.schema.type_name
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn configurable_keys(&self) -> Vec<String> {
        self.schema.option_names()
    }

    fn is_configurable(&self, key: &str) -> bool {
        self.schema.has_option(key)
    }

    fn configure(&self, key: &str, setting: Setting) -> Result<(), ToolkitError> {
        if !self.schema.has_option(key) {
            return Err(ToolkitError::UnknownOption(key.to_string()));
        }
        let valid = match key {
            "command" => matches!(setting, Setting::Command(_)),
            k if VARIABLE_OPTIONS.contains(&k) => matches!(setting, Setting::Variable(_)),
            _ => !matches!(setting, Setting::Command(_) | Setting::Variable(_)),
        };
        if !valid {
            return Err(ToolkitError::BadValue {
                key: key.to_string(),
                message: format!("unsupported setting {setting:?}"),
            });
        }
        self.options.borrow_mut().insert(key.to_string(), setting);
        Ok(())
    }

    fn cget(&self, key: &str) -> Option<Setting> {
        self.setting(key)
    }

    fn method_arity(&self, method: &str) -> Option<usize> {
        self.schema.arity(method)
    }

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, ToolkitError> {
        let Some(arity) = self.schema.arity(method) else {
            return Err(ToolkitError::UnknownMethod(method.to_string()));
        };
        if args.len() != arity {
            return Err(ToolkitError::Arity {
                method: method.to_string(),
                expected: arity,
                got: args.len(),
            });
        }

        let result = match method {
            "cget" => {
                let key = args[0].as_str().ok_or_else(|| ToolkitError::BadValue {
                    key: "cget".into(),
                    message: "option name must be a string".into(),
                })?;
                self.cget(key).map(|s| s.to_value()).unwrap_or(Value::Null)
            }
            "title" | "geometry" | "iconname" => {
                self.options
                    .borrow_mut()
                    .insert(method.to_string(), Setting::Value(args[0].clone()));
                Value::Null
            }
            "minsize" => {
                let (width, height) = two_numbers(method, args)?;
                self.set_min_size(width, height)?;
                Value::Null
            }
            "insert" => {
                self.insert(&args[0], &args[1])?;
                Value::Null
            }
            "delete" => {
                self.delete(&args[0], &args[1])?;
                Value::Null
            }
            "select" => {
                self.select()?;
                Value::Null
            }
            "deselect" => {
                self.deselect()?;
                Value::Null
            }
            "toggle" => {
                self.toggle()?;
                Value::Null
            }
            "set" => {
                if let Some(cell) = self.variable() {
                    cell.set_value(&args[0]).map_err(|e| ToolkitError::BadValue {
                        key: "set".into(),
                        message: e.to_string(),
                    })?;
                }
                Value::Null
            }
            _ => Value::Null,
        };

        self.calls.borrow_mut().push(Call {
            method: method.to_string(),
            args: args.to_vec(),
            result: result.clone(),
        });
        Ok(result)
    }

    fn attach(&self, child: ComponentRef) {
        self.children.borrow_mut().push(child);
    }

    fn detach(&self, child: &ComponentRef) {
        self.children
            .borrow_mut()
            .retain(|existing| !same_component(existing, child));
    }

    fn children(&self) -> Vec<ComponentRef> {
        self.children.borrow().clone()
    }

    fn parent(&self) -> Option<ComponentRef> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }

    fn place(&self, placement: Placement) -> Result<(), ToolkitError> {
        *self.placement.borrow_mut() = placement;
        Ok(())
    }

    fn placement(&self) -> Placement {
        self.placement.borrow().clone()
    }

    fn set_min_size(&self, width: f64, height: f64) -> Result<(), ToolkitError> {
        if width < 0.0 || height < 0.0 {
            return Err(ToolkitError::BadValue {
                key: "minsize".into(),
                message: format!("negative size {width}x{height}"),
            });
        }
        self.min_size.set(Some((width, height)));
        Ok(())
    }

    fn generate_event(&self, event: &str) -> usize {
        self.events.emit(event)
    }

    fn bind(&self, event: &str, handler: EventHandler) -> Cleanup {
        let id = self.events.on(event, handler);
        let events = self.events.clone();
        Box::new(move || {
            events.off(id);
        })
    }

    fn activate(&self) -> Result<()> {
        let changed = match self.schema.activation {
            Activation::Toggle => self.toggle(),
            Activation::Select => self.select(),
            Activation::Command => Ok(()),
        };
        changed.map_err(|e| Error::command(self.schema.type_name, e.to_string()))?;

        // Clone the callback out: it may reconfigure this widget.
        let command = self
            .setting("command")
            .and_then(|s| s.as_command().cloned());
        match command {
            Some(command) => command(),
            None => Ok(()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
