//! Variables - Typed reactive cells.
//!
//! A [`VariableCell`] is what a `variable:`/`text_variable:` directive binds to
//! a component. The value lives in a spark-signals `Signal`, so application
//! code can derive from it or run effects on it. Write listeners
//! ([`VariableCell::trace`]) fire after every successful `set`, which is how
//! widgets bound to the same cell observe each other.
//!
//! # Example
//!
//! ```ignore
//! let flag = VariableCell::new("flag", VarType::Boolean, false.into());
//! let cleanup = flag.trace(|value| println!("flag is now {value}"));
//! flag.set(true)?;
//! cleanup();
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use spark_signals::{signal, Signal};

use crate::document::NodePath;
use crate::error::{Error, Result};
use crate::types::{Value, VarType, VarValue};

/// Write listener. Receives the new value.
pub type TraceFn = Rc<dyn Fn(&VarValue)>;

struct CellInner {
    name: String,
    var_type: VarType,
    value: Signal<VarValue>,
    traces: RefCell<Vec<(usize, TraceFn)>>,
    next_trace: Cell<usize>,
}

/// Shared handle to one reactive variable. Clones share the same cell.
#[derive(Clone)]
pub struct VariableCell {
    inner: Rc<CellInner>,
}

impl VariableCell {
    /// Create a cell. `initial` must already have the cell's type.
    pub fn new(name: impl Into<String>, var_type: VarType, initial: VarValue) -> Self {
        Self {
            inner: Rc::new(CellInner {
                name: name.into(),
                var_type,
                value: signal(initial),
                traces: RefCell::new(Vec::new()),
                next_trace: Cell::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn var_type(&self) -> VarType {
        self.inner.var_type
    }

    /// Current value (tracked when read inside an effect).
    pub fn get(&self) -> VarValue {
        self.inner.value.get()
    }

    pub fn get_bool(&self) -> Option<bool> {
        self.get().as_bool()
    }

    pub fn get_int(&self) -> Option<i64> {
        self.get().as_int()
    }

    pub fn get_double(&self) -> Option<f64> {
        self.get().as_double()
    }

    pub fn get_string(&self) -> String {
        self.get().to_string()
    }

    /// The underlying signal, for effects and deriveds.
    pub fn signal(&self) -> Signal<VarValue> {
        self.inner.value.clone()
    }

    /// Write a new value. Integers widen into double cells; any other type
    /// mismatch is a type error and leaves the cell untouched.
    pub fn set(&self, value: impl Into<VarValue>) -> Result<()> {
        let value = match (self.inner.var_type, value.into()) {
            (VarType::Double, VarValue::Int(i)) => VarValue::Double(i as f64),
            (expected, value) if value.var_type() != expected => {
                return Err(Error::type_error(
                    format!("variable '{}'", self.inner.name),
                    format!("cannot store a {} in a {expected} variable", value.var_type()),
                ));
            }
            (_, value) => value,
        };
        self.inner.value.set(value.clone());
        self.notify(&value);
        Ok(())
    }

    /// Write a document value, coercing it to the cell's type.
    pub fn set_value(&self, value: &Value) -> Result<()> {
        let coerced = self.inner.var_type.coerce(value).ok_or_else(|| {
            Error::type_error(
                format!("variable '{}'", self.inner.name),
                format!("{value} is not a valid {}", self.inner.var_type),
            )
        })?;
        self.set(coerced)
    }

    /// Register a write listener. Returns a cleanup function.
    pub fn trace<F>(&self, listener: F) -> impl FnOnce() + use<F>
    where
        F: Fn(&VarValue) + 'static,
    {
        let id = self.inner.next_trace.get();
        self.inner.next_trace.set(id + 1);
        self.inner.traces.borrow_mut().push((id, Rc::new(listener)));

        let inner = Rc::downgrade(&self.inner);
        move || {
            if let Some(inner) = inner.upgrade() {
                inner.traces.borrow_mut().retain(|(trace_id, _)| *trace_id != id);
            }
        }
    }

    /// Number of registered write listeners.
    pub fn trace_count(&self) -> usize {
        self.inner.traces.borrow().len()
    }

    /// True when both handles point at the same cell.
    pub fn same(&self, other: &VariableCell) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, value: &VarValue) {
        // Listeners may set other cells or add traces; don't hold the borrow.
        let listeners: Vec<TraceFn> = self
            .inner
            .traces
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(value);
        }
    }
}

impl fmt::Debug for VariableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableCell")
            .field("name", &self.inner.name)
            .field("type", &self.inner.var_type)
            .field("value", &self.get())
            .finish()
    }
}

// =============================================================================
// Variable Spec
// =============================================================================

/// The `{name, type, default?}` mapping of a variable directive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VarSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub var_type: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
}

impl VarSpec {
    /// A spec that only references a variable by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: None,
            default: None,
        }
    }

    pub fn typed(name: impl Into<String>, var_type: &str) -> Self {
        Self {
            name: name.into(),
            var_type: Some(var_type.to_string()),
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Read a directive value. A bare string is shorthand for `{name: ...}`.
    pub fn from_value(value: &Value, path: &NodePath) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::named(name.as_str())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map_err(|e| Error::definition(path, format!("invalid variable declaration: {e}"))),
            other => Err(Error::type_error(
                path,
                format!(
                    "variable declaration must be a mapping or a name, found {}",
                    crate::document::describe(other)
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spark_signals::effect;

    #[test]
    fn test_get_set() {
        let cell = VariableCell::new("count", VarType::Integer, VarValue::Int(1));
        assert_eq!(cell.get_int(), Some(1));
        cell.set(5i64).unwrap();
        assert_eq!(cell.get(), VarValue::Int(5));
    }

    #[test]
    fn test_set_rejects_wrong_type() {
        let cell = VariableCell::new("flag", VarType::Boolean, VarValue::Bool(false));
        let err = cell.set("yes").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Type);
        assert_eq!(cell.get_bool(), Some(false));
    }

    #[test]
    fn test_int_widens_into_double() {
        let cell = VariableCell::new("ratio", VarType::Double, VarValue::Double(0.5));
        cell.set(2i64).unwrap();
        assert_eq!(cell.get_double(), Some(2.0));
    }

    #[test]
    fn test_set_value_coerces() {
        let cell = VariableCell::new("label", VarType::String, VarValue::Str(String::new()));
        cell.set_value(&json!(42)).unwrap();
        assert_eq!(cell.get_string(), "42");
    }

    #[test]
    fn test_trace_fires_on_write_only() {
        let cell = VariableCell::new("flag", VarType::Boolean, VarValue::Bool(false));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let cleanup = cell.trace(move |value| seen_clone.borrow_mut().push(value.clone()));
        assert!(seen.borrow().is_empty());

        cell.set(true).unwrap();
        assert_eq!(*seen.borrow(), vec![VarValue::Bool(true)]);

        cleanup();
        cell.set(false).unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(cell.trace_count(), 0);
    }

    #[test]
    fn test_signal_drives_effects() {
        let cell = VariableCell::new("count", VarType::Integer, VarValue::Int(0));
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let sig = cell.signal();
        let _stop = effect(move || {
            let _ = sig.get();
            runs_clone.set(runs_clone.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        cell.set(3i64).unwrap();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_clones_share_the_cell() {
        let a = VariableCell::new("x", VarType::String, VarValue::Str("a".into()));
        let b = a.clone();
        b.set("b").unwrap();
        assert_eq!(a.get_string(), "b");
        assert!(a.same(&b));
    }

    #[test]
    fn test_spec_from_value() {
        let path = NodePath::root();
        let spec = VarSpec::from_value(&json!({ "name": "flag", "type": "boolean", "default": true }), &path).unwrap();
        assert_eq!(spec, VarSpec::typed("flag", "boolean").with_default(json!(true)));

        let short = VarSpec::from_value(&json!("flag"), &path).unwrap();
        assert_eq!(short, VarSpec::named("flag"));

        let err = VarSpec::from_value(&json!({ "type": "boolean" }), &path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Definition);

        let err = VarSpec::from_value(&json!(3), &path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Type);
    }
}
