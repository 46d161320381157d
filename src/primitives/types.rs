//! Toolkit contract types.
//!
//! These traits are the seam between the builder and whatever component
//! library actually draws things.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::state::{EventHandler, VariableCell};
use crate::types::{Font, Placement, Value};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by subscriptions.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Primary activation callback (a button's `command`).
///
/// Rc so the component can clone it out before running it; the callback may
/// graft new branches and reconfigure the very component that fired it.
pub type Command = Rc<dyn Fn() -> Result<()>>;

/// Shared handle to a live component.
pub type ComponentRef = Rc<dyn Component>;

// =============================================================================
// Setting - Configuration value
// =============================================================================

/// A value assigned to a configurable option.
#[derive(Clone)]
pub enum Setting {
    /// Plain document value.
    Value(Value),
    /// Bound reactive variable (`variable`, `textvariable`, `listvariable`).
    Variable(VariableCell),
    /// Activation callback (`command`).
    Command(Command),
    /// Font descriptor (`font`).
    Font(Font),
}

impl Setting {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableCell> {
        match self {
            Self::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&Font> {
        match self {
            Self::Font(f) => Some(f),
            _ => None,
        }
    }

    /// Snapshot as a document value. Variables read their current value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Variable(cell) => cell.get().to_value(),
            Self::Command(_) => Value::String("<command>".into()),
            Self::Font(font) => serde_json::json!({ "family": font.family, "size": font.size }),
        }
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Variable(cell) => f.debug_tuple("Variable").field(cell).finish(),
            Self::Command(_) => f.write_str("Command(..)"),
            Self::Font(font) => f.debug_tuple("Font").field(font).finish(),
        }
    }
}

impl From<Value> for Setting {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<VariableCell> for Setting {
    fn from(cell: VariableCell) -> Self {
        Self::Variable(cell)
    }
}

impl From<Font> for Setting {
    fn from(font: Font) -> Self {
        Self::Font(font)
    }
}

// =============================================================================
// Toolkit Errors
// =============================================================================

/// Failures reported by a component. The builder maps them onto build
/// errors with the offending node's path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolkitError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("unknown method '{0}'")]
    UnknownMethod(String),
    #[error("bad value for '{key}': {message}")]
    BadValue { key: String, message: String },
    #[error("'{method}' expects {expected} argument(s), got {got}")]
    Arity {
        method: String,
        expected: usize,
        got: usize,
    },
}

// =============================================================================
// Contract
// =============================================================================

/// A live component.
///
/// All methods take `&self`; implementations use interior mutability, as the
/// tree is shared between the builder, registries and callbacks.
pub trait Component: Any {
    /// Toolkit type name (`Frame`, `Button`, ...).
    fn type_name(&self) -> &str;

    /// Toolkit-level name given at creation.
    fn name(&self) -> Option<String>;

    /// Options this component accepts through [`configure`](Self::configure).
    fn configurable_keys(&self) -> Vec<String>;

    fn is_configurable(&self, key: &str) -> bool {
        self.configurable_keys().iter().any(|k| k == key)
    }

    fn configure(&self, key: &str, setting: Setting) -> Result<(), ToolkitError>;

    /// Current value of an option, if set.
    fn cget(&self, key: &str) -> Option<Setting>;

    /// Number of positional arguments an extension method takes, or `None`
    /// when the component has no such method.
    fn method_arity(&self, method: &str) -> Option<usize>;

    /// Call an extension method.
    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, ToolkitError>;

    /// Attach `child` below this component.
    fn attach(&self, child: ComponentRef);

    /// Remove `child` from this component's children.
    fn detach(&self, child: &ComponentRef);

    fn children(&self) -> Vec<ComponentRef>;

    fn parent(&self) -> Option<ComponentRef>;

    /// Apply one placement call.
    fn place(&self, placement: Placement) -> Result<(), ToolkitError>;

    fn placement(&self) -> Placement;

    /// Minimum width/height constraint.
    fn set_min_size(&self, width: f64, height: f64) -> Result<(), ToolkitError>;

    /// Raise a named notification on this component.
    /// Returns how many handlers ran.
    fn generate_event(&self, event: &str) -> usize;

    /// Subscribe to a named notification.
    fn bind(&self, event: &str, handler: EventHandler) -> Cleanup;

    /// Run the primary activation (what a click does).
    fn activate(&self) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("type_name", &self.type_name())
            .field("name", &self.name())
            .field("children", &self.children().len())
            .finish()
    }
}

/// The component library: turns type names into components.
pub trait Toolkit {
    /// Create a component of `type_name`. `parent` is recorded as the parent
    /// link; the builder attaches the child afterwards. Returns `None` for
    /// type names the toolkit does not know.
    fn instantiate(
        &self,
        type_name: &str,
        parent: Option<&ComponentRef>,
        name: Option<&str>,
    ) -> Option<ComponentRef>;

    fn knows(&self, type_name: &str) -> bool;
}

/// Identity comparison for component handles.
pub fn same_component(a: &ComponentRef, b: &ComponentRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// True if `candidate` is `ancestor` or lies somewhere below it.
pub fn is_within(candidate: &ComponentRef, ancestor: &ComponentRef) -> bool {
    let mut current = Some(candidate.clone());
    while let Some(component) = current {
        if same_component(&component, ancestor) {
            return true;
        }
        current = component.parent();
    }
    false
}
