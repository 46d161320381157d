//! Core types for spark-tree.
//!
//! These types flow between the document, the builder and the toolkit:
//! document values, typed variable values, and placement/font descriptors
//! produced by the layout directives.

use std::fmt;

pub use serde_json::{Map, Value};

/// A node body: attribute name → value, in document order.
pub type Body = Map<String, Value>;

// =============================================================================
// Variable Types
// =============================================================================

/// The fixed set of reactive variable types a document may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Boolean,
    Integer,
    Double,
    String,
}

impl VarType {
    /// Parse a document type name. Accepts the short aliases used by older
    /// documents (`bool`, `int`, `float`, `str`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "boolean" | "bool" => Some(Self::Boolean),
            "integer" | "int" => Some(Self::Integer),
            "double" | "float" => Some(Self::Double),
            "string" | "str" => Some(Self::String),
            _ => None,
        }
    }

    /// Value a new cell holds when no default is declared.
    pub fn zero(self) -> VarValue {
        match self {
            Self::Boolean => VarValue::Bool(false),
            Self::Integer => VarValue::Int(0),
            Self::Double => VarValue::Double(0.0),
            Self::String => VarValue::Str(String::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::String => "string",
        }
    }

    /// Coerce a document value into this type.
    ///
    /// Integers widen to doubles, scalars stringify for string cells.
    /// Returns `None` when no sensible conversion exists.
    pub fn coerce(self, value: &Value) -> Option<VarValue> {
        match (self, value) {
            (_, Value::Null) => Some(self.zero()),
            (Self::Boolean, Value::Bool(b)) => Some(VarValue::Bool(*b)),
            (Self::Boolean, Value::Number(n)) => n.as_i64().map(|i| VarValue::Bool(i != 0)),
            (Self::Integer, Value::Number(n)) => n.as_i64().map(VarValue::Int),
            (Self::Integer, Value::Bool(b)) => Some(VarValue::Int(*b as i64)),
            (Self::Double, Value::Number(n)) => n.as_f64().map(VarValue::Double),
            (Self::String, Value::String(s)) => Some(VarValue::Str(s.clone())),
            (Self::String, Value::Number(n)) => Some(VarValue::Str(n.to_string())),
            (Self::String, Value::Bool(b)) => Some(VarValue::Str(b.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of a reactive variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
}

impl VarValue {
    pub fn var_type(&self) -> VarType {
        match self {
            Self::Bool(_) => VarType::Boolean,
            Self::Int(_) => VarType::Integer,
            Self::Double(_) => VarType::Double,
            Self::Str(_) => VarType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Convert back into a document value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Double(d) => Value::from(*d),
            Self::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for VarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for VarValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for VarValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

// =============================================================================
// Placement
// =============================================================================

bitflags::bitflags! {
    /// Fill axes for pack placement.
    ///
    /// `Fill::X | Fill::Y` is the document's `both`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Fill: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const BOTH = Self::X.bits() | Self::Y.bits();
    }
}

impl Fill {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "both" => Some(Self::BOTH),
            "none" => Some(Self::empty()),
            _ => None,
        }
    }
}

/// Side of the parent a packed component sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "top" => Some(Self::Top),
            // "down" is what early documents used for the bottom edge
            "bottom" | "down" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// One placement call handed to the toolkit.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Placement {
    /// Not placed yet.
    #[default]
    None,
    /// Pack placement. All fields empty means "pack with defaults".
    Pack {
        fill: Option<Fill>,
        side: Option<Side>,
        options: Body,
    },
    /// Grid placement.
    Grid {
        row: Option<i64>,
        column: Option<i64>,
        options: Body,
    },
    /// Grid placement with a scalar the builder does not interpret.
    /// The toolkit decides what it means.
    GridRaw(Value),
}

impl Placement {
    /// Pack with no arguments.
    pub fn pack() -> Self {
        Self::Pack {
            fill: None,
            side: None,
            options: Body::new(),
        }
    }

    pub fn fill(fill: Fill) -> Self {
        Self::Pack {
            fill: Some(fill),
            side: None,
            options: Body::new(),
        }
    }

    pub fn side(side: Side) -> Self {
        Self::Pack {
            fill: None,
            side: Some(side),
            options: Body::new(),
        }
    }

    pub fn cell(row: i64, column: i64) -> Self {
        Self::Grid {
            row: Some(row),
            column: Some(column),
            options: Body::new(),
        }
    }

    pub fn is_placed(&self) -> bool {
        !matches!(self, Self::None)
    }
}

// =============================================================================
// Font
// =============================================================================

/// Font descriptor. `family: None` lets the toolkit keep its default family.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Font {
    pub family: Option<String>,
    pub size: i64,
}

impl Font {
    pub fn sized(size: i64) -> Self {
        Self { family: None, size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_var_type_aliases() {
        assert_eq!(VarType::parse("boolean"), Some(VarType::Boolean));
        assert_eq!(VarType::parse("int"), Some(VarType::Integer));
        assert_eq!(VarType::parse("double"), Some(VarType::Double));
        assert_eq!(VarType::parse("str"), Some(VarType::String));
        assert_eq!(VarType::parse("list"), None);
    }

    #[test]
    fn test_coerce_defaults() {
        assert_eq!(VarType::Double.coerce(&json!(3)), Some(VarValue::Double(3.0)));
        assert_eq!(VarType::String.coerce(&json!(7)), Some(VarValue::Str("7".into())));
        assert_eq!(VarType::Boolean.coerce(&Value::Null), Some(VarValue::Bool(false)));
        assert_eq!(VarType::Integer.coerce(&json!("seven")), None);
        assert_eq!(VarType::Integer.coerce(&json!(1.5)), None);
    }

    #[test]
    fn test_fill_both_is_x_and_y() {
        assert_eq!(Fill::parse("both"), Some(Fill::X | Fill::Y));
        assert_eq!(Fill::parse("none"), Some(Fill::empty()));
        assert!(Fill::parse("left").is_none());
    }

    #[test]
    fn test_side_accepts_legacy_down() {
        assert_eq!(Side::parse("down"), Some(Side::Bottom));
        assert_eq!(Side::parse("bottom"), Some(Side::Bottom));
        assert_eq!(Side::parse("x"), None);
    }
}
