//! Documents - Loading and reading the declarative tree description.
//!
//! A document is a hierarchical value. Every constructible node is a
//! single-entry mapping from a type name to a body:
//!
//! ```yaml
//! Root:
//!   title: Demo
//!   children:
//!     - Label: { text: Hello, pack: true }
//!     - Button: { text: Quit, app_command: on_quit, pack: left }
//! ```
//!
//! YAML and JSON sources both decode to [`Value`] with key order preserved,
//! which the dispatcher relies on to apply directives in document order.

mod loader;
mod path;

pub use loader::*;
pub use path::*;

use crate::error::{Error, Result};
use crate::types::{Body, Value};

/// Split a node into its type name and body.
///
/// The node must be a mapping with exactly one key. A `null` body is an
/// empty body; any other non-mapping body is a type error.
pub fn node_parts(node: &Value, path: &NodePath) -> Result<(String, Body)> {
    let Value::Object(map) = node else {
        return Err(Error::definition(
            path,
            format!("expected a single-entry mapping, found {}", describe(node)),
        ));
    };
    if map.len() != 1 {
        return Err(Error::definition(
            path,
            format!("node must have exactly one type name, found {} keys", map.len()),
        ));
    }
    let Some((type_name, body)) = map.iter().next() else {
        return Err(Error::definition(path, "empty node"));
    };
    Ok((type_name.clone(), body_of(body, &path.node(type_name))?))
}

/// Interpret a value as a node body.
pub fn body_of(value: &Value, path: &NodePath) -> Result<Body> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        Value::Null => Ok(Body::new()),
        other => Err(Error::type_error(
            path,
            format!("node body must be a mapping, found {}", describe(other)),
        )),
    }
}

/// Short human description of a value's shape, for error messages.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
