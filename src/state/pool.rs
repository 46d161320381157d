//! Variable Pool - Named cells scoped to one branch owner.
//!
//! Resolution is idempotent per pool: the first declaration of a name creates
//! the cell, every later declaration (from any component inside the same
//! owner) returns that same cell and ignores its own type/default. This is
//! what lets a group of radio buttons share one value.

use std::cell::RefCell;

use indexmap::IndexMap;

use super::variable::{VarSpec, VariableCell};
use crate::document::NodePath;
use crate::error::{Error, Result};
use crate::types::VarType;

#[derive(Debug, Default)]
pub struct VariablePool {
    cells: RefCell<IndexMap<String, VariableCell>>,
}

impl VariablePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a declaration, creating the cell on first reference.
    pub fn resolve(&self, spec: &VarSpec, path: &NodePath) -> Result<VariableCell> {
        if let Some(cell) = self.get(&spec.name) {
            return Ok(cell);
        }

        let Some(type_name) = spec.var_type.as_deref() else {
            return Err(Error::definition(
                path,
                format!("variable '{}' is not declared yet and has no type", spec.name),
            ));
        };
        let var_type = VarType::parse(type_name).ok_or_else(|| {
            Error::type_error(path, format!("unexpected variable type: {type_name}"))
        })?;
        let initial = match &spec.default {
            Some(default) => var_type.coerce(default).ok_or_else(|| {
                Error::type_error(
                    path,
                    format!("default {default} does not fit {var_type} variable '{}'", spec.name),
                )
            })?,
            None => var_type.zero(),
        };

        log::trace!("{path}: new {var_type} variable '{}' = {initial}", spec.name);
        let cell = VariableCell::new(spec.name.as_str(), var_type, initial);
        self.cells
            .borrow_mut()
            .insert(spec.name.clone(), cell.clone());
        Ok(cell)
    }

    pub fn get(&self, name: &str) -> Option<VariableCell> {
        self.cells.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cells.borrow().contains_key(name)
    }

    /// Names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.cells.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.cells.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VarValue;
    use serde_json::json;

    fn path() -> NodePath {
        NodePath::root().node("Test")
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let pool = VariablePool::new();
        let a = pool.resolve(&VarSpec::typed("x", "boolean"), &path()).unwrap();
        let b = pool.resolve(&VarSpec::typed("x", "boolean"), &path()).unwrap();
        assert!(a.same(&b));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_later_declaration_does_not_overwrite() {
        let pool = VariablePool::new();
        let first = pool
            .resolve(&VarSpec::typed("drink", "string").with_default(json!("tea")), &path())
            .unwrap();
        let second = pool
            .resolve(&VarSpec::typed("drink", "integer").with_default(json!(3)), &path())
            .unwrap();
        assert!(first.same(&second));
        assert_eq!(second.get(), VarValue::Str("tea".into()));
    }

    #[test]
    fn test_separate_pools_are_separate() {
        let a = VariablePool::new();
        let b = VariablePool::new();
        let x1 = a.resolve(&VarSpec::typed("x", "int"), &path()).unwrap();
        let x2 = b.resolve(&VarSpec::typed("x", "int"), &path()).unwrap();
        assert!(!x1.same(&x2));
    }

    #[test]
    fn test_zero_values() {
        let pool = VariablePool::new();
        let cases = [
            ("b", "boolean", VarValue::Bool(false)),
            ("i", "integer", VarValue::Int(0)),
            ("d", "double", VarValue::Double(0.0)),
            ("s", "string", VarValue::Str(String::new())),
        ];
        for (name, ty, zero) in cases {
            let cell = pool.resolve(&VarSpec::typed(name, ty), &path()).unwrap();
            assert_eq!(cell.get(), zero);
        }
        assert_eq!(pool.names(), ["b", "i", "d", "s"]);
    }

    #[test]
    fn test_unknown_type_is_type_error() {
        let pool = VariablePool::new();
        let err = pool.resolve(&VarSpec::typed("x", "complex"), &path()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Type);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_missing_type_is_definition_error() {
        let pool = VariablePool::new();
        let err = pool.resolve(&VarSpec::named("x"), &path()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Definition);

        pool.resolve(&VarSpec::typed("x", "string"), &path()).unwrap();
        assert!(pool.resolve(&VarSpec::named("x"), &path()).is_ok());
    }

    #[test]
    fn test_bad_default_is_type_error() {
        let pool = VariablePool::new();
        let spec = VarSpec::typed("n", "integer").with_default(json!("many"));
        let err = pool.resolve(&spec, &path()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Type);
    }
}
