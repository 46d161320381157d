//! Node paths for error reporting.

use std::fmt;

/// Position of a node inside a document, e.g. `Root/children[1]/Frame`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath(String);

impl NodePath {
    /// Path of the document itself, before any node has been entered.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Enter a node of the given type.
    pub fn node(&self, type_name: &str) -> Self {
        if self.0.is_empty() {
            Self(type_name.to_string())
        } else {
            Self(format!("{}/{}", self.0, type_name))
        }
    }

    /// Enter the `index`-th element of a `children` sequence.
    pub fn child(&self, index: usize) -> Self {
        Self(format!("{}/children[{}]", self.0, index))
    }

    /// Point at one attribute of the current node.
    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}.{}", self.0, key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<document>")
        } else {
            f.write_str(&self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_path() {
        let path = NodePath::root().node("Root").child(1).node("Frame").child(0);
        assert_eq!(path.to_string(), "Root/children[1]/Frame/children[0]");
        assert_eq!(path.key("pack").to_string(), "Root/children[1]/Frame/children[0].pack");
    }

    #[test]
    fn test_empty_path_display() {
        assert_eq!(NodePath::root().to_string(), "<document>");
    }
}
