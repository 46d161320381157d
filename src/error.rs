//! Build errors.
//!
//! Every error raised while materializing a document carries the node path
//! where it happened, so a failing directive can be found in the source file.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Broad error category, stable for callers that match on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unresolvable type name, branch type, or a missing required parameter.
    Definition,
    /// Command/method name not found on the current owner.
    Binding,
    /// Wrong value shape for a directive or variable.
    Type,
    /// Key is neither a configurable property nor a method.
    Attribute,
    /// Document could not be read or parsed.
    Load,
    /// A bound command handler failed at runtime.
    Command,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Definition => "definition",
            Self::Binding => "binding",
            Self::Type => "type",
            Self::Attribute => "attribute",
            Self::Load => "load",
            Self::Command => "command",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("definition error at {path}: {message}")]
    Definition { path: String, message: String },

    #[error("binding error at {path}: owner '{owner}' has no method '{method}'")]
    Binding {
        path: String,
        owner: String,
        method: String,
    },

    #[error("type error at {path}: {message}")]
    Type { path: String, message: String },

    #[error("attribute error at {path}: '{component}' has no property or method '{key}'")]
    Attribute {
        path: String,
        component: String,
        key: String,
    },

    #[error("failed to read document '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse document '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("command '{command}' failed: {message}")]
    Command { command: String, message: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Definition { .. } => ErrorKind::Definition,
            Self::Binding { .. } => ErrorKind::Binding,
            Self::Type { .. } => ErrorKind::Type,
            Self::Attribute { .. } => ErrorKind::Attribute,
            Self::Io { .. } | Self::Parse { .. } => ErrorKind::Load,
            Self::Command { .. } => ErrorKind::Command,
        }
    }

    pub(crate) fn definition(path: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::Definition {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn type_error(path: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::Type {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Error for application command handlers that fail at runtime.
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}
