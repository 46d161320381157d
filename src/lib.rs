//! # spark-tree
//!
//! Declarative component trees for Rust.
//!
//! A YAML or JSON document describes component types, their properties,
//! nested children and a handful of structural directives. The builder turns
//! it into a live tree through a [`Toolkit`](primitives::Toolkit), binding
//! reactive variables (backed by
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals)) and command
//! callbacks to the branch owner each node was declared in.
//!
//! ## Architecture
//!
//! ```text
//! Document → Builder ─┬─ primitive type → Toolkit::instantiate → Directive Dispatcher
//!                     └─ branch type    → Grafting (new owner, own document, on_built hook)
//! ```
//!
//! Grafting is also available after construction, from any bound command,
//! so applications can add whole subtrees at runtime.
//!
//! ## Modules
//!
//! - [`types`] - Document values, variable types, placement and font descriptors
//! - [`document`] - Loading documents, node paths
//! - [`state`] - Reactive variables, per-owner pools, named events
//! - [`primitives`] - Toolkit contract and the in-memory reference toolkit
//! - [`engine`] - Registries, owner scope, branch owners
//! - [`builder`] - Tree builder, directive dispatch, grafting

pub mod builder;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use builder::{build, Application, BranchContext, Builder, WeakBuilder};

pub use config::{BuilderConfig, DuplicateIds};

pub use document::{DocumentLoader, FileLoader, MemoryLoader, NodePath};

pub use engine::{method, Branch, BranchType, HookArgs, Method, Owner, OwnerRef, Plain};

pub use error::{Error, ErrorKind, Result};

pub use primitives::{
    as_widget, Command, Component, ComponentRef, MemoryToolkit, Setting, Toolkit, ToolkitError,
    Widget,
};

pub use state::{virtual_event, VarSpec, VariableCell, VariablePool, SUBTREE_ADDED};
