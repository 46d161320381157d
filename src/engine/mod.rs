//! Engine - Registries, owner scope and branch owners.
//!
//! The engine holds the state one builder session shares across its
//! recursive calls:
//! - Registry: `id` → component lookup (journalled), branch-type table, owners
//! - Scope: the current-owner stack with guaranteed pop on every exit path
//! - Owner: a branch instance, the scoping unit for variables and commands
//!
//! # Scoping
//!
//! ```text
//! Root (owner)            variables/commands resolve against Root
//! ├── Frame
//! │   └── TitleFrame (owner)  ... against TitleFrame
//! │       └── Button
//! └── Checkbutton         ... against Root again
//! ```

mod owner;
mod registry;
mod scope;

pub use owner::*;
pub use registry::*;
pub use scope::*;
