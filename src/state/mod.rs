//! State Module - Reactive values and notifications
//!
//! This module contains the runtime state a built tree exposes to
//! application code:
//!
//! - **Variables** - Typed reactive cells (boolean/integer/double/string)
//! - **Pool** - Per-owner store of named cells, created on first reference
//! - **Events** - Named notification handlers (virtual events)

mod events;
mod pool;
mod variable;

pub use events::*;
pub use pool::*;
pub use variable::*;
