//! Primitives - The component library contract and a reference toolkit.
//!
//! The builder never touches a concrete widget type. It talks to a
//! [`Toolkit`] (instantiate by type name) and to [`Component`] handles
//! (configure, place, attach, invoke extension methods, raise events).
//!
//! [`MemoryToolkit`] is a complete in-memory implementation driven by a
//! schema table. It records everything the builder does to each widget, which
//! makes it the toolkit of choice for tests and headless runs:
//!
//! ```ignore
//! let toolkit = Rc::new(MemoryToolkit::new());
//! let label = toolkit.instantiate("Label", None, None).unwrap();
//! label.configure("text", Setting::Value("Hello".into()))?;
//! ```

mod schema;
mod toolkit;
mod types;
mod widget;

pub use schema::*;
pub use toolkit::*;
pub use types::*;
pub use widget::*;
