//! Workflow Graph Layout
//!
//! Consignment workflows are DAGs of steps linked by `dependsOn`. This
//! crate lays them out for display:
//!
//! - every step gets a depth: the length of the longest dependency chain
//!   leading to it
//! - steps are placed in columns by depth and centered vertically within
//!   their column
//! - every `(dependency, step)` pair becomes an edge whose state tells
//!   whether the dependency is completed
//!
//! Cyclic input is rejected with [`GraphError::CycleDetected`].

#![deny(unsafe_code)]

mod errors;
mod layout;
mod step;
mod view;

pub use errors::*;
pub use layout::*;
pub use step::*;
pub use view::*;
