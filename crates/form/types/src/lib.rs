//! Form Domain Types
//!
//! Forms in the trade portals are described by two JSON documents that
//! travel together: a **JSON Schema** (what data is collected and which
//! constraints apply) and a **UI Schema** (how the fields are arranged).
//! This crate gives both documents closed, typed representations so a
//! malformed form is rejected when it is loaded, not when it is rendered.
//!
//! # Key Concepts
//!
//! - **JsonSchema / SchemaProperty**: the supported JSON Schema subset
//!   (object/string/number/integer/boolean/array, `enum`, `oneOf`,
//!   `required`, `format`, numeric bounds).
//! - **UiSchemaElement**: the layout tree (`Control`, `Label`, vertical,
//!   horizontal, group and categorization layouts, `Category`).
//! - **FieldPath**: the data path a control scope points at.
//! - **FormValue**: the value tree held by a form, including in-memory
//!   file references that are replaced by storage keys on submit.

#![deny(unsafe_code)]

mod errors;
mod path;
mod schema;
mod ui_schema;
mod value;

pub use errors::*;
pub use path::*;
pub use schema::*;
pub use ui_schema::*;
pub use value::*;
