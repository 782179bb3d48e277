//! Schema-Driven Form Engine
//!
//! The engine turns a JSON Schema + UI Schema pair into a working form:
//! it resolves the controls, owns the form state, validates values,
//! maps each control to a concrete widget and runs the submit pipeline.
//!
//! # Architecture
//!
//! - [`resolve`] flattens the UI schema into [`ResolvedControl`]s in
//!   document order
//! - [`FormDefinition`] is a validated schema/UI-schema pair with its
//!   resolved controls
//! - [`FormEngine`] owns `values`, `touched` and `errors`, and drives
//!   validate → upload files → submit
//! - [`dispatch`] picks a [`WidgetKind`] for a control by fixed precedence
//! - [`Widget`] and [`FileField`] translate input events into
//!   [`FieldCommand`]s the engine applies
//! - [`FormView`] renders the layout tree for the current state
//! - [`SampleData`] provides demo auto-fill values
//!
//! # Example
//!
//! ```rust
//! use form_engine::{FormDefinition, FormEngine, SubmitHandler, SubmitError, SubmitOutcome};
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! struct Accept;
//!
//! #[async_trait::async_trait]
//! impl SubmitHandler for Accept {
//!     async fn submit(&self, _values: Value) -> Result<(), SubmitError> {
//!         Ok(())
//!     }
//! }
//!
//! let definition = FormDefinition::from_json(
//!     json!({
//!         "type": "object",
//!         "required": ["decision"],
//!         "properties": {"decision": {"type": "string", "enum": ["APPROVED", "REJECTED"]}}
//!     }),
//!     json!({}),
//! )
//! .unwrap();
//!
//! let engine = FormEngine::new(definition, Arc::new(Accept));
//! engine.set_value("decision", "APPROVED").unwrap();
//! let outcome = futures::executor::block_on(engine.handle_submit());
//! assert!(matches!(outcome, SubmitOutcome::Submitted));
//! ```

#![deny(unsafe_code)]

pub mod definition;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod file_field;
pub mod handlers;
pub mod resolver;
pub mod sample_data;
pub mod state;
pub mod transform;
pub mod validation;
pub mod view;
pub mod widgets;

// Re-export main types
pub use definition::FormDefinition;
pub use dispatch::{dispatch, SelectOption, Step, TextMode, WidgetKind, DISPATCH_RULES};
pub use engine::{FormEngine, SubmitOutcome};
pub use errors::SubmitError;
pub use file_field::{check_file, FileField, FilePreview, FileRejection};
pub use handlers::{FileUploader, NoUploader, SubmitHandler, UploadedFile};
pub use resolver::{humanize_label, resolve, CategoryRef, ResolvedControl};
pub use sample_data::{SampleData, SampleSet};
pub use state::FormState;
pub use transform::replace_files_with_keys;
pub use validation::{validate_control, validate_controls, FieldErrors};
pub use view::{FormView, ViewNode};
pub use widgets::{FieldCommand, FieldProps, Widget, WidgetEvent, WidgetView};

pub use form_types::*;
