//! Portal Config - deployment instances and client settings
//!
//! An officer portal is deployed per agency ("instance"). Each instance
//! carries branding and the review forms its officers fill in. Instances
//! are selected explicitly by id:
//!
//! ```
//! let npqs = portal_config::load_instance("npqs").unwrap();
//! let form = npqs.review_form(None).unwrap();
//! assert_eq!(form.review_document_id, "moa:npqs:phytosanitary:002");
//! ```
//!
//! Every review form is resolved into a [`form_engine::FormDefinition`]
//! while loading, so a broken preset fails here rather than when a screen
//! renders it.
//!
//! [`PortalSettings`] holds client-side settings (API URL, trader id,
//! timeouts) read from a TOML file and `PORTAL_*` environment variables.

#![deny(unsafe_code)]

mod errors;
mod instance;
mod settings;

pub use errors::*;
pub use instance::*;
pub use settings::*;
