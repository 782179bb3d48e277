//! Portal Client - adapters for the services behind the trade portals
//!
//! [`PortalClient`] wraps the consignment, HS code, workflow, task and OGA
//! review endpoints. The form engine's collaborators are implemented on
//! top of it:
//!
//! - [`HttpFileStore`]: uploads files during submission and resolves keys
//!   to preview URLs
//! - [`TaskSubmitHandler`]: submits a trader form as a task command
//! - [`ReviewSubmitHandler`] / [`ApprovalSubmitHandler`]: submit an
//!   officer's review
//!
//! Any call can be abandoned through [`cancellable`]; a cancelled call
//! yields [`ClientError::Cancelled`] and its response is dropped.

#![deny(unsafe_code)]

mod client;
mod errors;
mod handlers;
mod store;

pub use client::*;
pub use errors::*;
pub use handlers::*;
pub use store::*;

pub use tokio_util::sync::CancellationToken;
