//! CLI command implementations

pub mod config;
pub mod consignments;
pub mod form;
pub mod hscodes;
pub mod layout;
pub mod review;
pub mod task;
