//! Sira Common - Shared types for the Sira instrument-tracking dashboard
//!
//! Wire data model for the tracking backend plus client configuration.
//! The backend speaks Spanish field names; this crate maps them onto
//! English identifiers once, so the rest of the workspace never sees them.

pub mod config;
pub mod types;

pub use config::DashboardConfig;
pub use types::*;
