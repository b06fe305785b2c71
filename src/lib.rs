//! Terminal client for a public health question-answering service.
//!
//! The backend answers questions over `POST /api/health/query` and reports
//! usage counters over `GET /api/health/stats`.  This crate owns the client
//! side only: the conversation, the pending-request guard and rendering.

// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod render;
pub mod types;
pub mod utils;

mod observability;

// Re-exports
pub use client::{Backend, HealthClient};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
