//! Error handling.
//!
//! This module provides:
//! - Transport construction errors
//! - Per-request fetch errors, one variant per failure kind
//! - Categorization of engine errors
//!
//! Construction errors surface once, when a client is built. Fetch errors are
//! returned per request and never abort the process.

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use types::{FetchError, InitializationError, TransportError, TransportFailure};
