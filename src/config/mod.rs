//! Client configuration and constants.
//!
//! This module provides:
//! - Default constants (timeouts, pool sizes, header values)
//! - HTTP header name constants
//! - Transport and fetch configuration structs

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{FetchConfig, LogFormat, LogLevel, TransportConfig};
