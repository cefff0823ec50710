//! Client and logger initialization.
//!
//! This module provides functions to set up the shared resources a caller
//! needs before fetching:
//! - HTTP clients for the direct, HTTP-proxy and SOCKS5 transports
//! - The logger
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::{
    build_direct, build_http_proxy, build_socks5_proxy, Credentials, HttpClient, Transport,
};
pub use logger::init_logger_with;
