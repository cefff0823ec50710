//! http_fetch library: HTTP fetching with content-aware decoding
//!
//! This library fetches a URL over a direct connection, an HTTP proxy or a
//! SOCKS5 proxy, follows redirects, keeps cookies between requests and turns
//! text-like bodies into UTF-8 text. The body type is sniffed from its bytes,
//! not taken from the server's `Content-Type` header.
//!
//! # Example
//!
//! ```no_run
//! use http_fetch::{build_direct, fetch, Method, Request, TransportConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = build_direct(&TransportConfig::default())?;
//! let request = Request::new("https://example.com/", Method::Get);
//!
//! let response = fetch(&request, &client).await?;
//! println!(
//!     "{} {} ({}, {} chars of {})",
//!     response.code,
//!     response.url,
//!     response.mime_type,
//!     response.text.chars().count(),
//!     response.charset
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod content;
mod error_handling;
mod fetch;
pub mod initialization;

// Re-export public API
pub use config::{FetchConfig, LogFormat, LogLevel, TransportConfig};
pub use content::FileType;
pub use error_handling::{
    categorize_reqwest_error, FetchError, InitializationError, TransportError, TransportFailure,
};
pub use fetch::{fetch, fetch_with_config, Method, Request, Response, ResponseTiming};
pub use initialization::{
    build_direct, build_http_proxy, build_socks5_proxy, init_logger_with, Credentials, HttpClient,
    Transport,
};
