//! Error type definitions.
//!
//! This module defines the errors raised while building transports, while
//! fetching, and while setting up logging.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::fetch::Response;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors raised while building an [`HttpClient`](crate::HttpClient).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP proxy URL could not be parsed.
    #[error("Invalid HTTP proxy URL {url:?}: {source}")]
    InvalidProxyUrl {
        /// The rejected proxy URL
        url: String,
        /// Parse failure reported by the engine
        #[source]
        source: ReqwestError,
    },

    /// The SOCKS5 proxy address is not a usable `host:port` pair.
    #[error("Invalid SOCKS5 proxy address {address:?}: {reason}")]
    InvalidSocksAddress {
        /// The rejected address
        address: String,
        /// Why it was rejected
        reason: String,
    },

    /// The engine refused the client configuration (e.g. TLS backend failure).
    #[error("HTTP client initialization error: {0}")]
    Client(#[from] ReqwestError),
}

/// Errors raised by [`fetch`](crate::fetch()).
///
/// Each variant is a distinct failure kind, so "the request failed" can never be
/// confused with "the server returned an empty page".
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL does not use an HTTP scheme; no request was sent.
    #[error("Invalid URL {url:?}: only http and https URLs can be fetched")]
    InvalidUrl {
        /// The rejected URL
        url: String,
    },

    /// A caller-supplied header name or value is not valid HTTP; no request was sent.
    #[error("Invalid header {name:?} for {url}")]
    InvalidHeader {
        /// The requested URL
        url: String,
        /// The offending header name
        name: String,
    },

    /// The engine failed to complete the exchange (DNS, connect, TLS, redirects...).
    #[error("{kind} for {url}: {source}")]
    Transport {
        /// The requested URL
        url: String,
        /// Categorized failure
        kind: TransportFailure,
        /// Underlying engine error
        #[source]
        source: ReqwestError,
    },

    /// The response body grew past the configured maximum.
    #[error("Response body for {url} exceeds {limit} bytes")]
    BodyTooLarge {
        /// Final URL of the response
        url: String,
        /// Configured limit in bytes
        limit: usize,
    },

    /// The body contained byte sequences invalid in the detected charset.
    ///
    /// The response is still returned, with malformed sequences replaced by
    /// U+FFFD in its `text`.
    #[error("Malformed {charset} sequences in body of {}", .response.url)]
    Decode {
        /// Charset the body was decoded with
        charset: String,
        /// The response with lossily decoded text
        response: Box<Response>,
    },

    /// The per-request deadline elapsed.
    #[error("Request to {url} timed out after {deadline:?}")]
    Timeout {
        /// The requested URL
        url: String,
        /// The deadline that elapsed
        deadline: Duration,
    },

    /// The caller cancelled the request.
    #[error("Request to {url} was cancelled")]
    Cancelled {
        /// The requested URL
        url: String,
    },
}

impl FetchError {
    /// Short, stable name of the failure kind, suitable for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::InvalidHeader { .. } => "invalid_header",
            FetchError::Transport { .. } => "transport",
            FetchError::BodyTooLarge { .. } => "body_too_large",
            FetchError::Decode { .. } => "decode",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Cancelled { .. } => "cancelled",
        }
    }

    /// The partially decoded response carried by a [`FetchError::Decode`].
    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchError::Decode { response, .. } => Some(*response),
            _ => None,
        }
    }
}

/// Categories of engine failures.
///
/// A `reqwest::Error` is mapped onto one of these by
/// [`categorize_reqwest_error`](crate::error_handling::categorize_reqwest_error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum TransportFailure {
    /// The request could not be built
    Builder,
    /// Too many redirects or a redirect loop
    Redirect,
    /// The engine's own timer elapsed
    Timeout,
    /// DNS, refused connection or TLS handshake
    Connect,
    /// Sending the request failed
    Request,
    /// Reading the response body failed
    Body,
    /// Content-encoding (gzip/brotli/deflate) failure
    Decode,
    /// Anything else
    Other,
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransportFailure {
    /// Human-readable description of the failure category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportFailure::Builder => "HTTP request builder error",
            TransportFailure::Redirect => "HTTP request redirect error",
            TransportFailure::Timeout => "HTTP request timeout error",
            TransportFailure::Connect => "HTTP request connect error",
            TransportFailure::Request => "HTTP request error",
            TransportFailure::Body => "HTTP request body error",
            TransportFailure::Decode => "HTTP request decode error",
            TransportFailure::Other => "HTTP request other error",
        }
    }
}
