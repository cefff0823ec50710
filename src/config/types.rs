//! Configuration types.
//!
//! This module defines the configuration structs consumed by the transport
//! builders and the fetch pipeline, plus the logging enums.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Connection parameters shared by every transport.
///
/// The direct, HTTP-proxy and SOCKS5 builders all consume one of these, so the
/// timeout and pool numbers cannot drift between transports. Only the proxy
/// itself differs.
///
/// # Examples
///
/// ```
/// use http_fetch::TransportConfig;
/// use std::time::Duration;
///
/// let config = TransportConfig {
///     dial_timeout: Duration::from_secs(5),
///     ..Default::default()
/// };
/// assert_eq!(config.max_idle_connections, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Maximum idle connections kept in the pool
    pub max_idle_connections: usize,

    /// Idle pooled connections are closed after this long
    pub idle_timeout: Duration,

    /// Budget for the TLS handshake once TCP is connected
    pub tls_handshake_timeout: Duration,

    /// Wait for `100 Continue` before sending a body.
    ///
    /// The engine never sends `Expect: 100-continue`, so this is carried for
    /// completeness of the shared parameter set only.
    pub expect_continue_timeout: Duration,

    /// TCP dial timeout
    pub dial_timeout: Duration,

    /// TCP keep-alive interval
    pub keep_alive: Duration,

    /// Dial both IPv4 and IPv6 addresses (happy eyeballs)
    pub dual_stack: bool,

    /// Skip TLS certificate verification.
    ///
    /// Enabled by default. Set to `false` for verified TLS.
    pub accept_invalid_certs: bool,

    /// Maximum redirect hops followed before the request fails
    pub max_redirects: usize,
}

impl TransportConfig {
    /// Total time allowed for the connect phase (TCP dial plus TLS handshake).
    ///
    /// The engine bounds the whole connect phase with one timer, so the dial and
    /// handshake budgets are added together.
    pub fn connect_budget(&self) -> Duration {
        self.dial_timeout + self.tls_handshake_timeout
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_idle_connections: MAX_IDLE_CONNECTIONS,
            idle_timeout: IDLE_CONN_TIMEOUT,
            tls_handshake_timeout: TLS_HANDSHAKE_TIMEOUT,
            expect_continue_timeout: EXPECT_CONTINUE_TIMEOUT,
            dial_timeout: DIAL_TIMEOUT,
            keep_alive: KEEP_ALIVE,
            dual_stack: true,
            accept_invalid_certs: true,
            max_redirects: MAX_REDIRECT_HOPS,
        }
    }
}

/// Request defaults applied by the fetch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent sent when the request has no override
    pub user_agent: String,

    /// `Accept` header value
    pub accept: String,

    /// `Accept-Language` header value
    pub accept_language: String,

    /// `Content-Type` set on every request
    pub form_content_type: String,

    /// Maximum body size in bytes; `None` reads bodies of any size
    pub max_body_size: Option<usize>,

    /// Leading body bytes handed to the MIME sniffer
    pub sniff_len: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            form_content_type: FORM_CONTENT_TYPE.to_string(),
            max_body_size: None,
            sniff_len: SNIFF_LEN,
        }
    }
}
