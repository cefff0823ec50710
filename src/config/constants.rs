//! Configuration constants.
//!
//! This module defines the defaults shared by every transport and by the fetch
//! pipeline: connection timeouts, pool sizes, header values and sniffing limits.

use std::time::Duration;

// Transport pool and connection parameters
/// Maximum number of idle connections kept in the pool
pub const MAX_IDLE_CONNECTIONS: usize = 100;
/// How long an idle pooled connection is kept before it is closed
pub const IDLE_CONN_TIMEOUT: Duration = Duration::from_secs(90);
/// TLS handshake timeout
pub const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
/// Time to wait for a `100 Continue` before sending the body anyway
pub const EXPECT_CONTINUE_TIMEOUT: Duration = Duration::from_secs(1);
/// TCP dial timeout
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(30);
/// TCP keep-alive probe interval
pub const KEEP_ALIVE: Duration = Duration::from_secs(30);
/// Maximum number of redirect hops followed by the engine
/// Exceeding it surfaces as a transport error of kind `Redirect`
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Default User-Agent string for HTTP requests.
///
/// Used whenever a request does not carry its own override. Callers can replace
/// it per request with [`Request::user_agent`](crate::Request::user_agent) or
/// globally through [`FetchConfig::user_agent`](crate::FetchConfig).
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/55.0.2883.87 Safari/537.36";

/// Default `Accept` header value
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
/// Default `Accept-Language` header value
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.8";
/// `Content-Type` set on every request (required by POST forms)
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// Content inspection limits
/// Number of leading body bytes inspected by the MIME sniffer
pub const SNIFF_LEN: usize = 512;
/// Number of leading body bytes scanned for `<meta charset>` declarations
pub const CHARSET_PRESCAN_LEN: usize = 1024;
