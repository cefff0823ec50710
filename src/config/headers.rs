//! HTTP header name constants.
//!
//! Header names the fetch pipeline sets on every outgoing request. They are
//! plain strings so callers can compare them against their own header overrides.

/// Content-Type header
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// User-Agent header
pub const HEADER_USER_AGENT: &str = "User-Agent";
/// Accept header
pub const HEADER_ACCEPT: &str = "Accept";
/// Accept-Language header
pub const HEADER_ACCEPT_LANGUAGE: &str = "Accept-Language";

/// Headers populated by the pipeline before caller overrides are appended.
pub const DEFAULT_REQUEST_HEADERS: &[&str] = &[
    HEADER_CONTENT_TYPE,
    HEADER_USER_AGENT,
    HEADER_ACCEPT,
    HEADER_ACCEPT_LANGUAGE,
];
