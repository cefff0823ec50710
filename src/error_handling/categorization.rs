//! Error categorization.
//!
//! Maps engine errors onto [`TransportFailure`] so callers can branch on the
//! failure kind without inspecting `reqwest` internals.

use super::types::TransportFailure;

/// Categorizes a `reqwest::Error` into a `TransportFailure`.
///
/// Timeouts are checked before connect errors, so a connect timeout is
/// reported as `Timeout`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> TransportFailure {
    if error.is_builder() {
        TransportFailure::Builder
    } else if error.is_redirect() {
        TransportFailure::Redirect
    } else if error.is_timeout() {
        TransportFailure::Timeout
    } else if error.is_connect() {
        TransportFailure::Connect
    } else if error.is_request() {
        TransportFailure::Request
    } else if error.is_body() {
        TransportFailure::Body
    } else if error.is_decode() {
        TransportFailure::Decode
    } else {
        TransportFailure::Other
    }
}
