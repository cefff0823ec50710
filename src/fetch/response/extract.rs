//! HTTP response extraction utilities.

use bytes::{Bytes, BytesMut};
use log::debug;
use reqwest::cookie::Cookie;

use crate::error_handling::{categorize_reqwest_error, FetchError};

/// Renders one cookie in `Set-Cookie` form without `Expires`.
pub(crate) fn render_cookie(cookie: &Cookie<'_>) -> String {
    let mut rendered = format!("{}={}", cookie.name(), cookie.value());
    if let Some(path) = cookie.path() {
        rendered.push_str("; Path=");
        rendered.push_str(path);
    }
    if let Some(domain) = cookie.domain() {
        rendered.push_str("; Domain=");
        rendered.push_str(domain);
    }
    if let Some(max_age) = cookie.max_age() {
        rendered.push_str(&format!("; Max-Age={}", max_age.as_secs()));
    }
    if cookie.http_only() {
        rendered.push_str("; HttpOnly");
    }
    if cookie.secure() {
        rendered.push_str("; Secure");
    }
    rendered
}

/// Joins the cookies set by a response with `;`, in the order they were sent.
pub(crate) fn extract_cookies(response: &reqwest::Response) -> String {
    response
        .cookies()
        .map(|cookie| render_cookie(&cookie))
        .collect::<Vec<_>>()
        .join(";")
}

fn body_error(url: &str, source: reqwest::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        kind: categorize_reqwest_error(&source),
        source,
    }
}

/// Reads the whole body into memory, enforcing `limit` when set.
///
/// # Errors
///
/// Returns `FetchError::BodyTooLarge` as soon as the body (or its declared
/// `Content-Length`) exceeds `limit`, and `FetchError::Transport` if the
/// connection fails mid-body.
pub(crate) async fn read_body(
    mut response: reqwest::Response,
    limit: Option<usize>,
    url: &str,
) -> Result<Bytes, FetchError> {
    let Some(limit) = limit else {
        return response.bytes().await.map_err(|e| body_error(url, e));
    };

    let too_large = || FetchError::BodyTooLarge {
        url: url.to_string(),
        limit,
    };

    if let Some(declared) = response.content_length() {
        if declared > limit as u64 {
            debug!("Declared body of {declared} bytes exceeds {limit} for {url}");
            return Err(too_large());
        }
    }

    let mut body = BytesMut::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| body_error(url, e))? {
        if body.len() + chunk.len() > limit {
            debug!("Body exceeded {limit} bytes while streaming {url}");
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
