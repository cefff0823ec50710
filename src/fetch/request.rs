//! Request descriptor and outgoing request construction.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::{
    FetchConfig, HEADER_ACCEPT, HEADER_ACCEPT_LANGUAGE, HEADER_CONTENT_TYPE, HEADER_USER_AGENT,
};
use crate::error_handling::FetchError;

/// HTTP methods a [`Request`] can use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    /// GET
    #[default]
    Get,
    /// HEAD
    Head,
    /// POST, the only method that carries the form body
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Trace => reqwest::Method::TRACE,
        }
    }
}

/// A request to fetch one URL.
///
/// # Examples
///
/// ```
/// use http_fetch::{Method, Request};
/// use std::time::Duration;
///
/// let request = Request::new("http://example.com/login", Method::Post)
///     .header("X-Requested-With", "XMLHttpRequest")
///     .form("user", "alice")
///     .form("remember", "1")
///     .timeout(Duration::from_secs(5));
/// assert_eq!(request.form.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Target URL; must use the http or https scheme
    pub url: String,

    /// HTTP method
    pub method: Method,

    /// User-Agent override; `None` or empty uses the configured default
    pub user_agent: Option<String>,

    /// Extra headers, appended after the defaults. Repeated names accumulate.
    pub headers: Vec<(String, String)>,

    /// Form fields, sent URL-encoded as the body of POST requests only
    pub form: Vec<(String, String)>,

    /// Recognized MIME types (MIME type to file suffix).
    ///
    /// Recorded with the request; responses are not filtered by it.
    pub mime_types: HashMap<String, String>,

    /// Deadline for the whole fetch, from send to decoded text
    pub timeout: Option<Duration>,
}

impl Request {
    /// Creates a request for `url` with `method`.
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
            ..Default::default()
        }
    }

    /// Overrides the User-Agent for this request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Appends a header; an existing header with the same name is kept.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a form field.
    pub fn form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// Adds a MIME type to the recognized set.
    pub fn mime_type(mut self, mime: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.mime_types.insert(mime.into(), suffix.into());
        self
    }

    /// Bounds the whole fetch by `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Builds the outgoing header map.
///
/// Defaults come first (`Content-Type`, `User-Agent`, `Accept`,
/// `Accept-Language`), then every caller header is appended, so a caller
/// header with a default's name adds a second value rather than replacing it.
pub(crate) fn build_headers(
    request: &Request,
    config: &FetchConfig,
) -> Result<HeaderMap, FetchError> {
    let user_agent = request
        .user_agent
        .as_deref()
        .filter(|ua| !ua.is_empty())
        .unwrap_or(&config.user_agent);

    let defaults = [
        (HEADER_CONTENT_TYPE, config.form_content_type.as_str()),
        (HEADER_USER_AGENT, user_agent),
        (HEADER_ACCEPT, config.accept.as_str()),
        (HEADER_ACCEPT_LANGUAGE, config.accept_language.as_str()),
    ];

    let mut headers = HeaderMap::new();
    let caller = request
        .headers
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()));
    for (name, value) in defaults.into_iter().chain(caller) {
        let invalid = || FetchError::InvalidHeader {
            url: request.url.clone(),
            name: name.to_string(),
        };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}

/// URL-encodes the form fields for a POST; other methods carry no body.
pub(crate) fn form_body(request: &Request) -> Option<String> {
    if request.method != Method::Post {
        return None;
    }
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in &request.form {
        serializer.append_pair(name, value);
    }
    Some(serializer.finish())
}
