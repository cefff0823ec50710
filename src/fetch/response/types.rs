//! Response data structures.

use std::time::Duration;

use bytes::Bytes;

use crate::content::FileType;

/// Where the time of one fetch went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseTiming {
    /// From sending the request to receiving the final response headers
    pub response_time: Duration,
    /// Reading the body
    pub download_time: Duration,
    /// The whole fetch, including sniffing and decoding
    pub total_time: Duration,
}

/// The outcome of a successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Final URL after redirects
    pub url: String,
    /// Raw body bytes (after content-encoding is removed)
    pub body: Bytes,
    /// HTTP status code of the final response
    pub code: u16,
    /// Body decoded to UTF-8; empty unless `file_type` is a text type
    pub text: String,
    /// MIME type sniffed from the body
    pub mime_type: String,
    /// Cookies set by the final response, `;`-separated in server order
    pub cookies: String,
    /// Classification of `mime_type`; `None` when unclassified
    pub file_type: Option<FileType>,
    /// Charset `text` was decoded from; empty when no text was decoded
    pub charset: String,
    /// `Content-Type` declared by the server, for reference only
    pub content_type: Option<String>,
    /// Timing breakdown
    pub timing: ResponseTiming,
}

impl Response {
    /// File suffix of the classified type (e.g. `.html`), or `""`.
    pub fn file_suffix(&self) -> &'static str {
        self.file_type.map(|t| t.suffix()).unwrap_or_default()
    }

    /// Whether the body was decoded into `text`.
    pub fn is_text(&self) -> bool {
        self.file_type.is_some_and(|t| t.is_text())
    }
}
