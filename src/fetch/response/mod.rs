//! HTTP response processing.
//!
//! This module handles extracting data from HTTP responses and turning the
//! body into text when its sniffed type is text-like.

mod extract;
mod types;

pub(crate) use extract::{extract_cookies, read_body};
pub use types::{Response, ResponseTiming};

use log::debug;

use crate::content::{classify, decode, determine_encoding, FileType};

/// Classification and text of a response body.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct DecodedBody {
    pub file_type: Option<FileType>,
    pub text: String,
    pub charset: String,
    pub had_errors: bool,
}

/// Classifies `body` by its sniffed MIME type and decodes it if it is text.
///
/// Non-text bodies keep an empty `text` and `charset`.
pub(crate) fn decode_body(body: &[u8], mime_type: &str) -> DecodedBody {
    let file_type = classify(mime_type);
    let Some(text_type) = file_type.filter(|t| t.is_text()) else {
        debug!("Skipping text decode for {mime_type}");
        return DecodedBody {
            file_type,
            ..Default::default()
        };
    };

    let detected = determine_encoding(body, mime_type);
    debug!(
        "Decoding {text_type} body as {} ({:?})",
        detected.name, detected.source
    );
    let (text, had_errors) = decode(body, &detected);
    DecodedBody {
        file_type,
        text,
        charset: detected.name,
        had_errors,
    }
}
