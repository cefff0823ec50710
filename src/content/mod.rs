//! Response content inspection.
//!
//! This module provides:
//! - MIME sniffing from body bytes
//! - MIME type to file-type classification
//! - Charset detection and transcoding to UTF-8

mod charset;
mod mime_table;
mod sniff;

// Re-export public API
pub use charset::{charset_param, decode, determine_encoding, CharsetSource, DetectedCharset};
pub use mime_table::{classify, mime_essence, FileType, MIME_TABLE};
pub use sniff::{detect_content_type, sniff_prefix};
