//! Charset detection and transcoding to UTF-8.
//!
//! A body that is already valid UTF-8 is used verbatim. Otherwise detection
//! weighs the evidence carried by the bytes above the MIME type: a byte-order
//! mark, then an in-document `<meta>` or XML declaration, then the MIME type's
//! `charset` parameter, and finally `windows-1252`.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252, X_USER_DEFINED};
use log::trace;
use mime::Mime;
use scraper::{Html, Selector};

use crate::config::CHARSET_PRESCAN_LEN;

static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("static selector is valid"));

/// Which signal decided the charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetSource {
    /// Byte-order mark at the start of the body
    Bom,
    /// The whole body is valid UTF-8
    Utf8,
    /// `<meta charset>`, `<meta http-equiv>` or an XML declaration
    Meta,
    /// `charset` parameter of the content type
    ContentType,
    /// Nothing matched; `windows-1252` assumed
    Fallback,
}

/// Result of charset detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCharset {
    /// Decoder for the body
    pub encoding: &'static Encoding,
    /// Lowercase WHATWG name, e.g. `utf-8`, `gbk`, `windows-1252`
    pub name: String,
    /// Signal that decided it
    pub source: CharsetSource,
}

impl DetectedCharset {
    fn new(encoding: &'static Encoding, source: CharsetSource) -> Self {
        Self {
            encoding,
            name: encoding.name().to_ascii_lowercase(),
            source,
        }
    }

    /// Whether the body can be used as text without transcoding.
    pub fn is_utf8(&self) -> bool {
        self.encoding == UTF_8
    }
}

/// Determines the charset of `content`, using `content_type` as a fallback hint.
///
/// # Examples
///
/// ```
/// use http_fetch::content::{determine_encoding, CharsetSource};
///
/// // "你好" in GBK, which is not valid UTF-8
/// let html = b"<html><head><meta charset=\"gbk\"></head><p>\xC4\xE3\xBA\xC3</p></html>";
/// let detected = determine_encoding(html, "text/html; charset=utf-8");
/// assert_eq!(detected.name, "gbk");
/// assert_eq!(detected.source, CharsetSource::Meta);
/// ```
pub fn determine_encoding(content: &[u8], content_type: &str) -> DetectedCharset {
    if let Some((encoding, _)) = Encoding::for_bom(content) {
        return DetectedCharset::new(encoding, CharsetSource::Bom);
    }

    if std::str::from_utf8(content).is_ok() {
        return DetectedCharset::new(UTF_8, CharsetSource::Utf8);
    }

    let head = &content[..content.len().min(CHARSET_PRESCAN_LEN)];
    if let Some(encoding) = prescan(head) {
        return DetectedCharset::new(encoding, CharsetSource::Meta);
    }

    let declared =
        charset_param(content_type).and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return DetectedCharset::new(encoding, CharsetSource::ContentType);
    }

    DetectedCharset::new(WINDOWS_1252, CharsetSource::Fallback)
}

/// Decodes `content` to UTF-8 with the detected charset.
///
/// Returns the text and whether malformed sequences were replaced with U+FFFD.
/// UTF-8 bodies are kept byte for byte, including a leading BOM; other
/// encodings drop their BOM.
pub fn decode(content: &[u8], detected: &DetectedCharset) -> (String, bool) {
    if detected.is_utf8() {
        let (text, had_errors) = UTF_8.decode_without_bom_handling(content);
        return (text.into_owned(), had_errors);
    }
    let (text, actual, had_errors) = detected.encoding.decode(content);
    if actual != detected.encoding {
        trace!("BOM overrode {} with {}", detected.name, actual.name());
    }
    (text.into_owned(), had_errors)
}

/// Extracts the `charset` parameter of a MIME type, unquoted.
pub fn charset_param(content_type: &str) -> Option<String> {
    let parsed: Mime = content_type.trim().parse().ok()?;
    let value = parsed.get_param(mime::CHARSET)?;
    let label = value.as_str().trim_matches('"');
    (!label.is_empty()).then(|| label.to_string())
}

// Labels from documents are resolved with the WHATWG meta overrides
fn resolve_meta_label(label: &str) -> Option<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes())?;
    if encoding == UTF_16BE || encoding == UTF_16LE {
        Some(UTF_8)
    } else if encoding == X_USER_DEFINED {
        Some(WINDOWS_1252)
    } else {
        Some(encoding)
    }
}

/// Looks for an encoding declaration in the head of a document.
fn prescan(head: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(head);
    if head.starts_with("<?xml") {
        return xml_declaration(&head);
    }

    let document = Html::parse_document(&head);
    document.select(&META_SELECTOR).find_map(|meta| {
        let element = meta.value();
        if let Some(label) = element.attr("charset") {
            return resolve_meta_label(label);
        }
        let is_pragma = element
            .attr("http-equiv")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("content-type"));
        if !is_pragma {
            return None;
        }
        element
            .attr("content")
            .and_then(charset_from_content)
            .and_then(resolve_meta_label)
    })
}

/// Extracts the charset label from a `content="text/html; charset=..."` value.
fn charset_from_content(value: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets valid for `value`
    let lower = value.to_ascii_lowercase();
    let mut from = 0;
    let start = loop {
        let end = from + lower[from..].find("charset")? + "charset".len();
        let rest = &lower[end..];
        let trimmed = rest.trim_start();
        if trimmed.starts_with('=') {
            break end + (rest.len() - trimmed.len()) + 1;
        }
        from = end;
    };

    let rest = value[start..].trim_start();
    let label = match rest.chars().next()? {
        quote @ ('"' | '\'') => {
            let inner = &rest[1..];
            &inner[..inner.find(quote)?]
        }
        _ => rest
            .split(|c: char| c.is_ascii_whitespace() || c == ';')
            .next()?,
    };
    (!label.is_empty()).then_some(label)
}

fn xml_declaration(head: &str) -> Option<&'static Encoding> {
    let decl = &head[..head.find("?>")?];
    let rest = decl[decl.find("encoding")? + "encoding".len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    resolve_meta_label(&value[..value.find(quote)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{GBK, SHIFT_JIS};

    // "你好" in GBK; not valid UTF-8
    const GBK_BYTES: &[u8] = b"\xC4\xE3\xBA\xC3";

    fn with_gbk_text(markup: &[u8]) -> Vec<u8> {
        [markup, GBK_BYTES].concat()
    }

    #[test]
    fn test_bom_wins() {
        let content = b"\xEF\xBB\xBF<meta charset=\"gbk\">";
        let detected = determine_encoding(content, "text/html; charset=gbk");
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.source, CharsetSource::Bom);

        let detected = determine_encoding(b"\xFF\xFEh\x00", "text/plain; charset=utf-16le");
        assert_eq!(detected.name, "utf-16le");
    }

    #[test]
    fn test_valid_utf8_beats_stale_meta_label() {
        let content = "<html><head><meta charset=\"iso-8859-1\"></head><body>café</body></html>";
        let detected = determine_encoding(content.as_bytes(), "text/html; charset=utf-8");
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.source, CharsetSource::Utf8);

        let (text, had_errors) = decode(content.as_bytes(), &detected);
        assert_eq!(text, content);
        assert!(!had_errors);
    }

    #[test]
    fn test_meta_charset_attribute() {
        let content =
            with_gbk_text(b"<!DOCTYPE html><html><head><meta charset=gb2312><title>t</title>");
        let detected = determine_encoding(&content, "text/html; charset=utf-8");
        assert_eq!(detected.encoding, GBK);
        assert_eq!(detected.name, "gbk");
        assert_eq!(detected.source, CharsetSource::Meta);
    }

    #[test]
    fn test_meta_http_equiv() {
        let content = br#"<html><head>
            <META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=Shift_JIS">
            </head><p>"#;
        let content = [&content[..], b"\x82\xA0"].concat();
        let detected = determine_encoding(&content, "text/html; charset=utf-8");
        assert_eq!(detected.encoding, SHIFT_JIS);
        assert_eq!(detected.name, "shift_jis");
    }

    #[test]
    fn test_meta_content_without_pragma_is_ignored() {
        let content = with_gbk_text(br#"<meta name="x" content="text/html; charset=gbk">"#);
        let detected = determine_encoding(&content, "text/html; charset=utf-8");
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.source, CharsetSource::ContentType);
    }

    #[test]
    fn test_meta_inside_comment_is_ignored() {
        let content = with_gbk_text(b"<!-- <meta charset=\"gbk\"> --><p>plain</p>");
        let detected = determine_encoding(&content, "");
        assert_eq!(detected.source, CharsetSource::Fallback);
    }

    #[test]
    fn test_meta_utf16_label_maps_to_utf8() {
        let detected = determine_encoding(b"<meta charset=\"utf-16\">\xFF", "");
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.source, CharsetSource::Meta);
    }

    #[test]
    fn test_meta_after_other_tags_with_attributes() {
        let content = with_gbk_text(
            br#"<html lang="zh"><head><link rel="x" href="/a>b"><meta charset='big5'>"#,
        );
        let detected = determine_encoding(&content, "");
        assert_eq!(detected.name, "big5");
    }

    #[test]
    fn test_unknown_meta_label_falls_through() {
        let content = with_gbk_text(b"<meta charset=\"no-such-charset\">");
        let detected = determine_encoding(&content, "text/plain; charset=gbk");
        assert_eq!(detected.encoding, GBK);
        assert_eq!(detected.source, CharsetSource::ContentType);
    }

    #[test]
    fn test_xml_declaration() {
        let content = with_gbk_text(br#"<?xml version="1.0" encoding="GB2312"?><rss>"#);
        let detected = determine_encoding(&content, "text/xml; charset=utf-8");
        assert_eq!(detected.encoding, GBK);
        assert_eq!(detected.source, CharsetSource::Meta);
    }

    #[test]
    fn test_valid_utf8_beats_content_type_param() {
        let detected = determine_encoding("你好".as_bytes(), "text/plain; charset=gbk");
        assert_eq!(detected.encoding, UTF_8);
        assert_eq!(detected.source, CharsetSource::Utf8);
    }

    #[test]
    fn test_content_type_param_for_invalid_utf8() {
        let detected = determine_encoding(GBK_BYTES, "text/plain; charset=\"gbk\"");
        assert_eq!(detected.encoding, GBK);
        assert_eq!(detected.source, CharsetSource::ContentType);
    }

    #[test]
    fn test_windows_1252_fallback() {
        let detected = determine_encoding(b"caf\xE9", "text/plain");
        assert_eq!(detected.name, "windows-1252");
        assert_eq!(detected.source, CharsetSource::Fallback);
        let (text, had_errors) = decode(b"caf\xE9", &detected);
        assert_eq!(text, "café");
        assert!(!had_errors);
    }

    #[test]
    fn test_decode_gbk() {
        let detected = DetectedCharset::new(GBK, CharsetSource::Meta);
        let (text, had_errors) = decode(GBK_BYTES, &detected);
        assert_eq!(text, "你好");
        assert!(!had_errors);
    }

    #[test]
    fn test_decode_reports_malformed_sequences() {
        let detected = DetectedCharset::new(UTF_8, CharsetSource::Meta);
        let (text, had_errors) = decode(b"ok\xFF", &detected);
        assert_eq!(text, "ok\u{FFFD}");
        assert!(had_errors);
    }

    #[test]
    fn test_decode_keeps_utf8_bom() {
        let body = b"\xEF\xBB\xBF<html>hi</html>";
        let detected = determine_encoding(body, "");
        let (text, had_errors) = decode(body, &detected);
        assert_eq!(text.as_bytes(), body);
        assert!(!had_errors);
    }

    #[test]
    fn test_decode_strips_utf16_bom() {
        let body = b"\xFF\xFEh\x00i\x00";
        let detected = determine_encoding(body, "");
        let (text, _) = decode(body, &detected);
        assert_eq!(text, "hi");
    }

    #[test]
    fn test_charset_param() {
        assert_eq!(
            charset_param("text/html; charset=utf-8").as_deref(),
            Some("utf-8")
        );
        assert_eq!(
            charset_param("text/html; charset=\"gbk\"").as_deref(),
            Some("gbk")
        );
        assert_eq!(charset_param("text/html"), None);
        assert_eq!(charset_param("not a mime type"), None);
    }

    #[test]
    fn test_charset_from_content_value() {
        assert_eq!(
            charset_from_content("text/html; charset = 'euc-kr'"),
            Some("euc-kr")
        );
        assert_eq!(charset_from_content("text/html"), None);
        assert_eq!(
            charset_from_content("charsetx; charset=koi8-r;"),
            Some("koi8-r")
        );
        assert_eq!(
            charset_from_content("text/html; CHARSET=Shift_JIS"),
            Some("Shift_JIS")
        );
    }
}
