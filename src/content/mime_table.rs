//! MIME type to file-type classification.
//!
//! The table is a compile-time constant: it is never mutated and can be read
//! from any number of tasks without locking.

use mime::Mime;
use strum_macros::EnumIter;

/// File type a response body is classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum FileType {
    /// HTML document
    Html,
    /// XML document
    Xml,
    /// CSS stylesheet
    Css,
    /// JSON document
    Json,
    /// JavaScript source
    Js,
    /// Plain text
    Txt,
    /// Opaque binary (`application/octet-stream`)
    File,
    /// PDF document
    Pdf,
    /// PostScript document
    PostScript,
    /// Word 97-2003 document
    Doc,
    /// Word document
    Docx,
    /// Excel workbook
    Xlsx,
    /// PowerPoint presentation
    Pptx,
    /// Excel 97-2003 workbook
    Xls,
    /// PowerPoint 97-2003 presentation
    Ppt,
    /// ZIP archive
    Zip,
    /// RAR archive
    Rar,
    /// gzip stream
    Gzip,
    /// JPEG image
    Jpg,
    /// GIF image
    Gif,
    /// PNG image
    Png,
    /// BMP image
    Bmp,
    /// WebP image
    Webp,
    /// Icon
    Ico,
    /// WebAssembly module
    Wasm,
    /// Forced download (`application/x-download`)
    Download,
}

impl FileType {
    /// File suffix label, including the leading dot.
    pub fn suffix(&self) -> &'static str {
        match self {
            FileType::Html => ".html",
            FileType::Xml => ".xml",
            FileType::Css => ".css",
            FileType::Json => ".json",
            FileType::Js => ".js",
            FileType::Txt => ".txt",
            FileType::File => ".file",
            FileType::Pdf => ".pdf",
            FileType::PostScript => ".ps",
            FileType::Doc => ".doc",
            FileType::Docx => ".docx",
            FileType::Xlsx => ".xlsx",
            FileType::Pptx => ".pptx",
            FileType::Xls => ".xls",
            FileType::Ppt => ".ppt",
            FileType::Zip => ".zip",
            FileType::Rar => ".rar",
            FileType::Gzip => ".gz",
            FileType::Jpg => ".jpg",
            FileType::Gif => ".gif",
            FileType::Png => ".png",
            FileType::Bmp => ".bmp",
            FileType::Webp => ".webp",
            FileType::Ico => ".ico",
            FileType::Wasm => ".wasm",
            FileType::Download => ".download",
        }
    }

    /// Whether bodies of this type are decoded into text.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FileType::Html
                | FileType::Xml
                | FileType::Css
                | FileType::Json
                | FileType::Js
                | FileType::Txt
        )
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Canonical MIME type essence to file type.
pub const MIME_TABLE: &[(&str, FileType)] = &[
    ("text/html", FileType::Html),
    ("application/xml", FileType::Xml),
    ("text/xml", FileType::Xml),
    ("text/css", FileType::Css),
    ("application/json", FileType::Json),
    ("text/json", FileType::Json),
    ("application/javascript", FileType::Js),
    ("application/x-javascript", FileType::Js),
    ("text/javascript", FileType::Js),
    ("text/plain", FileType::Txt),
    ("application/octet-stream", FileType::File),
    ("application/pdf", FileType::Pdf),
    ("application/postscript", FileType::PostScript),
    ("application/msword", FileType::Doc),
    ("application/vnd.ms-word", FileType::Doc),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        FileType::Docx,
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        FileType::Xlsx,
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        FileType::Pptx,
    ),
    ("application/msexcel", FileType::Xls),
    ("application/vnd.ms-excel", FileType::Xls),
    ("application/mspowerpoint", FileType::Ppt),
    ("application/zip", FileType::Zip),
    ("application/x-zip-compressed", FileType::Zip),
    ("application/x-rar-compressed", FileType::Rar),
    ("application/x-gzip", FileType::Gzip),
    ("image/jpeg", FileType::Jpg),
    ("image/jpg", FileType::Jpg),
    ("image/gif", FileType::Gif),
    ("image/png", FileType::Png),
    ("image/bmp", FileType::Bmp),
    ("image/webp", FileType::Webp),
    ("image/x-icon", FileType::Ico),
    ("application/wasm", FileType::Wasm),
    ("application/x-download", FileType::Download),
];

/// Returns the lowercase essence (`type/subtype`) of a MIME type, or `None`
/// if it does not parse.
pub fn mime_essence(mime_type: &str) -> Option<String> {
    let parsed: Mime = mime_type.trim().parse().ok()?;
    Some(parsed.essence_str().to_string())
}

/// Classifies a MIME type (parameters allowed) into a [`FileType`].
///
/// Returns `None` for types absent from [`MIME_TABLE`]; that is "unclassified",
/// not an error.
///
/// # Examples
///
/// ```
/// use http_fetch::content::{classify, FileType};
///
/// assert_eq!(classify("text/html; charset=utf-8"), Some(FileType::Html));
/// assert_eq!(classify("video/mp4"), None);
/// ```
pub fn classify(mime_type: &str) -> Option<FileType> {
    let essence = mime_essence(mime_type)?;
    MIME_TABLE
        .iter()
        .find(|(key, _)| *key == essence)
        .map(|&(_, file_type)| file_type)
}
