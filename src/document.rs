use serde::Serialize;
use std::fmt;

/// Media type a PDF file handle may declare.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

// ── RawDocument ──────────────────────────────────────────────────────────────

/// The bytes of one file, as handed to the extractor.
///
/// The content is exposed through [`RawDocument::text`] as a latin1 string:
/// every byte becomes the `char` with the same code point, so binary stream
/// data survives and byte offsets equal char offsets.
///
/// ```
/// # use pdfcheck::RawDocument;
/// let doc = RawDocument::new("a.pdf", vec![b'%', 0xE2, 0xE3]);
/// assert_eq!(doc.text().chars().nth(1), Some('\u{E2}'));
/// assert_eq!(doc.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RawDocument {
    name: String,
    size: u64,
    text: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            text: latin1(&data),
        }
    }

    /// File name as reported by the file handle.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes of the original content.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Binary-safe string view of the content.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Map each byte to the `char` with the same code point (ISO-8859-1).
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Upper-cased text after the last `.` of `name`; the whole name when it has
/// no dot.
pub fn file_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_uppercase()
}

/// Returns `true` when a file handle declares a PDF, either by its `.pdf`
/// extension (case-insensitive) or by the `application/pdf` media type.
pub fn is_pdf_file(name: &str, media_type: Option<&str>) -> bool {
    let by_name = name.contains('.') && file_extension(name) == "PDF";
    let by_type = media_type
        .map(|m| m.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
        .unwrap_or(false);
    by_name || by_type
}

// ── Heading ──────────────────────────────────────────────────────────────────

/// First row of every report: `1. document.pdf [PDF - 236 KB]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// 1-based position of the file in its batch.
    pub ordinal: usize,
    pub name: String,
    pub extension: String,
    pub size: u64,
}

impl Heading {
    pub fn new(ordinal: usize, name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        Self {
            ordinal,
            extension: file_extension(&name),
            name,
            size,
        }
    }

    /// `[PDF - 236 KB]`
    pub fn label(&self) -> String {
        format!("[{} - {}]", self.extension, format_size(self.size))
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} {}", self.ordinal, self.name, self.label())
    }
}

/// Sizes up to 1024 KB are shown in whole kilobytes, rounded up; anything
/// larger in megabytes with one decimal.
pub fn format_size(bytes: u64) -> String {
    let kilobytes = bytes as f64 / 1024.0;
    if kilobytes > 1024.0 {
        format!("{:.1} MB", kilobytes / 1024.0)
    } else {
        format!("{} KB", kilobytes.ceil() as u64)
    }
}
