//! # pdfcheck
//!
//! Quick, local accessibility and metadata inspection of PDF files.
//!
//! ## What this crate does
//!
//! 1. **Sniff the header** — the first eight bytes must read `%PDF-x.y`; the
//!    version is reported and files without it go no further.
//! 2. **Check the content** — a fixed sequence of independent text checks
//!    reports the document title, the `DisplayDocTitle` preference, the
//!    `Marked` flag, the PDF/UA identifier, tagging (`StructTreeRoot`), the
//!    document language, and the XMP creator tool and producer.
//! 3. **Process batches in order** — files are read one after another and
//!    each report is handed to a [`ReportSink`] before the next read starts.
//! 4. **Render** — reports become terminal text, HTML flag paragraphs or JSON.
//!
//! The checks work on the raw bytes read as latin1 text. They do not parse
//! the object graph and do not decompress streams, so metadata inside
//! compressed object streams is reported as not set.
//!
//! ## Quick example
//!
//! ```
//! use pdfcheck::{Extractor, Field, RawDocument, Status};
//!
//! let bytes = b"%PDF-1.7\n<</Marked true>>\n/StructTreeRoot 12 0 R".to_vec();
//! let report = Extractor::new().extract(1, &RawDocument::new("doc.pdf", bytes));
//!
//! assert_eq!(report.version(), Some("1.7"));
//! assert_eq!(report.get(Field::Marked).unwrap().status, Status::Valid);
//! assert_eq!(report.get(Field::Tagged).unwrap().value, "Yes (12 tags)");
//! ```

use thiserror::Error;

mod batch;
pub mod checks;
mod document;
mod extractor;
mod render;
mod report;

pub use batch::{BatchProcessor, BatchSummary, FileSource, LocalFile, MemoryFile, ReportSink};
pub use document::{file_extension, format_size, is_pdf_file, Heading, RawDocument};
pub use extractor::Extractor;
pub use render::{HtmlRenderer, JsonRenderer, RenderSink, Renderer, TextRenderer};
pub use report::{CheckResult, DocumentReport, Field, Status, Style};

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for [`Extractor`] and [`BatchProcessor`].
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Declared field set. Checks always run in [`Field::PIPELINE`] order;
    /// this only selects which of them run. The header sniff always runs.
    pub fields: Vec<Field>,

    /// When `true`, files that declare neither a `.pdf` extension nor the
    /// `application/pdf` media type are reported as rejected and not read.
    pub reject_non_pdf: bool,

    /// If set, files larger than this many bytes are reported and not
    /// inspected.
    pub max_file_size: Option<u64>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            fields: Field::PIPELINE.to_vec(),
            reject_non_pdf: true,
            max_file_size: None,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
///
/// Problems with an individual file (wrong type, unreadable, no header,
/// missing fields) are never errors: they become rows of that file's report.
#[derive(Error, Debug)]
pub enum CheckError {
    /// Writing rendered output failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A field name given in configuration is not a known check.
    #[error("Unknown field '{0}' (expected one of: title, display-doc-title, marked, pdfua, tagged, language, creator-tool, producer)")]
    UnknownField(String),

    /// A report could not be serialised.
    #[error("Failed to serialise report: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, CheckError>;
