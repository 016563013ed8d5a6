use crate::document::{is_pdf_file, Heading, RawDocument};
use crate::extractor::Extractor;
use crate::report::{CheckResult, DocumentReport, Field};
use crate::{CheckerConfig, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ── FileSource ───────────────────────────────────────────────────────────────

/// A file handed to a batch: a name, a declared size and readable bytes.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// File name shown in the report heading.
    fn name(&self) -> &str;

    /// Declared size in bytes.
    fn size(&self) -> u64;

    /// Declared media type, if the source knows one.
    fn media_type(&self) -> Option<&str> {
        None
    }

    /// Read the whole content.
    async fn read(&self) -> io::Result<Vec<u8>>;
}

#[async_trait]
impl<T: FileSource + ?Sized> FileSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }

    fn media_type(&self) -> Option<&str> {
        (**self).media_type()
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        (**self).read().await
    }
}

/// A file on the local file system.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl LocalFile {
    /// Prepare `path` for reading. A file whose metadata cannot be read gets
    /// size 0; the error then surfaces from [`FileSource::read`].
    pub async fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let size = tokio::fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name, size }
    }
}

#[async_trait]
impl FileSource for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// An in-memory file, e.g. bytes received from an upload.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    media_type: Option<String>,
    data: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            data: data.into(),
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

#[async_trait]
impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

// ── ReportSink ───────────────────────────────────────────────────────────────

/// The output area a batch writes into.
///
/// A batch calls [`clear`](ReportSink::clear) once before the first file and
/// then [`append`](ReportSink::append) once per file, in input order.
pub trait ReportSink {
    fn clear(&mut self) -> Result<()>;
    fn append(&mut self, report: DocumentReport) -> Result<()>;
}

impl ReportSink for Vec<DocumentReport> {
    fn clear(&mut self) -> Result<()> {
        Vec::clear(self);
        Ok(())
    }

    fn append(&mut self, report: DocumentReport) -> Result<()> {
        self.push(report);
        Ok(())
    }
}

// ── BatchProcessor ───────────────────────────────────────────────────────────

/// Counts of per-file outcomes for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files whose header matched and whose fields were checked.
    pub checked: usize,
    /// Files read successfully but without a `%PDF-x.y` header.
    pub invalid: usize,
    /// Files not read because of their type or size.
    pub rejected: usize,
    /// Files whose read failed.
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.checked + self.invalid + self.rejected + self.failed
    }

    /// `true` when every file was checked.
    pub fn all_checked(&self) -> bool {
        self.checked == self.total()
    }
}

/// Processes a collection of files strictly in order.
///
/// File N+1 is read only after the report of file N has been appended to the
/// sink. Nothing that happens to one file stops the batch.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> pdfcheck::Result<()> {
/// use pdfcheck::{BatchProcessor, DocumentReport, MemoryFile};
///
/// let files = [
///     MemoryFile::new("a.pdf", b"%PDF-1.7\n".to_vec()),
///     MemoryFile::new("b.txt", b"hello".to_vec()),
/// ];
/// let mut reports: Vec<DocumentReport> = Vec::new();
/// let summary = BatchProcessor::default().process(&files, &mut reports).await?;
///
/// assert_eq!(reports.len(), 2);
/// assert_eq!((summary.checked, summary.rejected), (1, 1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    extractor: Extractor,
}

impl BatchProcessor {
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            extractor: Extractor::with_config(config),
        }
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Clear `sink`, then check every file in order, appending one report
    /// per file.
    ///
    /// Only a failing sink aborts the batch.
    pub async fn process<F, S>(&self, files: &[F], sink: &mut S) -> Result<BatchSummary>
    where
        F: FileSource,
        S: ReportSink + ?Sized,
    {
        info!(files = files.len(), "starting batch");
        sink.clear()?;

        let mut summary = BatchSummary::default();
        for (index, file) in files.iter().enumerate() {
            let report = self.process_file(index + 1, file, &mut summary).await;
            sink.append(report)?;
        }

        info!(
            checked = summary.checked,
            invalid = summary.invalid,
            rejected = summary.rejected,
            failed = summary.failed,
            "batch finished"
        );
        Ok(summary)
    }

    async fn process_file<F: FileSource + ?Sized>(
        &self,
        ordinal: usize,
        file: &F,
        summary: &mut BatchSummary,
    ) -> DocumentReport {
        let config = self.extractor.config();
        let name = file.name();
        let mut report = DocumentReport::new(Heading::new(ordinal, name, file.size()));

        if config.reject_non_pdf && !is_pdf_file(name, file.media_type()) {
            warn!(file = name, "rejected: not a PDF file");
            report.results.push(CheckResult::invalid(Field::Input, "Not a PDF file"));
            summary.rejected += 1;
            return report;
        }

        if let Some(rejection) = self.size_rejection(file.size()) {
            warn!(file = name, size = file.size(), "rejected: over size limit");
            report.results.push(rejection);
            summary.rejected += 1;
            return report;
        }

        let bytes = match file.read().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = name, error = %e, "read failed");
                report
                    .results
                    .push(CheckResult::invalid(Field::Input, format!("Could not read file: {e}")));
                summary.failed += 1;
                return report;
            }
        };

        // The declared size may be stale or unknown.
        if let Some(rejection) = self.size_rejection(bytes.len() as u64) {
            warn!(file = name, size = bytes.len(), "rejected: over size limit");
            report.results.push(rejection);
            summary.rejected += 1;
            return report;
        }

        debug!(file = name, bytes = bytes.len(), "read complete");
        let document = RawDocument::new(name, bytes);
        report.results = self.extractor.check_text(document.text());

        if report.version().is_some() {
            summary.checked += 1;
        } else {
            summary.invalid += 1;
        }
        info!(file = name, version = ?report.version(), rows = report.results.len(), "checked");
        report
    }

    fn size_rejection(&self, size: u64) -> Option<CheckResult> {
        match self.extractor.config().max_file_size {
            Some(max) if size > max => Some(CheckResult::invalid(
                Field::Input,
                "File exceeds the configured maximum size",
            )),
            _ => None,
        }
    }
}
