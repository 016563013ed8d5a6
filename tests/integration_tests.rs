// Integration tests for pdfcheck.
//
// Documents are assembled in memory from the textual fragments the checks
// look for; no binary fixtures are needed.

use async_trait::async_trait;
use pdfcheck::{
    checks, BatchProcessor, CheckError, CheckResult, CheckerConfig, DocumentReport, Extractor,
    Field, FileSource, LocalFile, MemoryFile, RawDocument, ReportSink, Status, Style,
};
use std::io;
use std::sync::{Arc, Mutex};

const XMP: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
<rdf:Description rdf:about="" xmlns:pdf="http://ns.adobe.com/pdf/1.3/">
  <pdf:Producer>Acme PDF Library 9.1</pdf:Producer>
  <xmp:CreatorTool>Writer 7.4</xmp:CreatorTool>
  <dc:title>
    <rdf:Alt>
      <rdf:li xml:lang="x-default">Quarterly Accessibility Review</rdf:li>
    </rdf:Alt>
  </dc:title>
  <pdfaExtension:schemas><rdf:Bag><rdf:li rdf:parseType="Resource">
    <pdfaSchema:prefix>pdfuaid</pdfaSchema:prefix>
  </rdf:li></rdf:Bag></pdfaExtension:schemas>
</rdf:Description>
</rdf:RDF>
</x:xmpmeta>"#;

fn accessible_pdf() -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n".to_vec();
    bytes.extend_from_slice(
        b"1 0 obj\n<</Type/Catalog/Pages 2 0 R/Lang<656E2D5553>/MarkInfo<</Marked true>>\
          /StructTreeRoot 12 0 R/ViewerPreferences<</DisplayDocTitle true>>/Metadata 9 0 R>>\nendobj\n",
    );
    bytes.extend_from_slice(b"9 0 obj\n<</Type/Metadata/Subtype/XML>>\nstream\n");
    bytes.extend_from_slice(XMP.as_bytes());
    bytes.extend_from_slice(b"\nendstream\nendobj\n%%EOF\n");
    bytes
}

fn values(report: &DocumentReport) -> Vec<(Field, Status, String)> {
    report
        .results
        .iter()
        .map(|r| (r.field, r.status, r.value.clone()))
        .collect()
}

// ── Extraction scenarios ─────────────────────────────────────────────────────

#[test]
fn fully_tagged_document() {
    let report = Extractor::new().extract(1, &RawDocument::new("review.pdf", accessible_pdf()));

    assert_eq!(
        values(&report),
        vec![
            (Field::Signature, Status::Valid, "1.7".to_string()),
            (Field::Title, Status::Unset, "Quarterly Accessibility Review".to_string()),
            (Field::DisplayDocTitle, Status::Valid, "Enabled".to_string()),
            (Field::Marked, Status::Valid, "True".to_string()),
            (Field::PdfUa, Status::Valid, "Yes".to_string()),
            (Field::Tagged, Status::Valid, "Yes (12 tags)".to_string()),
            (Field::Language, Status::Valid, "en-US".to_string()),
            (Field::CreatorTool, Status::Unset, "Writer 7.4".to_string()),
            (Field::Producer, Status::Unset, "Acme PDF Library 9.1".to_string()),
        ]
    );
}

#[test]
fn marked_pdfua_and_tags_in_a_minimal_file() {
    let text = "%PDF-1.7\n<</Marked true>>...<pdfaSchema:prefix>pdfuaid</pdfaSchema:prefix>...StructTreeRoot 12 0...";
    let report = Extractor::new().extract(1, &RawDocument::new("min.pdf", text.as_bytes().to_vec()));

    assert_eq!(report.version(), Some("1.7"));
    let marked = report.get(Field::Marked).unwrap();
    assert_eq!((marked.status, marked.value.as_str()), (Status::Valid, "True"));
    let pdfua = report.get(Field::PdfUa).unwrap();
    assert_eq!((pdfua.status, pdfua.value.as_str()), (Status::Valid, "Yes"));
    let tagged = report.get(Field::Tagged).unwrap();
    assert_eq!((tagged.status, tagged.value.as_str()), (Status::Valid, "Yes (12 tags)"));

    // Rows keep pipeline order.
    let position = |f: Field| report.results.iter().position(|r| r.field == f).unwrap();
    assert!(position(Field::Marked) < position(Field::PdfUa));
    assert!(position(Field::PdfUa) < position(Field::Tagged));
}

#[test]
fn untagged_document_degrades_to_not_set_rows() {
    let report = Extractor::new().extract(1, &RawDocument::new("plain.pdf", b"%PDF-1.4\n1 0 obj<<>>endobj".to_vec()));

    assert_eq!(report.results.len(), 1 + Field::PIPELINE.len());
    assert_eq!(report.get(Field::Title).unwrap().value, "Not set");
    assert_eq!(report.get(Field::DisplayDocTitle).unwrap().value, "Not configured");
    assert_eq!(report.get(Field::Marked).unwrap().value, "No");
    assert_eq!(report.get(Field::PdfUa).unwrap().value, "Not set");
    assert_eq!(report.get(Field::Tagged).unwrap().value, "No");
    assert_eq!(report.get(Field::Language).unwrap().value, "not set");
    assert_eq!(report.get(Field::CreatorTool).unwrap().value, "Not set");
    assert_eq!(report.get(Field::Producer).unwrap().value, "Not set");
}

#[test]
fn non_pdf_bytes_yield_only_the_signature_row() {
    let doc = RawDocument::new("fake.pdf", b"PK\x03\x04<</Marked true>>/StructTreeRoot 1 0 R".to_vec());
    let report = Extractor::new().extract(1, &doc);

    assert_eq!(report.results.len(), 1);
    let row = &report.results[0];
    assert_eq!(row.field, Field::Signature);
    assert_eq!(row.status, Status::Invalid);
    assert_eq!(row.value, "Not a valid PDF file");
    assert_eq!(row.style(), Style::Default);
}

#[test]
fn binary_bytes_do_not_disturb_the_checks() {
    let mut bytes = b"%PDF-2.0\n".to_vec();
    bytes.extend((0u8..=255).cycle().take(4096));
    bytes.extend_from_slice(b"<</Marked false>>");
    bytes.extend((0u8..=255).rev());
    let report = Extractor::new().extract(1, &RawDocument::new("bin.pdf", bytes));

    assert_eq!(report.version(), Some("2.0"));
    let marked = report.get(Field::Marked).unwrap();
    assert_eq!((marked.status, marked.value.as_str()), (Status::Warning, "False"));
}

#[test]
fn empty_title_marker_wins_over_other_text() {
    let text = r#"%PDF-1.6
<dc:title><rdf:Alt><rdf:li xml:lang="de">Bericht</rdf:li><rdf:li xml:lang="x-default"/></rdf:Alt></dc:title>"#;
    let title = Extractor::new().check_field(Field::Title, text);
    assert_eq!((title.status, title.value.as_str()), (Status::Warning, "Empty"));
}

#[test]
fn marked_classifier_is_exhaustive() {
    for (text, expected) in [
        ("<</Marked true>>", (Status::Valid, "True")),
        ("<</Marked false>>", (Status::Warning, "False")),
        ("<</Marked True>>", (Status::Invalid, "No")),
        ("<</Marked  true>>", (Status::Invalid, "No")),
        ("", (Status::Invalid, "No")),
    ] {
        let result = checks::check_marked(text);
        assert_eq!((result.status, result.value.as_str()), expected, "{text:?}");
    }
}

#[test]
fn hex_decoding_is_pairwise() {
    let decoded = checks::decode_hex_string("656E2D5553").unwrap();
    assert_eq!(decoded, "en-US");
    assert_eq!(decoded.chars().count(), "656E2D5553".len() / 2);
}

#[test]
fn language_forms_end_to_end() {
    let cases = [
        ("/Lang(656E2D5553)", "en-US"),
        ("/Lang(en-US)", "en-US"),
        ("/Lang<656E 2D>", "656E 2D"),
    ];
    for (lang, expected) in cases {
        let text = format!("%PDF-1.7\n1 0 obj\n<</Type/Catalog{lang}>>\nendobj\n%%EOF");
        let doc = RawDocument::new("lang.pdf", text.into_bytes());
        let report = Extractor::new().extract(1, &doc);
        let row = report.get(Field::Language).unwrap();
        assert_eq!((row.status, row.value.as_str()), (Status::Valid, expected), "{lang}");
    }
}

// ── Batches ──────────────────────────────────────────────────────────────────

/// Sink and sources sharing one event log, to observe interleaving.
#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct LoggedFile {
    inner: MemoryFile,
    log: Log,
}

#[async_trait]
impl FileSource for LoggedFile {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn size(&self) -> u64 {
        self.inner.size()
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        self.log.push(format!("read {}", self.name()));
        tokio::task::yield_now().await;
        self.inner.read().await
    }
}

struct LoggedSink {
    reports: Vec<DocumentReport>,
    log: Log,
}

impl ReportSink for LoggedSink {
    fn clear(&mut self) -> pdfcheck::Result<()> {
        self.log.push("clear".into());
        self.reports.clear();
        Ok(())
    }

    fn append(&mut self, report: DocumentReport) -> pdfcheck::Result<()> {
        self.log.push(format!("append {}", report.heading.name));
        self.reports.push(report);
        Ok(())
    }
}

#[tokio::test]
async fn files_are_reported_in_input_order_without_interleaving() {
    let log = Log::default();
    let files: Vec<LoggedFile> = ["a.pdf", "b.pdf", "c.pdf"]
        .into_iter()
        .map(|name| LoggedFile {
            inner: MemoryFile::new(name, accessible_pdf()),
            log: log.clone(),
        })
        .collect();
    let mut sink = LoggedSink {
        reports: Vec::new(),
        log: log.clone(),
    };

    let summary = BatchProcessor::default().process(&files, &mut sink).await.unwrap();

    assert_eq!(summary.checked, 3);
    assert_eq!(
        log.events(),
        ["clear", "read a.pdf", "append a.pdf", "read b.pdf", "append b.pdf", "read c.pdf", "append c.pdf"]
    );
    let ordinals: Vec<usize> = sink.reports.iter().map(|r| r.heading.ordinal).collect();
    assert_eq!(ordinals, [1, 2, 3]);
}

#[tokio::test]
async fn sink_is_cleared_at_batch_start() {
    let mut reports: Vec<DocumentReport> = Vec::new();
    let processor = BatchProcessor::default();
    processor
        .process(&[MemoryFile::new("old.pdf", b"%PDF-1.3".to_vec())], &mut reports)
        .await
        .unwrap();
    processor
        .process(&[MemoryFile::new("new.pdf", b"%PDF-1.3".to_vec())], &mut reports)
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].heading.name, "new.pdf");
}

#[tokio::test]
async fn non_pdf_files_are_rejected_without_stopping_the_batch() {
    let files = [
        MemoryFile::new("notes.txt", b"%PDF-1.7 pretending".to_vec()),
        MemoryFile::new("scan", accessible_pdf()).with_media_type("application/pdf"),
    ];
    let mut reports: Vec<DocumentReport> = Vec::new();
    let summary = BatchProcessor::default().process(&files, &mut reports).await.unwrap();

    assert_eq!((summary.rejected, summary.checked), (1, 1));
    assert!(!summary.all_checked());
    assert_eq!(reports[0].heading.extension, "TXT");
    assert_eq!(
        reports[0].results,
        vec![CheckResult::invalid(Field::Input, "Not a PDF file")]
    );
    assert_eq!(reports[0].results[0].style(), Style::Failure);
    assert_eq!(reports[1].version(), Some("1.7"));
}

#[tokio::test]
async fn allow_any_type_inspects_every_file() {
    let config = CheckerConfig {
        reject_non_pdf: false,
        ..Default::default()
    };
    let files = [MemoryFile::new("document.bin", accessible_pdf())];
    let mut reports: Vec<DocumentReport> = Vec::new();
    BatchProcessor::new(config).process(&files, &mut reports).await.unwrap();

    assert_eq!(reports[0].version(), Some("1.7"));
}

#[tokio::test]
async fn invalid_signature_is_counted_separately() {
    let files = [MemoryFile::new("broken.pdf", b"<html></html>".to_vec())];
    let mut reports: Vec<DocumentReport> = Vec::new();
    let summary = BatchProcessor::default().process(&files, &mut reports).await.unwrap();

    assert_eq!(summary.invalid, 1);
    assert_eq!(reports[0].results.len(), 1);
    assert_eq!(reports[0].results[0].value, "Not a valid PDF file");
}

struct Unreadable;

#[async_trait]
impl FileSource for Unreadable {
    fn name(&self) -> &str {
        "locked.pdf"
    }

    fn size(&self) -> u64 {
        10
    }

    async fn read(&self) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }
}

#[tokio::test]
async fn read_failure_becomes_a_row_and_the_batch_continues() {
    let files: Vec<Box<dyn FileSource>> = vec![
        Box::new(Unreadable),
        Box::new(MemoryFile::new("ok.pdf", accessible_pdf())),
    ];
    let mut reports: Vec<DocumentReport> = Vec::new();
    let summary = BatchProcessor::default().process(&files, &mut reports).await.unwrap();

    assert_eq!((summary.failed, summary.checked), (1, 1));
    let row = &reports[0].results[0];
    assert_eq!(row.field, Field::Input);
    assert_eq!(row.status, Status::Invalid);
    assert!(row.value.starts_with("Could not read file: "), "{}", row.value);
    assert_eq!(reports[1].heading.ordinal, 2);
}

#[tokio::test]
async fn oversized_files_are_not_read() {
    let config = CheckerConfig {
        max_file_size: Some(16),
        ..Default::default()
    };
    let files = [
        MemoryFile::new("big.pdf", accessible_pdf()),
        MemoryFile::new("tiny.pdf", b"%PDF-1.0".to_vec()),
    ];
    let mut reports: Vec<DocumentReport> = Vec::new();
    let summary = BatchProcessor::new(config).process(&files, &mut reports).await.unwrap();

    assert_eq!((summary.rejected, summary.checked), (1, 1));
    assert_eq!(reports[0].results[0].value, "File exceeds the configured maximum size");
}

#[tokio::test]
async fn local_files_are_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Review.PDF");
    std::fs::write(&path, accessible_pdf()).unwrap();
    let missing = dir.path().join("missing.pdf");

    let files = [LocalFile::open(&path).await, LocalFile::open(&missing).await];
    let mut reports: Vec<DocumentReport> = Vec::new();
    let summary = BatchProcessor::default().process(&files, &mut reports).await.unwrap();

    assert_eq!((summary.checked, summary.failed), (1, 1));
    assert_eq!(reports[0].heading.name, "Review.PDF");
    assert_eq!(reports[0].heading.size, accessible_pdf().len() as u64);
    assert_eq!(reports[0].get(Field::Language).unwrap().value, "en-US");
    assert_eq!(reports[1].heading.size, 0);
}

// ── Configuration and errors ─────────────────────────────────────────────────

#[test]
fn default_config_runs_every_check() {
    let cfg = CheckerConfig::default();
    assert_eq!(cfg.fields, Field::PIPELINE.to_vec());
    assert!(cfg.reject_non_pdf);
    assert!(cfg.max_file_size.is_none());
}

#[test]
fn error_display_is_non_empty() {
    let errors = [
        CheckError::IoError(io::Error::new(io::ErrorKind::BrokenPipe, "pipe")),
        CheckError::UnknownField("colour".into()),
    ];
    for e in &errors {
        assert!(!e.to_string().is_empty(), "empty display for {e:?}");
    }
    assert!("colour".parse::<Field>().unwrap_err().to_string().contains("colour"));
}
