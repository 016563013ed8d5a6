use crate::document::Heading;
use crate::CheckError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ── Field ─────────────────────────────────────────────────────────────────────

/// A property reported for a document.
///
/// Every variant except [`Field::Input`] corresponds to one check in the
/// extraction pipeline; `Input` labels the per-file rows produced before any
/// check runs (type rejection, read failure, size limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    /// `%PDF-x.y` header sniff.
    Signature,
    /// `dc:title` in the XMP packet.
    Title,
    /// `/DisplayDocTitle` viewer preference.
    DisplayDocTitle,
    /// `/Marked` entry of the MarkInfo dictionary.
    Marked,
    /// PDF/UA schema prefix in the XMP extension schemas.
    PdfUa,
    /// `StructTreeRoot` presence.
    Tagged,
    /// Document `/Lang`.
    Language,
    /// `xmp:CreatorTool`.
    CreatorTool,
    /// `pdf:Producer`.
    Producer,
    /// File-level outcome that is not a content check.
    Input,
}

impl Field {
    /// Content checks in the order they are run and displayed.
    pub const PIPELINE: [Field; 8] = [
        Field::Title,
        Field::DisplayDocTitle,
        Field::Marked,
        Field::PdfUa,
        Field::Tagged,
        Field::Language,
        Field::CreatorTool,
        Field::Producer,
    ];

    /// Human readable row label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Signature => "PDF Version",
            Field::Title => "Document Title",
            Field::DisplayDocTitle => "Display Document Title",
            Field::Marked => "Marked",
            Field::PdfUa => "PDF/UA identifier",
            Field::Tagged => "Tagged",
            Field::Language => "Language",
            Field::CreatorTool => "Creator Tool",
            Field::Producer => "Producer",
            Field::Input => "File",
        }
    }

    /// Anchor of the explanatory help section for this field, if any.
    pub fn help(self) -> Option<&'static str> {
        match self {
            Field::Title => Some("help-title"),
            Field::DisplayDocTitle => Some("help-display-title"),
            Field::Marked => Some("help-marked"),
            Field::PdfUa => Some("help-pdfua"),
            Field::Tagged => Some("help-tagged"),
            Field::Language => Some("help-language"),
            _ => None,
        }
    }

    /// Short name accepted by [`Field::from_str`].
    pub fn key(self) -> &'static str {
        match self {
            Field::Signature => "signature",
            Field::Title => "title",
            Field::DisplayDocTitle => "display-doc-title",
            Field::Marked => "marked",
            Field::PdfUa => "pdfua",
            Field::Tagged => "tagged",
            Field::Language => "language",
            Field::CreatorTool => "creator-tool",
            Field::Producer => "producer",
            Field::Input => "input",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = CheckError;

    /// Parses a pipeline field from its [`Field::key`], case-insensitively.
    /// `signature` and `input` are not selectable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Field::PIPELINE
            .into_iter()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| CheckError::UnknownField(s.to_string()))
    }
}

// ── Status / Style ───────────────────────────────────────────────────────────

/// Verdict of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Valid,
    Invalid,
    Warning,
    /// Informational value with no pass/fail verdict.
    Unset,
    /// The field was not part of the declared field set.
    NotApplicable,
}

/// Visual category a renderer attaches to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Title,
    Default,
    Success,
    Warning,
    Failure,
}

impl Style {
    /// CSS class name used by the HTML renderer.
    pub fn class_name(self) -> &'static str {
        match self {
            Style::Title => "title",
            Style::Default => "default",
            Style::Success => "success",
            Style::Warning => "warning",
            Style::Failure => "failure",
        }
    }
}

// ── CheckResult ──────────────────────────────────────────────────────────────

/// Outcome of one check over a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub field: Field,
    pub status: Status,
    /// Text shown to the user (`"Yes (12 tags)"`, `"en-US"`, `"Not set"`, …).
    pub value: String,
    /// Help anchor, copied from [`Field::help`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

impl CheckResult {
    pub fn new(field: Field, status: Status, value: impl Into<String>) -> Self {
        Self {
            field,
            status,
            value: value.into(),
            help: field.help(),
        }
    }

    pub fn valid(field: Field, value: impl Into<String>) -> Self {
        Self::new(field, Status::Valid, value)
    }

    pub fn invalid(field: Field, value: impl Into<String>) -> Self {
        Self::new(field, Status::Invalid, value)
    }

    pub fn warning(field: Field, value: impl Into<String>) -> Self {
        Self::new(field, Status::Warning, value)
    }

    pub fn unset(field: Field, value: impl Into<String>) -> Self {
        Self::new(field, Status::Unset, value)
    }

    /// Display category for this row. The version row is always neutral,
    /// whether or not the header matched.
    pub fn style(&self) -> Style {
        if self.field == Field::Signature {
            return Style::Default;
        }
        match self.status {
            Status::Valid => Style::Success,
            Status::Invalid => Style::Failure,
            Status::Warning => Style::Warning,
            Status::Unset | Status::NotApplicable => Style::Default,
        }
    }
}

// ── DocumentReport ───────────────────────────────────────────────────────────

/// Heading plus ordered check rows for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    pub heading: Heading,
    pub results: Vec<CheckResult>,
}

impl DocumentReport {
    pub fn new(heading: Heading) -> Self {
        Self {
            heading,
            results: Vec::new(),
        }
    }

    /// The result for `field`, if it was produced.
    pub fn get(&self, field: Field) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.field == field)
    }

    /// The extracted version when the signature check passed.
    pub fn version(&self) -> Option<&str> {
        self.get(Field::Signature)
            .filter(|r| r.status == Status::Valid)
            .map(|r| r.value.as_str())
    }
}
