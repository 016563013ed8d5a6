//! Pattern checks over the latin1 text of a document.
//!
//! Every check is a pure function of the document text. None of them parse
//! the object graph: each looks for one textual marker and classifies what it
//! finds, so a missing or mangled entry degrades to a "not set" style row
//! instead of an error.

use crate::report::{CheckResult, Field, Status};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Number of leading characters inspected for the `%PDF-x.y` header.
pub const SIGNATURE_WINDOW: usize = 8;

/// XMP extension-schema entry declaring the PDF/UA identification schema.
pub const PDFUA_SCHEMA_PREFIX: &str = "<pdfaSchema:prefix>pdfuaid</pdfaSchema:prefix>";

/// `rdf:li` left empty by authoring tools when no title was entered.
pub const EMPTY_TITLE_MARKER: &str = r#"<rdf:li xml:lang="x-default"/>"#;

static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| compile(r"%PDF-([1-3]\.[0-9])"));
static STRUCT_TREE_ROOT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"StructTreeRoot\s([0-9]*)\s([0-9]*)"));
static LANG: LazyLock<Regex> = LazyLock::new(|| compile(r"Lang(?:<([^>]*)>|\(([^)]*)\))"));
static MARKED: LazyLock<Regex> = LazyLock::new(|| compile(r"<</Marked (true|false)"));
static DC_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?s)<dc:title>.*?<rdf:Alt>(.*?)</rdf:Alt>.*?</dc:title>")
});
static RDF_LI: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?s)<rdf:li(?:\s[^>]*[^/>])?>(.*?)</rdf:li>"));
static VIEWER_DISPLAY_DOC_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?s)/ViewerPreferences.*?/DisplayDocTitle\s*(true|false)")
});
static DISPLAY_DOC_TITLE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"/DisplayDocTitle\s*(true|false)"));
static CREATOR_TOOL: LazyLock<XmpProperty> = LazyLock::new(|| XmpProperty::new("xmp:CreatorTool"));
static PRODUCER: LazyLock<XmpProperty> = LazyLock::new(|| XmpProperty::new("pdf:Producer"));

fn compile(pattern: &str) -> Regex {
    // Patterns are literals in this module; a failure here is a typo.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid check pattern {pattern:?}: {e}"))
}

// ── Signature ────────────────────────────────────────────────────────────────

/// Sniff the `%PDF-x.y` header within the first [`SIGNATURE_WINDOW`] chars.
///
/// Valid results carry the version (`"1.7"`). An invalid result stops the
/// pipeline for the document.
///
/// ```
/// # use pdfcheck::{checks, Status};
/// assert_eq!(checks::check_signature("%PDF-2.0\n").value, "2.0");
/// assert_eq!(checks::check_signature("GIF89a").status, Status::Invalid);
/// ```
pub fn check_signature(text: &str) -> CheckResult {
    let window: String = text.chars().take(SIGNATURE_WINDOW).collect();
    match SIGNATURE.captures(&window) {
        Some(caps) => CheckResult::valid(Field::Signature, &caps[1]),
        None => CheckResult::invalid(Field::Signature, "Not a valid PDF file"),
    }
}

// ── Tag structure ────────────────────────────────────────────────────────────

/// Looks for `StructTreeRoot <obj> <gen>`.
///
/// The object number of the reference is what ends up in the
/// `"Yes (N tags)"` text; it is shown as-is and is not a tag count.
pub fn check_tagged(text: &str) -> CheckResult {
    match STRUCT_TREE_ROOT.captures(text) {
        Some(caps) => CheckResult::valid(Field::Tagged, format!("Yes ({} tags)", &caps[1])),
        None => CheckResult::invalid(Field::Tagged, "No"),
    }
}

// ── Language ─────────────────────────────────────────────────────────────────

/// Reads `/Lang<…>` or `/Lang(…)`.
///
/// Content made only of hex digits is decoded pair-wise whichever delimiter
/// surrounds it; anything else is shown as written.
pub fn check_language(text: &str) -> CheckResult {
    let Some(caps) = LANG.captures(text) else {
        return CheckResult::invalid(Field::Language, "not set");
    };

    let value = match (caps.get(1), caps.get(2)) {
        (Some(body), _) => {
            decode_hex_string(body.as_str()).unwrap_or_else(|| body.as_str().to_string())
        }
        (None, Some(literal)) => decode_hex_string(literal.as_str())
            .unwrap_or_else(|| decode_text_bytes(&latin1_bytes(literal.as_str()))),
        (None, None) => String::new(),
    };

    CheckResult::valid(Field::Language, value)
}

/// Decode the body of a PDF hex string (`656E2D5553` → `en-US`).
///
/// An odd final digit is read as if followed by `0`. Returns `None` when the
/// body is empty or holds anything but hex digits, whitespace included.
///
/// ```
/// # use pdfcheck::checks::decode_hex_string;
/// assert_eq!(decode_hex_string("656E2D5553").as_deref(), Some("en-US"));
/// assert_eq!(decode_hex_string("en-US"), None);
/// assert_eq!(decode_hex_string("656E 2D"), None);
/// ```
pub fn decode_hex_string(body: &str) -> Option<String> {
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let mut digits = body.to_string();
    if digits.len() % 2 == 1 {
        digits.push('0');
    }
    let bytes = hex::decode(&digits).ok()?;
    Some(decode_text_bytes(&bytes))
}

/// PDF text strings are either PDFDocEncoding (read here as latin1) or
/// UTF-16BE prefixed with a `FE FF` byte-order mark.
fn decode_text_bytes(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => crate::document::latin1(bytes),
    }
}

/// Inverse of the latin1 view: chars above U+00FF cannot occur in document
/// text, anything else maps back to its byte.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')).collect()
}

// ── MarkInfo ─────────────────────────────────────────────────────────────────

/// Three-way classification of `<</Marked true|false`.
pub fn check_marked(text: &str) -> CheckResult {
    match MARKED.captures(text).map(|caps| caps[1].to_string()) {
        Some(flag) if flag == "true" => CheckResult::valid(Field::Marked, "True"),
        Some(_) => CheckResult::warning(Field::Marked, "False"),
        None => CheckResult::invalid(Field::Marked, "No"),
    }
}

// ── PDF/UA ───────────────────────────────────────────────────────────────────

/// Presence of the `pdfuaid` schema prefix. Its absence is only a warning:
/// the identifier is optional metadata.
pub fn check_pdfua(text: &str) -> CheckResult {
    if text.contains(PDFUA_SCHEMA_PREFIX) {
        CheckResult::valid(Field::PdfUa, "Yes")
    } else {
        CheckResult::warning(Field::PdfUa, "Not set")
    }
}

// ── Title ────────────────────────────────────────────────────────────────────

/// `dc:title` from the XMP packet.
///
/// The [`EMPTY_TITLE_MARKER`] anywhere in the `rdf:Alt` block wins over any
/// other text in it.
pub fn check_title(text: &str) -> CheckResult {
    let Some(caps) = DC_TITLE.captures(text) else {
        return CheckResult::invalid(Field::Title, "Not set");
    };
    let alt = caps.get(1).map_or("", |m| m.as_str());

    if alt.contains(EMPTY_TITLE_MARKER) {
        return CheckResult::warning(Field::Title, "Empty");
    }

    let raw = RDF_LI
        .captures(alt)
        .and_then(|li| li.get(1))
        .map_or(alt, |m| m.as_str());
    let title = xml_text(raw);

    if title.is_empty() {
        CheckResult::warning(Field::Title, "Empty")
    } else {
        CheckResult::unset(Field::Title, title)
    }
}

// ── DisplayDocTitle ──────────────────────────────────────────────────────────

/// `/DisplayDocTitle` inside `/ViewerPreferences`, or on its own when the
/// preferences dictionary is stored elsewhere.
pub fn check_display_doc_title(text: &str) -> CheckResult {
    let flag = VIEWER_DISPLAY_DOC_TITLE
        .captures(text)
        .or_else(|| DISPLAY_DOC_TITLE.captures(text))
        .map(|caps| caps[1].to_string());

    match flag.as_deref() {
        Some("true") => CheckResult::valid(Field::DisplayDocTitle, "Enabled"),
        Some(_) => CheckResult::warning(Field::DisplayDocTitle, "Disabled"),
        None => CheckResult::warning(Field::DisplayDocTitle, "Not configured"),
    }
}

// ── XMP tool properties ──────────────────────────────────────────────────────

/// A simple XMP property that may be serialised either as an element
/// (`<xmp:CreatorTool>Word</xmp:CreatorTool>`) or as an attribute of
/// `rdf:Description` (`xmp:CreatorTool="Word"`).
struct XmpProperty {
    element: Regex,
    attribute: Regex,
}

impl XmpProperty {
    fn new(name: &str) -> Self {
        let name = regex::escape(name);
        Self {
            element: compile(&format!(r"(?s)<{name}>(.*?)</{name}>")),
            attribute: compile(&format!(r#"{name}\s*=\s*(?:"([^"]*)"|'([^']*)')"#)),
        }
    }

    /// Trimmed, unescaped value; `None` when absent or blank.
    fn find(&self, text: &str) -> Option<String> {
        let from_element = self
            .element
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| xml_text(m.as_str()))
            .filter(|v| !v.is_empty());

        from_element.or_else(|| {
            self.attribute
                .captures(text)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| xml_text(m.as_str()))
                .filter(|v| !v.is_empty())
        })
    }
}

fn check_xmp_property(field: Field, property: &XmpProperty, text: &str) -> CheckResult {
    match property.find(text) {
        Some(value) => CheckResult::unset(field, value),
        None => CheckResult::warning(field, "Not set"),
    }
}

/// `xmp:CreatorTool`: the application that authored the document.
pub fn check_creator_tool(text: &str) -> CheckResult {
    check_xmp_property(Field::CreatorTool, &CREATOR_TOOL, text)
}

/// `pdf:Producer`: the library that wrote the PDF.
pub fn check_producer(text: &str) -> CheckResult {
    check_xmp_property(Field::Producer, &PRODUCER, text)
}

/// Trim and resolve XML entities; keeps the raw text if it does not unescape.
fn xml_text(raw: &str) -> String {
    let trimmed = raw.trim();
    quick_xml::escape::unescape(trimmed)
        .unwrap_or(Cow::Borrowed(trimmed))
        .trim()
        .to_string()
}

/// Run the check for `field` over `text`.
///
/// [`Field::Input`] is not a content check and yields a not-applicable row.
pub fn run(field: Field, text: &str) -> CheckResult {
    match field {
        Field::Signature => check_signature(text),
        Field::Title => check_title(text),
        Field::DisplayDocTitle => check_display_doc_title(text),
        Field::Marked => check_marked(text),
        Field::PdfUa => check_pdfua(text),
        Field::Tagged => check_tagged(text),
        Field::Language => check_language(text),
        Field::CreatorTool => check_creator_tool(text),
        Field::Producer => check_producer(text),
        Field::Input => CheckResult::new(Field::Input, Status::NotApplicable, "Not checked"),
    }
}
