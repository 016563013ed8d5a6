//! Turning reports into display fragments.

use crate::batch::ReportSink;
use crate::report::{CheckResult, DocumentReport, Field, Status, Style};
use crate::Result;
use quick_xml::escape::escape;
use std::io::Write;

/// Maps a [`DocumentReport`] to one display fragment.
pub trait Renderer {
    fn render(&self, report: &DocumentReport) -> Result<String>;
}

// ── Text ─────────────────────────────────────────────────────────────────────

/// Terminal output, one line per row.
///
/// ```text
/// 1. report.pdf [PDF - 236 KB]
///    PDF Version: 1.7
///  ✅ Tagged: Yes (12 tags)
///  ⚠️ PDF/UA identifier: Not set
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    fn marker(style: Style) -> &'static str {
        match style {
            Style::Success => "✅",
            Style::Warning => "⚠️",
            Style::Failure => "❌",
            Style::Default | Style::Title => "  ",
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&self, report: &DocumentReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&format!("{}\n", report.heading));
        for row in &report.results {
            let marker = Self::marker(row.style());
            if is_bare(row) {
                out.push_str(&format!(" {marker} {}\n", row.value));
            } else {
                out.push_str(&format!(" {marker} {}: {}\n", row.field.label(), row.value));
            }
        }
        Ok(out)
    }
}

// ── HTML ─────────────────────────────────────────────────────────────────────

/// `<p class="flag …">` fragments for embedding in a report page. Help
/// links point at `#help-…` anchors the hosting page provides.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn label(row: &CheckResult) -> String {
        let label = escape(row.field.label());
        match row.help {
            Some(anchor) => format!(
                "<span>{label} <a href=\"#{anchor}\" class=\"more-info\" \
                 aria-label=\"more information on this check\" \
                 title=\"more information on this check\">i</a></span>"
            ),
            None if row.field == Field::Signature => format!("<span>{label}:</span>"),
            None => format!("<span>{label}</span>"),
        }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, report: &DocumentReport) -> Result<String> {
        let heading = &report.heading;
        let mut out = String::new();
        out.push_str(&format!(
            "<p class=\"flag {}\">{}. {} <small>{}</small></p>\n",
            Style::Title.class_name(),
            heading.ordinal,
            escape(&heading.name),
            escape(&heading.label()),
        ));

        for row in &report.results {
            let value = escape(&row.value);
            let body = if is_bare(row) {
                format!("<strong>{value}</strong>")
            } else {
                format!("{} <strong>{value}</strong>", Self::label(row))
            };
            out.push_str(&format!("<p class=\"flag {}\">{body}</p>\n", row.style().class_name()));
        }
        Ok(out)
    }
}

// ── JSON ─────────────────────────────────────────────────────────────────────

/// One JSON object per report, newline terminated.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, report: &DocumentReport) -> Result<String> {
        let mut line = serde_json::to_string(report)?;
        line.push('\n');
        Ok(line)
    }
}

/// File-level rows and the failed header sniff are shown without a label.
fn is_bare(row: &CheckResult) -> bool {
    row.field == Field::Input || (row.field == Field::Signature && row.status != Status::Valid)
}

// ── RenderSink ───────────────────────────────────────────────────────────────

/// A [`ReportSink`] that renders each report as it arrives and writes it
/// out immediately.
///
/// A stream cannot take back what it has written, so `clear` only flushes.
pub struct RenderSink<W: Write> {
    renderer: Box<dyn Renderer + Send>,
    out: W,
}

impl<W: Write> RenderSink<W> {
    pub fn new(renderer: Box<dyn Renderer + Send>, out: W) -> Self {
        Self { renderer, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for RenderSink<W> {
    fn clear(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn append(&mut self, report: DocumentReport) -> Result<()> {
        let fragment = self.renderer.render(&report)?;
        self.out.write_all(fragment.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
