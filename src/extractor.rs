use crate::document::{Heading, RawDocument};
use crate::report::{CheckResult, DocumentReport, Field, Status};
use crate::{checks, CheckerConfig};
use tracing::debug;

// ── Extractor ────────────────────────────────────────────────────────────────

/// Runs the ordered check pipeline over one document.
///
/// ```
/// use pdfcheck::{CheckerConfig, Extractor, Field};
///
/// let cfg = CheckerConfig {
///     fields: vec![Field::Language, Field::Marked],
///     ..Default::default()
/// };
/// let rows = Extractor::with_config(cfg).check_text("%PDF-1.4\n/Lang(fr)");
///
/// // Signature first, then the selected fields in pipeline order.
/// let order: Vec<Field> = rows.iter().map(|r| r.field).collect();
/// assert_eq!(order, [Field::Signature, Field::Marked, Field::Language]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: CheckerConfig,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Fields that will run after the signature, in pipeline order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::PIPELINE
            .into_iter()
            .filter(|field| self.config.fields.contains(field))
    }

    /// Build the full report for `document`, the `ordinal`-th file of its
    /// batch.
    pub fn extract(&self, ordinal: usize, document: &RawDocument) -> DocumentReport {
        let mut report = DocumentReport::new(Heading::new(ordinal, document.name(), document.size()));
        report.results = self.check_text(document.text());
        report
    }

    /// Signature check followed by every selected field check.
    ///
    /// An invalid signature short-circuits: the result then holds that single
    /// row.
    pub fn check_text(&self, text: &str) -> Vec<CheckResult> {
        let signature = checks::check_signature(text);
        debug!(version = %signature.value, status = ?signature.status, "signature");

        if signature.status != Status::Valid {
            return vec![signature];
        }

        let mut results = Vec::with_capacity(1 + self.config.fields.len());
        results.push(signature);
        for field in self.fields() {
            let result = checks::run(field, text);
            debug!(field = field.key(), status = ?result.status, value = %result.value, "check");
            results.push(result);
        }
        results
    }

    /// Run one check on its own. Fields outside the declared set come back
    /// as [`Status::NotApplicable`].
    pub fn check_field(&self, field: Field, text: &str) -> CheckResult {
        if field == Field::Signature || self.config.fields.contains(&field) {
            checks::run(field, text)
        } else {
            CheckResult::new(field, Status::NotApplicable, "Not checked")
        }
    }
}
