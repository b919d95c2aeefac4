//! Rendering of [`ValidationReport`]s.
//!
//! Every format carries the same content: the document path, the overall
//! [`RunStatus`](crate::finding::RunStatus), and one entry per checked field
//! with its status, the value that would be committed, and the message
//! explaining any default, normalization or assumed day/month order.
//!
//! | Format | Module | Shape |
//! |--------|--------|-------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | One badge line per field, then a result line with severity counts |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Object per document (array for `check`) with a `summary` block |
//! | [`Sarif`](OutputFormat::Sarif)   | [`sarif`]  | One result per field that carries a severity; clean `Ok` fields are omitted |
//!
//! Severity maps to SARIF levels as error → `error`, warning → `warning`
//! and info (defaults filled, dates normalized or assumed) → `note`.

pub mod json;
pub mod pretty;
pub mod sarif;

use crate::finding::ValidationReport;

/// Report format selected with `--format`.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored per-field listing for the terminal.
    Pretty,
    /// One JSON object per document, for scripts.
    Json,
    /// [SARIF 2.1.0](https://sarifweb.azurewebsites.net/), for code-scanning uploads in CI.
    Sarif,
}

/// Renders one document's report in the requested [`OutputFormat`].
///
/// Batch runs over several documents call [`json::format_many`] or
/// [`sarif::format`] directly so that all documents share one output.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use metadata_validator::config::Config;
/// use metadata_validator::output::{format_report, OutputFormat};
/// use metadata_validator::validator::{RunContext, Validator};
///
/// let validator = Validator::new(Config::default()).unwrap();
/// let fields = HashMap::from([("Created".to_string(), "2025.07.05".to_string())]);
/// let report = validator.validate("notes.md", &fields, &RunContext::today());
///
/// let json = format_report(&report, &OutputFormat::Json);
/// assert!(json.contains("\"normalized_value\": \"2025-07-05\""));
/// ```
pub fn format_report(report: &ValidationReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format(report),
        OutputFormat::Json => json::format(report),
        OutputFormat::Sarif => sarif::format(std::slice::from_ref(report)),
    }
}
