//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document with the overall status, a
//! severity summary, and every field result.

use crate::finding::{RunStatus, ValidationReport, ValidationResult};

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    document: &'a str,
    timestamp: &'a str,
    status: RunStatus,
    strict: bool,
    passed: bool,
    summary: Summary,
    results: &'a [ValidationResult],
}

#[derive(serde::Serialize)]
struct Summary {
    errors: usize,
    warnings: usize,
    info: usize,
}

fn build(report: &ValidationReport) -> JsonOutput<'_> {
    let (errors, warnings, info) = report.count_by_severity();
    JsonOutput {
        document: &report.document,
        timestamp: &report.timestamp,
        status: report.status,
        strict: report.strict,
        passed: report.passed,
        summary: Summary {
            errors,
            warnings,
            info,
        },
        results: &report.results,
    }
}

/// Formats a [`ValidationReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid data).
pub fn format(report: &ValidationReport) -> String {
    serde_json::to_string_pretty(&build(report)).expect("JSON serialization failed")
}

/// Formats several reports as one JSON array, in the order given.
pub fn format_many(reports: &[ValidationReport]) -> String {
    let outputs: Vec<JsonOutput<'_>> = reports.iter().map(build).collect();
    serde_json::to_string_pretty(&outputs).expect("JSON serialization failed")
}
