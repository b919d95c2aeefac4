//! Human-readable colored text formatter.

use crate::finding::{FieldStatus, RunStatus, Severity, ValidationReport};
use colored::Colorize;

/// Formats a [`ValidationReport`] as human-readable, ANSI-colored text.
///
/// Sections rendered (in order):
/// 1. **Header**: document name and timestamp.
/// 2. **Fields**: one line per field with its status and committed value,
///    followed by the explanatory message when there is one.
/// 3. **Summary**: overall status and severity counts.
pub fn format(report: &ValidationReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}\n",
        format!("  Metadata: {}  ", report.document)
            .bold()
            .on_blue()
            .white()
    ));
    out.push_str(&format!("  Timestamp: {}\n\n", report.timestamp));

    out.push_str(&format!("{}\n", "Fields".bold().underline()));
    for result in &report.results {
        let badge = match (result.status, result.severity) {
            (FieldStatus::Ok, None) => "  OK ".green().bold().to_string(),
            (FieldStatus::Ok, Some(_)) => " SET ".cyan().bold().to_string(),
            (FieldStatus::AmbiguousResolved, _) => " AMBG".yellow().to_string(),
            (FieldStatus::Missing, Some(Severity::Info)) => " FILL".blue().to_string(),
            (FieldStatus::Missing, _) => " MISS".yellow().bold().to_string(),
            (FieldStatus::Empty, _) => "EMPTY".red().bold().to_string(),
            (FieldStatus::Invalid, _) => " BAD ".red().bold().to_string(),
        };

        let value = result.normalized_value.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "  [{badge}] {name:<20} {value}\n",
            name = result.field_name,
        ));
        if let Some(ref message) = result.message {
            out.push_str(&format!("          {}\n", message.dimmed()));
        }
    }
    out.push('\n');

    let status_str = match report.status {
        RunStatus::Passed => "PASSED".green().bold().to_string(),
        RunStatus::Warning => "WARNING".yellow().bold().to_string(),
        RunStatus::Failed => "FAILED".red().bold().to_string(),
    };

    let (errors, warnings, info) = report.count_by_severity();
    out.push_str(&format!(
        "Result: {status_str}  |  {errors} errors, {warnings} warnings, {info} info{}\n",
        if report.strict { "  (strict)" } else { "" },
    ));

    out
}
