//! SARIF 2.1.0 formatter.
//!
//! Every result that carries a severity becomes a SARIF result located in
//! its document. Several reports can share one run, which is how the batch
//! `check` command publishes a whole directory at once.

use crate::finding::{FieldStatus, Severity, ValidationReport, ValidationResult};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::{BTreeMap, BTreeSet};

fn rule_id(result: &ValidationResult) -> &'static str {
    match (result.error, result.status) {
        (Some(kind), _) => kind.rule_id(),
        (None, FieldStatus::AmbiguousResolved) => "metadata/ambiguous-date-assumed",
        (None, _) => "metadata/value-updated",
    }
}

pub fn format(reports: &[ValidationReport]) -> String {
    let findings: Vec<(&ValidationReport, &ValidationResult, Severity)> = reports
        .iter()
        .flat_map(|report| {
            report
                .results
                .iter()
                .filter_map(move |r| r.severity.map(|s| (report, r, s)))
        })
        .collect();

    // Sorted so rule indices are stable across runs.
    let rule_ids: BTreeSet<&str> = findings.iter().map(|(_, r, _)| rule_id(r)).collect();
    let rule_index: BTreeMap<&str, i64> = rule_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i as i64))
        .collect();

    let rules: Vec<ReportingDescriptor> = rule_ids
        .iter()
        .map(|id| {
            let mut rule = ReportingDescriptor::builder().id(id.to_string()).build();
            rule.short_description = Some(
                MultiformatMessageString::builder()
                    .text(id.trim_start_matches("metadata/").replace('-', " "))
                    .build(),
            );
            rule
        })
        .collect();

    let results: Vec<SarifResult> = findings
        .iter()
        .map(|(report, r, severity)| {
            let level = match severity {
                Severity::Error => ResultLevel::Error,
                Severity::Warning => ResultLevel::Warning,
                Severity::Info => ResultLevel::Note,
            };
            let text = r
                .message
                .clone()
                .unwrap_or_else(|| format!("{}: {}", r.field_name, r.status));

            let mut result = SarifResult::builder()
                .message(Message::builder().text(text).build())
                .build();
            let id = rule_id(r);
            result.rule_id = Some(id.to_string());
            result.level = Some(level);
            result.rule_index = rule_index.get(id).copied();

            let uri = report.document.replace('\\', "/");
            let mut location = Location::builder().build();
            let mut physical = PhysicalLocation::builder().build();
            physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());
            location.physical_location = Some(physical);
            result.locations = Some(vec![location]);

            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("metadata-validator")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();
    let run = Run::builder().tool(tool).results(results).build();
    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}
