//! Field validation.
//!
//! [`Validator::validate`] checks a field→value map against a [`Config`] and
//! returns a [`ValidationReport`] with one [`ValidationResult`] per expected
//! field. It never stops at the first problem: every field is reported so the
//! caller can surface everything at once and decide how to exit.

use crate::config::{Config, ConfigError, FieldSpec, LAST_UPDATED};
use crate::dates::{DateNormalizer, NormalizedDate, ResolutionSource};
use crate::finding::{ErrorKind, FieldStatus, Severity, ValidationReport, ValidationResult};
use crate::gate::{ConfirmationGate, DefaultOrder};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Per-run inputs that are not part of the configuration.
pub struct RunContext<'g> {
    /// Consulted for ambiguous dates when confirmation is enabled.
    pub gate: &'g dyn ConfirmationGate,
    /// The run's notion of "today", used by the `Last Updated` override.
    pub today: NaiveDate,
    /// Defaults derived from the document itself (for instance a title taken
    /// from its first heading). They take precedence over configured ones.
    pub derived_defaults: HashMap<String, String>,
}

impl RunContext<'static> {
    /// Context using the local date and the configured default order for
    /// ambiguous dates.
    pub fn today() -> Self {
        RunContext::on(chrono::Local::now().date_naive())
    }

    /// Context pinned to a given date, with no confirmation.
    pub fn on(today: NaiveDate) -> Self {
        RunContext {
            gate: &DefaultOrder,
            today,
            derived_defaults: HashMap::new(),
        }
    }
}

impl<'g> RunContext<'g> {
    pub fn with_gate<'n>(self, gate: &'n dyn ConfirmationGate) -> RunContext<'n> {
        RunContext {
            gate,
            today: self.today,
            derived_defaults: self.derived_defaults,
        }
    }

    pub fn with_default(mut self, field: &str, value: &str) -> Self {
        self.derived_defaults
            .insert(field.to_string(), value.to_string());
        self
    }

    /// Makes the run's date the default for every date field that has no
    /// configured default, so a document missing `Created` can be repaired.
    ///
    /// Existing derived defaults are kept.
    pub fn with_today_for_dates(mut self, config: &Config) -> Self {
        let today = self.today.format("%Y-%m-%d").to_string();
        for name in &config.date_fields {
            let configured = config.field(name).is_some_and(|f| f.default.is_some());
            if !configured {
                self.derived_defaults
                    .entry(name.clone())
                    .or_insert_with(|| today.clone());
            }
        }
        self
    }
}

/// Validates metadata maps against a fixed [`Config`].
///
/// A `Validator` holds no per-run state and can be shared across threads to
/// validate independent documents in parallel.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use metadata_validator::config::Config;
/// use metadata_validator::finding::FieldStatus;
/// use metadata_validator::validator::{RunContext, Validator};
///
/// let validator = Validator::new(Config::default()).unwrap();
/// let fields = HashMap::from([("Created".to_string(), "Jul 5, 2025".to_string())]);
/// let report = validator.validate("notes.md", &fields, &RunContext::today());
///
/// let created = report.result("Created").unwrap();
/// assert_eq!(created.status, FieldStatus::Ok);
/// assert_eq!(created.normalized_value.as_deref(), Some("2025-07-05"));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    config: Config,
    normalizer: DateNormalizer,
}

impl Validator {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the config violates its invariants.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let normalizer = config.normalizer()?;
        Ok(Validator { config, normalizer })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn normalizer(&self) -> &DateNormalizer {
        &self.normalizer
    }

    /// Validates `fields` and reports every expected field.
    ///
    /// Results follow the configured field order, followed by date fields
    /// that are present but not listed as required.
    ///
    /// **Side effect:** when
    /// [`auto_update_last_updated`](Config::auto_update_last_updated) is set,
    /// `Last Updated` is not validated at all; its committed value is
    /// replaced by `ctx.today` whatever the document says.
    pub fn validate(
        &self,
        document: &str,
        fields: &HashMap<String, String>,
        ctx: &RunContext<'_>,
    ) -> ValidationReport {
        let mut results: Vec<ValidationResult> = self
            .config
            .required_fields
            .iter()
            .filter_map(|spec| self.check_field(spec, fields.get(&spec.name), ctx))
            .collect();

        for name in &self.config.date_fields {
            if self.config.field(name).is_some() {
                continue;
            }
            if let Some(value) = fields.get(name) {
                let spec = FieldSpec {
                    name: name.clone(),
                    required: false,
                    default: None,
                };
                results.extend(self.check_field(&spec, Some(value), ctx));
            }
        }

        let report = ValidationReport::from_results(document, results, self.config.strict_mode);
        tracing::debug!(
            document,
            status = %report.status,
            fields = report.results.len(),
            "validated metadata"
        );
        report
    }

    fn check_field(
        &self,
        spec: &FieldSpec,
        value: Option<&String>,
        ctx: &RunContext<'_>,
    ) -> Option<ValidationResult> {
        let name = spec.name.as_str();

        if name == LAST_UPDATED && self.config.auto_update_last_updated {
            let today = ctx.today.format("%Y-%m-%d").to_string();
            let mut result = ValidationResult::ok(name, &today);
            if value.map(|v| v.trim()) != Some(today.as_str()) {
                result.severity = Some(Severity::Info);
                result.message = Some(match value {
                    Some(v) => format!("recomputed to the current date (was '{v}')"),
                    None => "set to the current date".to_string(),
                });
            }
            return Some(result);
        }

        let Some(raw) = value else {
            if !spec.required {
                return None;
            }
            return Some(self.missing(spec, ctx));
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            if self.config.allow_empty_values {
                return Some(ValidationResult::ok(name, ""));
            }
            return Some(ValidationResult {
                field_name: name.to_string(),
                status: FieldStatus::Empty,
                normalized_value: None,
                message: Some(format!("'{name}' is present but empty")),
                severity: Some(Severity::Error),
                error: Some(ErrorKind::EmptyFieldNotAllowed),
            });
        }

        if self.config.is_date_field(name) {
            return Some(self.check_date(name, raw, ctx));
        }

        Some(ValidationResult::ok(name, trimmed))
    }

    fn missing(&self, spec: &FieldSpec, ctx: &RunContext<'_>) -> ValidationResult {
        let default = ctx
            .derived_defaults
            .get(&spec.name)
            .or(spec.default.as_ref());

        let (message, severity) = match default {
            Some(d) => (
                format!("'{}' is missing; filled with default '{d}'", spec.name),
                Severity::Info,
            ),
            None => (
                format!("'{}' is missing and has no default", spec.name),
                Severity::Warning,
            ),
        };

        ValidationResult {
            field_name: spec.name.clone(),
            status: FieldStatus::Missing,
            normalized_value: default.cloned(),
            message: Some(message),
            severity: Some(severity),
            error: Some(ErrorKind::MissingRequiredField),
        }
    }

    fn check_date(&self, name: &str, raw: &str, ctx: &RunContext<'_>) -> ValidationResult {
        match self.normalizer.normalize(raw, ctx.gate) {
            Ok(date) => date_result(name, raw, &date),
            Err(e) => ValidationResult {
                field_name: name.to_string(),
                status: FieldStatus::Invalid,
                normalized_value: None,
                message: Some(e.to_string()),
                severity: Some(Severity::Error),
                error: Some(e.kind()),
            },
        }
    }
}

fn date_result(name: &str, raw: &str, date: &NormalizedDate) -> ValidationResult {
    let result = ValidationResult::ok(name, &date.value);
    match date.resolution {
        Some(r) if r.source == ResolutionSource::Default => ValidationResult {
            status: FieldStatus::AmbiguousResolved,
            severity: Some(Severity::Info),
            message: Some(format!(
                "'{}' is ambiguous; assumed {} order ({}) -> {}",
                raw.trim(),
                r.order,
                date.pattern,
                date.value
            )),
            ..result
        },
        Some(r) => result.with_message(format!(
            "'{}' confirmed as {} order -> {}",
            raw.trim(),
            r.order,
            date.value
        )),
        None if date.changed => result.with_message(format!(
            "normalized '{}' ({}) -> {}",
            raw.trim(),
            date.pattern,
            date.value
        )),
        None => result,
    }
}
