use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Outcome for a single metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Ok,
    Missing,
    Empty,
    Invalid,
    AmbiguousResolved,
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldStatus::Ok => write!(f, "ok"),
            FieldStatus::Missing => write!(f, "missing"),
            FieldStatus::Empty => write!(f, "empty"),
            FieldStatus::Invalid => write!(f, "invalid"),
            FieldStatus::AmbiguousResolved => write!(f, "ambiguous-resolved"),
        }
    }
}

/// Kind of problem behind a non-`Ok` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingRequiredField,
    EmptyFieldNotAllowed,
    UnparseableDate,
    ImpossibleCalendarDate,
    AmbiguousDateUnresolved,
}

impl ErrorKind {
    /// Stable identifier used as the SARIF rule id.
    pub fn rule_id(self) -> &'static str {
        match self {
            ErrorKind::MissingRequiredField => "metadata/missing-required-field",
            ErrorKind::EmptyFieldNotAllowed => "metadata/empty-field-not-allowed",
            ErrorKind::UnparseableDate => "metadata/unparseable-date",
            ErrorKind::ImpossibleCalendarDate => "metadata/impossible-calendar-date",
            ErrorKind::AmbiguousDateUnresolved => "metadata/ambiguous-date-unresolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    pub field_name: String,
    pub status: FieldStatus,
    /// Value to commit for the field. Always a complete value: a normalized
    /// date, a default, or the accepted input. `None` on failure.
    pub normalized_value: Option<String>,
    pub message: Option<String>,
    /// `None` for clean `Ok` results.
    pub severity: Option<Severity>,
    pub error: Option<ErrorKind>,
}

impl ValidationResult {
    pub fn ok(field: &str, value: &str) -> Self {
        ValidationResult {
            field_name: field.to_string(),
            status: FieldStatus::Ok,
            normalized_value: Some(value.to_string()),
            message: None,
            severity: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_problem(&self) -> bool {
        self.severity.is_some_and(|s| s != Severity::Info)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Passed,
    Warning,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Passed => write!(f, "passed"),
            RunStatus::Warning => write!(f, "warning"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationReport {
    pub document: String,
    pub timestamp: String,
    pub status: RunStatus,
    pub strict: bool,
    pub results: Vec<ValidationResult>,
    pub passed: bool,
}

impl ValidationReport {
    pub fn from_results(document: &str, results: Vec<ValidationResult>, strict: bool) -> Self {
        let status = compute_status(&results, strict);

        ValidationReport {
            document: document.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            strict,
            results,
            passed: status != RunStatus::Failed,
        }
    }

    pub fn result(&self, field: &str) -> Option<&ValidationResult> {
        self.results.iter().find(|r| r.field_name == field)
    }

    /// Fields whose committed value differs from what the document holds.
    ///
    /// `original` is the field map that was validated.
    pub fn changes<'a>(
        &'a self,
        original: &std::collections::HashMap<String, String>,
    ) -> Vec<(&'a str, &'a str)> {
        self.results
            .iter()
            .filter_map(|r| {
                let value = r.normalized_value.as_deref()?;
                match original.get(&r.field_name) {
                    Some(current) if current.trim() == value => None,
                    _ => Some((r.field_name.as_str(), value)),
                }
            })
            .collect()
    }

    /// Count errors, warnings, and info results in a single pass.
    ///
    /// Returns `(errors, warnings, info)`.
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.results
            .iter()
            .fold((0, 0, 0), |(e, w, i), r| match r.severity {
                Some(Severity::Error) => (e + 1, w, i),
                Some(Severity::Warning) => (e, w + 1, i),
                Some(Severity::Info) => (e, w, i + 1),
                None => (e, w, i),
            })
    }
}

fn compute_status(results: &[ValidationResult], strict: bool) -> RunStatus {
    let (has_errors, has_warnings) =
        results
            .iter()
            .fold((false, false), |(e, w), r| match r.severity {
                Some(Severity::Error) => (true, w),
                Some(Severity::Warning) => (e, true),
                _ => (e, w),
            });

    if has_errors {
        RunStatus::Failed
    } else if has_warnings {
        if strict {
            RunStatus::Failed
        } else {
            RunStatus::Warning
        }
    } else {
        RunStatus::Passed
    }
}
