//! Date notation recognition and ISO-8601 normalization.
//!
//! A [`DatePattern`] is plain configuration data: a notation name, a regular
//! expression, and an explicit `ambiguous` flag. [`PatternTable::compile`]
//! turns an ordered list of them into [`CompiledPattern`]s, each tagged with a
//! [`PatternClass`] so the [`DateNormalizer`] never has to infer day/month
//! order from declaration order or naming conventions.
//!
//! # Notation names
//!
//! The pattern name spells the component layout. Positional capture groups
//! in the regex map to the layout tokens in order:
//!
//! | Token   | Meaning |
//! |---------|---------|
//! | `YYYY`  | four-digit year |
//! | `YY`    | two-digit year, always expanded to `20YY` |
//! | `MM`    | numeric month |
//! | `DD`    | numeric day |
//! | `Mon`   | abbreviated month name (`Jan`..`Dec`) |
//! | `Month` | full month name |
//!
//! Any other character in the name is a literal separator and is ignored.

mod normalizer;
pub mod patterns;

pub use normalizer::{
    AmbiguousCandidates, DateError, DateNormalizer, NormalizedDate, Resolution, ResolutionSource,
};

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// The only output format the normalizer produces.
pub const ISO_FORMAT: &str = "YYYY-MM-DD";

/// Canonical shape every normalized value must have.
pub static RE_ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Resolves an English month name or its three-letter abbreviation
/// (case-insensitive) to its 1-based month number.
///
/// ```
/// use metadata_validator::dates::month_from_name;
///
/// assert_eq!(month_from_name("Jul"), Some(7));
/// assert_eq!(month_from_name("SEPTEMBER"), Some(9));
/// assert_eq!(month_from_name("Juli"), None);
/// ```
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|full| *full == lower || (lower.len() == 3 && full.starts_with(&lower)))
        .map(|i| i as u32 + 1)
}

/// A recognized date notation, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DatePattern {
    /// Notation name, e.g. `"MM/DD/YYYY"`. Encodes the component layout.
    pub name: String,
    /// Regular expression with one positional capture group per component.
    /// Matched against the whole (trimmed) input, case-insensitively.
    pub regex: String,
    /// Output format. Only [`ISO_FORMAT`] is supported.
    #[serde(default = "default_target_format")]
    pub target_format: String,
    #[serde(default)]
    pub description: String,
    /// Day and month are numeric and their order cannot be recovered from
    /// the text alone (US `MM/DD` versus European `DD/MM`).
    #[serde(default)]
    pub ambiguous: bool,
}

fn default_target_format() -> String {
    ISO_FORMAT.to_string()
}

impl DatePattern {
    pub fn new(name: &str, regex: &str, description: &str) -> Self {
        DatePattern {
            name: name.to_string(),
            regex: regex.to_string(),
            target_format: default_target_format(),
            description: description.to_string(),
            ambiguous: false,
        }
    }

    /// Marks the notation as day/month ambiguous.
    pub fn ambiguous(mut self) -> Self {
        self.ambiguous = true;
        self
    }
}

/// One component of a notation's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Year4,
    Year2,
    Month,
    MonthName,
    Day,
}

/// Order in which an ambiguous numeric date is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// US order, `MM/DD`.
    #[default]
    #[serde(alias = "us", alias = "mdy")]
    MonthFirst,
    /// European order, `DD/MM`.
    #[serde(alias = "european", alias = "dmy")]
    DayFirst,
}

impl DateOrder {
    pub fn other(self) -> Self {
        match self {
            DateOrder::MonthFirst => DateOrder::DayFirst,
            DateOrder::DayFirst => DateOrder::MonthFirst,
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateOrder::MonthFirst => write!(f, "month-first (US, MM/DD)"),
            DateOrder::DayFirst => write!(f, "day-first (European, DD/MM)"),
        }
    }
}

/// How a compiled pattern's components are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternClass {
    /// Year comes first (`YYYY-MM-DD`, `YYYY.MM.DD`, `YYYYMMDD`, ...).
    YearFirst,
    /// The month is spelled out, so the order is never in doubt.
    NamedMonth,
    /// Numeric day and month before the year.
    NumericDayMonth { ambiguous: bool },
}

impl PatternClass {
    pub fn is_ambiguous(self) -> bool {
        matches!(self, PatternClass::NumericDayMonth { ambiguous: true })
    }
}

/// Errors raised while compiling a pattern table.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("date pattern '{name}': invalid regex: {source}")]
    Regex {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("date pattern '{name}': {reason}")]
    Layout { name: String, reason: String },
    #[error("date pattern '{name}': unsupported target format '{format}' (only {ISO_FORMAT})")]
    TargetFormat { name: String, format: String },
}

/// A [`DatePattern`] ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: String,
    pub description: String,
    pub class: PatternClass,
    layout: Vec<Component>,
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(pattern: &DatePattern) -> Result<Self, PatternError> {
        if pattern.target_format != ISO_FORMAT {
            return Err(PatternError::TargetFormat {
                name: pattern.name.clone(),
                format: pattern.target_format.clone(),
            });
        }

        let layout = parse_layout(&pattern.name).map_err(|reason| PatternError::Layout {
            name: pattern.name.clone(),
            reason,
        })?;

        let regex = Regex::new(&format!("(?i)^(?:{})$", pattern.regex)).map_err(|source| {
            PatternError::Regex {
                name: pattern.name.clone(),
                source,
            }
        })?;

        let groups = regex.captures_len() - 1;
        if groups != layout.len() {
            return Err(PatternError::Layout {
                name: pattern.name.clone(),
                reason: format!(
                    "regex has {groups} capture groups but the name describes {} components",
                    layout.len()
                ),
            });
        }

        let class = if layout.contains(&Component::MonthName) {
            PatternClass::NamedMonth
        } else if matches!(layout[0], Component::Year4 | Component::Year2) {
            PatternClass::YearFirst
        } else {
            PatternClass::NumericDayMonth {
                ambiguous: pattern.ambiguous,
            }
        };

        if pattern.ambiguous && !class.is_ambiguous() {
            return Err(PatternError::Layout {
                name: pattern.name.clone(),
                reason: "only numeric day/month notations can be marked ambiguous".to_string(),
            });
        }

        Ok(CompiledPattern {
            name: pattern.name.clone(),
            description: pattern.description.clone(),
            class,
            layout,
            regex,
        })
    }

    pub fn layout(&self) -> &[Component] {
        &self.layout
    }

    /// Returns the captured text for each layout component, or `None` when
    /// the pattern does not match the whole input.
    pub(crate) fn captures<'t>(&self, input: &'t str) -> Option<Vec<(Component, &'t str)>> {
        let caps = self.regex.captures(input)?;
        self.layout
            .iter()
            .enumerate()
            .map(|(i, c)| caps.get(i + 1).map(|m| (*c, m.as_str())))
            .collect()
    }
}

/// Splits a notation name such as `"Mon DD, YYYY"` into its components.
fn parse_layout(name: &str) -> Result<Vec<Component>, String> {
    // Longest tokens first so `YYYY` is not read as two `YY`s and `Month`
    // is not read as `Mon` + literal text.
    const TOKENS: &[(&str, Component)] = &[
        ("YYYY", Component::Year4),
        ("YY", Component::Year2),
        ("Month", Component::MonthName),
        ("Mon", Component::MonthName),
        ("MM", Component::Month),
        ("DD", Component::Day),
    ];

    let mut layout = Vec::new();
    let mut rest = name;
    while !rest.is_empty() {
        if let Some((tok, comp)) = TOKENS.iter().find(|(t, _)| rest.starts_with(t)) {
            layout.push(*comp);
            rest = &rest[tok.len()..];
        } else {
            let skip = rest.chars().next().map_or(1, char::len_utf8);
            rest = &rest[skip..];
        }
    }

    let count = |pred: fn(&Component) -> bool| layout.iter().filter(|c| pred(c)).count();
    let years = count(|c| matches!(c, Component::Year4 | Component::Year2));
    let months = count(|c| matches!(c, Component::Month | Component::MonthName));
    let days = count(|c| matches!(c, Component::Day));
    if years != 1 || months != 1 || days != 1 {
        return Err(format!(
            "name must contain exactly one year, one month and one day token (found {years}, {months}, {days})"
        ));
    }
    Ok(layout)
}

/// Ordered, compiled date notations. The first matching pattern wins.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<CompiledPattern>,
}

impl PatternTable {
    /// Compiles `patterns` in order.
    ///
    /// A pattern whose regex is textually identical to an earlier one can
    /// never match and is dropped with a warning; mark the surviving notation
    /// `ambiguous` instead of declaring both orders.
    ///
    /// # Errors
    ///
    /// Returns the first [`PatternError`] encountered.
    pub fn compile(patterns: &[DatePattern]) -> Result<Self, PatternError> {
        let mut compiled: Vec<CompiledPattern> = Vec::with_capacity(patterns.len());
        for (i, p) in patterns.iter().enumerate() {
            if let Some(earlier) = patterns[..i].iter().find(|e| e.regex == p.regex) {
                tracing::warn!(
                    pattern = %p.name,
                    shadowed_by = %earlier.name,
                    "date pattern has the same regex as an earlier one and is ignored"
                );
                continue;
            }
            compiled.push(CompiledPattern::compile(p)?);
        }
        Ok(PatternTable { patterns: compiled })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        // The built-in table is covered by tests; compiling it cannot fail.
        PatternTable::compile(&patterns::builtin()).expect("built-in date patterns compile")
    }
}
