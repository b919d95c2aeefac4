use super::{
    month_from_name, CompiledPattern, Component, DateOrder, PatternClass, PatternTable,
    RE_ISO_DATE,
};
use crate::finding::ErrorKind;
use crate::gate::{ConfirmationGate, GateDecision};
use chrono::{Datelike, NaiveDate};

/// Why a date could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("'{raw}' does not match any recognized date format")]
    Unparseable { raw: String },
    #[error("'{raw}' ({pattern}) is not a real calendar date: {year:04}-{month:02}-{day:02}")]
    ImpossibleCalendarDate {
        raw: String,
        pattern: String,
        year: i32,
        month: u32,
        day: u32,
    },
    #[error("'{raw}' is ambiguous ({first} or {second}) and was not resolved")]
    AmbiguousUnresolved {
        raw: String,
        first: String,
        second: String,
    },
}

impl DateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DateError::Unparseable { .. } => ErrorKind::UnparseableDate,
            DateError::ImpossibleCalendarDate { .. } => ErrorKind::ImpossibleCalendarDate,
            DateError::AmbiguousUnresolved { .. } => ErrorKind::AmbiguousDateUnresolved,
        }
    }
}

/// Who settled an ambiguous day/month order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The configured default order was applied.
    Default,
    /// The confirmation gate picked the order.
    Confirmed,
}

/// Record of how an ambiguous date was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub order: DateOrder,
    pub source: ResolutionSource,
}

/// The two readings of an ambiguous numeric date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousCandidates {
    pub month_first: NaiveDate,
    pub day_first: NaiveDate,
    /// Order applied when the gate answers [`GateDecision::UseDefault`].
    pub default_order: DateOrder,
}

impl AmbiguousCandidates {
    pub fn date(&self, order: DateOrder) -> NaiveDate {
        match order {
            DateOrder::MonthFirst => self.month_first,
            DateOrder::DayFirst => self.day_first,
        }
    }

    /// ISO string of the reading for `order`.
    pub fn iso(&self, order: DateOrder) -> String {
        iso(self.date(order))
    }
}

/// A successfully normalized date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate {
    /// Canonical `YYYY-MM-DD` text.
    pub value: String,
    pub date: NaiveDate,
    /// Name of the pattern that matched.
    pub pattern: String,
    /// `true` when `value` differs from the (trimmed) input.
    pub changed: bool,
    /// Present only when the input was genuinely ambiguous.
    pub resolution: Option<Resolution>,
}

/// Matches raw date strings against a [`PatternTable`] and reformats them
/// to ISO-8601.
///
/// Two-digit years always expand to `20YY`. This is a fixed policy.
///
/// # Examples
///
/// ```
/// use metadata_validator::dates::{DateNormalizer, DateOrder, PatternTable};
/// use metadata_validator::gate::DefaultOrder;
///
/// let normalizer = DateNormalizer::new(PatternTable::default(), DateOrder::MonthFirst, false);
/// let date = normalizer.normalize("Jul 5, 2025", &DefaultOrder).unwrap();
/// assert_eq!(date.value, "2025-07-05");
/// ```
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    table: PatternTable,
    default_order: DateOrder,
    confirm_ambiguous: bool,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        DateNormalizer::new(PatternTable::default(), DateOrder::default(), false)
    }
}

impl DateNormalizer {
    pub fn new(table: PatternTable, default_order: DateOrder, confirm_ambiguous: bool) -> Self {
        DateNormalizer {
            table,
            default_order,
            confirm_ambiguous,
        }
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    pub fn default_order(&self) -> DateOrder {
        self.default_order
    }

    /// Normalizes `raw` to `YYYY-MM-DD`.
    ///
    /// Patterns are tried in table order. A match whose components do not
    /// form a real date falls through to the next matching pattern, so
    /// `12.25.24` ends up read as `MM.DD.YY` once `YY.MM.DD` fails.
    ///
    /// `gate` is consulted only for genuinely ambiguous input and only when
    /// confirmation is enabled; otherwise the default order is applied and
    /// recorded in [`NormalizedDate::resolution`].
    ///
    /// # Errors
    ///
    /// - [`DateError::Unparseable`] when no pattern matches.
    /// - [`DateError::ImpossibleCalendarDate`] when every matching pattern
    ///   yields an impossible date (month 13, February 30, ...). The error
    ///   names the first such pattern.
    /// - [`DateError::AmbiguousUnresolved`] when the gate declines to choose.
    pub fn normalize(
        &self,
        raw: &str,
        gate: &dyn ConfirmationGate,
    ) -> Result<NormalizedDate, DateError> {
        let input = raw.trim();
        let mut first_impossible = None;

        if !input.is_empty() {
            for pattern in self.table.iter() {
                let Some(captures) = pattern.captures(input) else {
                    continue;
                };
                let Some(parts) = Parts::extract(&captures) else {
                    continue;
                };
                tracing::debug!(input, pattern = %pattern.name, "date pattern matched");

                match self.read_match(raw, input, pattern, &parts, gate) {
                    Ok(date) => return Ok(date),
                    Err(e @ DateError::ImpossibleCalendarDate { .. }) => {
                        tracing::debug!(input, pattern = %pattern.name, "not a calendar date, trying next pattern");
                        first_impossible.get_or_insert(e);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Err(first_impossible.unwrap_or_else(|| DateError::Unparseable {
            raw: raw.to_string(),
        }))
    }

    /// Builds the date described by one pattern match.
    fn read_match(
        &self,
        raw: &str,
        input: &str,
        pattern: &CompiledPattern,
        parts: &Parts,
        gate: &dyn ConfirmationGate,
    ) -> Result<NormalizedDate, DateError> {
        let impossible = |month: u32, day: u32| DateError::ImpossibleCalendarDate {
            raw: raw.to_string(),
            pattern: pattern.name.clone(),
            year: parts.year,
            month,
            day,
        };

        let (date, resolution) = match pattern.class {
            PatternClass::NumericDayMonth { ambiguous: true } => {
                let (first, second) = parts.numeric_pair();
                match self.resolve_order(raw, parts.year, first, second, gate)? {
                    Some((order, resolution)) => {
                        let (month, day) = reading(order, first, second);
                        let date = NaiveDate::from_ymd_opt(parts.year, month, day)
                            .ok_or_else(|| impossible(month, day))?;
                        (date, resolution)
                    }
                    None => return Err(impossible(first, second)),
                }
            }
            _ => {
                let date = NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day)
                    .ok_or_else(|| impossible(parts.month, parts.day))?;
                (date, None)
            }
        };

        let value = iso(date);
        if !RE_ISO_DATE.is_match(&value) {
            return Err(impossible(date.month(), date.day()));
        }

        Ok(NormalizedDate {
            changed: value != input,
            value,
            date,
            pattern: pattern.name.clone(),
            resolution,
        })
    }

    /// Picks the reading order for a numeric pair whose order is not fixed
    /// by the notation.
    ///
    /// Returns `None` when neither order yields a valid month, and
    /// `Some((order, None))` when only one reading is possible.
    fn resolve_order(
        &self,
        raw: &str,
        year: i32,
        first: u32,
        second: u32,
        gate: &dyn ConfirmationGate,
    ) -> Result<Option<(DateOrder, Option<Resolution>)>, DateError> {
        let month_first_valid = (1..=12).contains(&first);
        let day_first_valid = (1..=12).contains(&second);

        let order = match (month_first_valid, day_first_valid) {
            (false, false) => return Ok(None),
            (true, false) => return Ok(Some((DateOrder::MonthFirst, None))),
            (false, true) => return Ok(Some((DateOrder::DayFirst, None))),
            (true, true) if first == second => return Ok(Some((self.default_order, None))),
            (true, true) => self.default_order,
        };

        let (Some(mf), Some(df)) = (
            NaiveDate::from_ymd_opt(year, first, second),
            NaiveDate::from_ymd_opt(year, second, first),
        ) else {
            // Day 0 or a similar impossibility; let the caller report it
            // against the default reading.
            return Ok(Some((order, None)));
        };

        let candidates = AmbiguousCandidates {
            month_first: mf,
            day_first: df,
            default_order: self.default_order,
        };

        if !self.confirm_ambiguous {
            return Ok(Some((
                order,
                Some(Resolution {
                    order,
                    source: ResolutionSource::Default,
                }),
            )));
        }

        let resolution = match gate.resolve_ambiguous_date(raw, &candidates) {
            GateDecision::Chosen(chosen) => Resolution {
                order: chosen,
                source: ResolutionSource::Confirmed,
            },
            GateDecision::UseDefault => Resolution {
                order,
                source: ResolutionSource::Default,
            },
            GateDecision::Unresolved => {
                return Err(DateError::AmbiguousUnresolved {
                    raw: raw.to_string(),
                    first: candidates.iso(order),
                    second: candidates.iso(order.other()),
                });
            }
        };
        Ok(Some((resolution.order, Some(resolution))))
    }
}

/// Year/month/day extracted from a match, plus the textual order of the two
/// numeric day/month components for ambiguous notations.
struct Parts {
    year: i32,
    month: u32,
    day: u32,
    month_before_day: bool,
}

impl Parts {
    fn extract(parts: &[(Component, &str)]) -> Option<Parts> {
        let mut year = None;
        let mut month = None;
        let mut day = None;
        let mut month_before_day = true;

        for (component, text) in parts {
            match component {
                Component::Year4 => year = Some(text.parse::<i32>().ok()?),
                Component::Year2 => year = Some(2000 + text.parse::<i32>().ok()?),
                Component::Month => month = Some(text.parse::<u32>().ok()?),
                Component::MonthName => month = Some(month_from_name(text)?),
                Component::Day => {
                    if month.is_none() {
                        month_before_day = false;
                    }
                    day = Some(text.parse::<u32>().ok()?);
                }
            }
        }

        Some(Parts {
            year: year?,
            month: month?,
            day: day?,
            month_before_day,
        })
    }

    /// The two numeric components in the order they appear in the input.
    fn numeric_pair(&self) -> (u32, u32) {
        if self.month_before_day {
            (self.month, self.day)
        } else {
            (self.day, self.month)
        }
    }
}

/// `(month, day)` for the given reading of a textual `(first, second)` pair.
fn reading(order: DateOrder, first: u32, second: u32) -> (u32, u32) {
    match order {
        DateOrder::MonthFirst => (first, second),
        DateOrder::DayFirst => (second, first),
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

