//! The built-in date notation table.
//!
//! Order matters: the first pattern whose regex matches the whole input
//! wins. ISO comes first so already-normalized values are recognized
//! without touching any other rule.

use super::DatePattern;

const MON: &str = "(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)";
const MONTH: &str =
    "(January|February|March|April|May|June|July|August|September|October|November|December)";

/// Returns the default ordered list of recognized date notations.
pub fn builtin() -> Vec<DatePattern> {
    vec![
        DatePattern::new("YYYY-MM-DD", r"(\d{4})-(\d{2})-(\d{2})", "ISO 8601 calendar date"),
        DatePattern::new(
            "MM/DD/YYYY",
            r"(\d{1,2})/(\d{1,2})/(\d{4})",
            "Slash-separated, four-digit year",
        )
        .ambiguous(),
        DatePattern::new(
            "MM/DD/YY",
            r"(\d{1,2})/(\d{1,2})/(\d{2})",
            "Slash-separated, two-digit year",
        )
        .ambiguous(),
        DatePattern::new(
            "MM-DD-YYYY",
            r"(\d{1,2})-(\d{1,2})-(\d{4})",
            "Dash-separated, four-digit year",
        )
        .ambiguous(),
        DatePattern::new(
            "MM-DD-YY",
            r"(\d{1,2})-(\d{1,2})-(\d{2})",
            "Dash-separated, two-digit year",
        )
        .ambiguous(),
        DatePattern::new("YYYY/MM/DD", r"(\d{4})/(\d{1,2})/(\d{1,2})", "Year-first with slashes"),
        DatePattern::new("YYYY.MM.DD", r"(\d{4})\.(\d{1,2})\.(\d{1,2})", "Year-first with dots"),
        DatePattern::new(
            "YY.MM.DD",
            r"(\d{2})\.(\d{1,2})\.(\d{1,2})",
            "Year-first with dots, two-digit year",
        ),
        DatePattern::new(
            "MM.DD.YYYY",
            r"(\d{1,2})\.(\d{1,2})\.(\d{4})",
            "Dot-separated, four-digit year",
        )
        .ambiguous(),
        DatePattern::new(
            "MM.DD.YY",
            r"(\d{1,2})\.(\d{1,2})\.(\d{2})",
            "Dot-separated, two-digit year",
        )
        .ambiguous(),
        DatePattern::new("YYYYMMDD", r"(\d{4})(\d{2})(\d{2})", "Compact eight-digit date"),
        DatePattern::new("YYMMDD", r"(\d{2})(\d{2})(\d{2})", "Compact six-digit date"),
        DatePattern::new(
            "Mon DD, YYYY",
            &format!(r"{MON}\s+(\d{{1,2}}),?\s+(\d{{4}})"),
            "Abbreviated month name, e.g. Jul 5, 2025",
        ),
        DatePattern::new(
            "Month DD, YYYY",
            &format!(r"{MONTH}\s+(\d{{1,2}}),?\s+(\d{{4}})"),
            "Full month name, e.g. July 5, 2025",
        ),
        DatePattern::new(
            "DD-Mon-YYYY",
            &format!(r"(\d{{1,2}})-{MON}-(\d{{4}})"),
            "Day, abbreviated month, year, e.g. 05-Jul-2025",
        ),
        DatePattern::new(
            "DD-Month-YYYY",
            &format!(r"(\d{{1,2}})-{MONTH}-(\d{{4}})"),
            "Day, full month, year, e.g. 5-July-2025",
        ),
    ]
}
