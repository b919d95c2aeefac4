//! Changelog date and version checks.
//!
//! Release headings follow the Keep a Changelog shape
//! `## [1.2.0] - 2025-07-05`. These helpers find the headings, report dates
//! that are not ISO-8601, rewrite them through the [`DateNormalizer`], and
//! pull out the latest released version so it can be compared with a
//! document's `Version` field.
//!
//! Everything here works on text; reading and writing files is left to the
//! caller.

use crate::dates::{DateError, DateNormalizer, RE_ISO_DATE};
use crate::frontmatter::line_ending;
use crate::gate::ConfirmationGate;
use chrono::NaiveDate;
use std::sync::LazyLock;

static RE_RELEASE_HEADING: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^(## \[([0-9]+\.[0-9]+\.[0-9]+)\] - )(.*)$").unwrap()
});

/// Version mentions, most specific first: `## [1.0.0]`, `[1.0.0]`, `## 1.0.0`.
static RE_VERSIONS: LazyLock<[regex::Regex; 3]> = LazyLock::new(|| {
    [
        regex::Regex::new(r"## \[([0-9]+\.[0-9]+\.[0-9]+)\]").unwrap(),
        regex::Regex::new(r"\[([0-9]+\.[0-9]+\.[0-9]+)\]").unwrap(),
        regex::Regex::new(r"## ([0-9]+\.[0-9]+\.[0-9]+)").unwrap(),
    ]
});

static RE_SECTION_START: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?i)^(#{1,4} +changelog|## +history|## +version history) *$").unwrap()
});

static RE_SECTION_END: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^#{1,2} +[^\[]").unwrap());

static RE_RELEASE_START: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^## +\[").unwrap());

/// A `## [x.y.z] - date` heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseHeading {
    pub version: String,
    /// Date text exactly as written, trimmed.
    pub date: String,
    /// 1-indexed line number.
    pub line: usize,
}

impl ReleaseHeading {
    pub fn has_iso_date(&self) -> bool {
        RE_ISO_DATE.is_match(&self.date)
    }
}

/// Lists every release heading in `content`.
pub fn release_headings(content: &str) -> Vec<ReleaseHeading> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let caps = RE_RELEASE_HEADING.captures(line)?;
            Some(ReleaseHeading {
                version: caps[2].to_string(),
                date: caps[3].trim().to_string(),
                line: idx + 1,
            })
        })
        .collect()
}

/// Release headings whose date is not already `YYYY-MM-DD`.
pub fn nonstandard_dates(content: &str) -> Vec<ReleaseHeading> {
    release_headings(content)
        .into_iter()
        .filter(|h| !h.has_iso_date())
        .collect()
}

/// One heading date rewritten by [`normalize_dates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateChange {
    pub line: usize,
    pub version: String,
    pub from: String,
    pub to: String,
}

/// Result of [`normalize_dates`].
#[derive(Debug, Clone, Default)]
pub struct ChangelogRewrite {
    /// Updated changelog text. Equal to the input when nothing changed.
    pub content: String,
    pub changes: Vec<DateChange>,
    /// Headings whose date could not be normalized; left untouched.
    pub failures: Vec<(ReleaseHeading, DateError)>,
}

impl ChangelogRewrite {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Normalizes the date of every release heading.
///
/// Dates that cannot be normalized are collected in
/// [`ChangelogRewrite::failures`] and left as written.
pub fn normalize_dates(
    content: &str,
    normalizer: &DateNormalizer,
    gate: &dyn ConfirmationGate,
) -> ChangelogRewrite {
    let mut rewrite = ChangelogRewrite::default();
    let mut lines = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let Some(caps) = RE_RELEASE_HEADING.captures(line) else {
            lines.push(line.to_string());
            continue;
        };
        let heading = ReleaseHeading {
            version: caps[2].to_string(),
            date: caps[3].trim().to_string(),
            line: idx + 1,
        };
        match normalizer.normalize(&heading.date, gate) {
            Ok(date) if date.changed => {
                lines.push(format!("{}{}", &caps[1], date.value));
                rewrite.changes.push(DateChange {
                    line: heading.line,
                    version: heading.version,
                    from: heading.date,
                    to: date.value,
                });
            }
            Ok(_) => lines.push(line.to_string()),
            Err(e) => {
                lines.push(line.to_string());
                rewrite.failures.push((heading, e));
            }
        }
    }

    if rewrite.changed() {
        let eol = line_ending(content);
        rewrite.content = lines.join(eol);
        if content.ends_with('\n') {
            rewrite.content.push_str(eol);
        }
    } else {
        rewrite.content = content.to_string();
    }
    rewrite
}

fn version_key(version: &str) -> (u64, u64, u64) {
    let mut parts = version.split('.').map(|p| p.parse::<u64>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

/// Highest `x.y.z` version mentioned in a release position of `content`.
///
/// ```
/// use metadata_validator::changelog::latest_version;
///
/// let log = "## [1.2.0] - 2025-07-05\n## [1.10.0] - 2025-08-01\n";
/// assert_eq!(latest_version(log).as_deref(), Some("1.10.0"));
/// ```
pub fn latest_version(content: &str) -> Option<String> {
    RE_VERSIONS
        .iter()
        .flat_map(|re| re.captures_iter(content).map(|c| c[1].to_string()))
        .max_by_key(|v| version_key(v))
}

/// Extracts a changelog section embedded in a larger document.
///
/// The section starts at a `Changelog`, `History` or `Version History`
/// heading and runs until the next top-level heading that is not a release
/// heading.
pub fn embedded_section(content: &str) -> Option<String> {
    let mut lines = content.lines();
    lines.by_ref().find(|l| RE_SECTION_START.is_match(l.trim()))?;

    let body: Vec<&str> = lines
        .take_while(|l| !(RE_SECTION_END.is_match(l) && !RE_RELEASE_START.is_match(l)))
        .collect();
    Some(body.join("\n").trim().to_string())
}

/// Kind of release a suggested changelog entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

impl Bump {
    /// The bump that leads from `previous` to `next`, judged by the most
    /// significant component that differs.
    pub fn between(previous: &str, next: &str) -> Bump {
        let (a, b) = (version_key(previous), version_key(next));
        if a.0 != b.0 {
            Bump::Major
        } else if a.1 != b.1 {
            Bump::Minor
        } else {
            Bump::Patch
        }
    }
}

/// Renders a changelog entry skeleton for `version` released on `date`.
pub fn suggest_entry(version: &str, date: NaiveDate, bump: Bump) -> String {
    let date = date.format("%Y-%m-%d");
    let sections: &[(&str, &str)] = match bump {
        Bump::Major => &[
            ("Changed", "Breaking changes (describe what changed)"),
            ("Added", "New features (describe additions)"),
            ("Removed", "Removed features (describe removals)"),
        ],
        Bump::Minor => &[
            ("Added", "New features (describe additions)"),
            ("Changed", "Improvements (describe changes)"),
        ],
        Bump::Patch => &[
            ("Fixed", "Bug fixes (describe fixes)"),
            ("Changed", "Minor improvements (describe changes)"),
        ],
    };

    let mut out = format!("## [{version}] - {date}\n");
    for (title, hint) in sections {
        out.push_str(&format!("\n### {title}\n- {hint}\n"));
    }
    out
}

/// Compares a document's `Version` with the latest changelog release.
///
/// Returns `None` when they agree or the changelog names no version.
pub fn version_mismatch(metadata_version: &str, changelog: &str) -> Option<String> {
    let latest = latest_version(changelog)?;
    (latest != metadata_version.trim()).then_some(latest)
}
