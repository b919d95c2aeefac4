//! Markdown metadata block extraction and rewriting.
//!
//! Documents carry their metadata in the first `---`-delimited block:
//!
//! ```markdown
//! ---
//! # Metadata
//! - **Document Title:** Release Process
//! - **Author:** Docs Team
//! - **Created:** 2025-07-05
//! - **Description:**
//! ---
//! ```
//!
//! `- **Key:** value` lines are the canonical form and `- **Key:**` with
//! nothing after it is an empty value. Plain YAML-style `Key: value` lines
//! are accepted too. Anything else inside the block (such as the
//! `# Metadata` caption) is ignored.

use std::collections::HashMap;
use std::sync::LazyLock;

static RE_BOLD_FIELD: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^- \*\*(.+?):\*\*(?:\s+(.*))?$").unwrap());

static RE_HEADING: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^#+\s+(.+)$").unwrap());

/// The parsed metadata block of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    /// Fields in document order, duplicates included.
    pub fields: Vec<(String, String)>,
    /// 0-indexed line of the opening `---`.
    pub start: usize,
    /// 0-indexed line of the closing `---`.
    pub end: usize,
}

impl MetadataBlock {
    /// Field map handed to the validator. The last occurrence of a key wins.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.fields.iter().cloned().collect()
    }
}

/// Finds and parses the first metadata block in `content`.
///
/// Returns `None` when there is no block or it is never closed.
///
/// ```
/// use metadata_validator::frontmatter::parse_metadata_block;
///
/// let doc = "---\n- **Author:** Ada\n- **Version:**\n---\n# Body\n";
/// let block = parse_metadata_block(doc).unwrap();
/// assert_eq!(block.fields[0], ("Author".to_string(), "Ada".to_string()));
/// assert_eq!(block.fields[1], ("Version".to_string(), String::new()));
/// assert_eq!((block.start, block.end), (0, 3));
/// ```
pub fn parse_metadata_block(content: &str) -> Option<MetadataBlock> {
    let mut lines = content.lines().enumerate();
    let (start, _) = lines.by_ref().find(|(_, l)| is_delimiter(l))?;

    // Further down, a `---` pair is usually two horizontal rules; only the
    // bold form counts there, and the block needs at least one such field.
    let at_top = content.lines().take(start).all(|l| l.trim().is_empty());

    let mut fields = Vec::new();
    for (idx, line) in lines {
        if is_delimiter(line) {
            if fields.is_empty() && !at_top {
                return None;
            }
            return Some(MetadataBlock {
                fields,
                start,
                end: idx,
            });
        }
        if let Some(kv) = parse_field(line.trim(), at_top) {
            fields.push(kv);
        }
    }
    None
}

/// `"\r\n"` when `content` uses Windows line endings, `"\n"` otherwise.
pub(crate) fn line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim().starts_with("---")
}

fn parse_field(line: &str, allow_plain: bool) -> Option<(String, String)> {
    if let Some(caps) = RE_BOLD_FIELD.captures(line) {
        let key = caps[1].trim().to_string();
        let value = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
        return Some((key, value));
    }
    if !allow_plain || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    parse_kv(line)
}

/// Split a `key: value` line into `(key, value)`.
fn parse_kv(line: &str) -> Option<(String, String)> {
    let colon_pos = line.find(':')?;
    let key = line[..colon_pos].trim();
    if key.is_empty() {
        return None;
    }
    let value = line[colon_pos + 1..].trim();
    Some((key.to_string(), value.to_string()))
}

/// Renders a metadata block with the given fields, in order.
pub fn render_metadata_block(fields: &[(String, String)]) -> String {
    let mut out = String::from("---\n# Metadata\n");
    for (key, value) in fields {
        if value.is_empty() {
            out.push_str(&format!("- **{key}:**\n"));
        } else {
            out.push_str(&format!("- **{key}:** {value}\n"));
        }
    }
    out.push_str("---\n");
    out
}

/// Returns `content` with its metadata block replaced.
///
/// Fields are written in `order` first (taking values from `updates`, then
/// from the existing block), followed by any other existing fields. When the
/// document has no block, one is prepended.
pub fn rewrite_metadata_block(content: &str, order: &[&str], updates: &[(&str, &str)]) -> String {
    let block = parse_metadata_block(content);
    let existing: Vec<(String, String)> = block
        .as_ref()
        .map(|b| b.fields.clone())
        .unwrap_or_default();

    let lookup = |key: &str| -> Option<String> {
        updates
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .or_else(|| {
                existing
                    .iter()
                    .rev()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.clone())
            })
    };

    let mut fields: Vec<(String, String)> = order
        .iter()
        .map(|key| (key.to_string(), lookup(*key).unwrap_or_default()))
        .collect();
    for (key, _) in &existing {
        if !fields.iter().any(|(k, _)| k == key) {
            fields.push((key.clone(), lookup(key.as_str()).unwrap_or_default()));
        }
    }
    for (key, value) in updates {
        if !fields.iter().any(|(k, _)| k == key) {
            fields.push((key.to_string(), value.to_string()));
        }
    }

    let rendered = render_metadata_block(&fields);
    let lines: Vec<&str> = content.lines().collect();
    let mut out = String::new();
    match block {
        Some(b) => {
            for line in &lines[..b.start] {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&rendered);
            for line in &lines[b.end + 1..] {
                out.push_str(line);
                out.push('\n');
            }
        }
        None => {
            out.push_str(&rendered);
            if !content.is_empty() {
                out.push('\n');
            }
            for line in &lines {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    if !content.is_empty() && !content.ends_with('\n') && out.ends_with('\n') {
        out.pop();
    }
    match line_ending(content) {
        "\n" => out,
        eol => out.replace('\n', eol),
    }
}

/// Returns the text of the first markdown heading after line `after`
/// (0-indexed), or anywhere when `after` is `None`.
///
/// ```
/// use metadata_validator::frontmatter::first_heading;
///
/// assert_eq!(first_heading("intro\n## Setup Guide\n", None).as_deref(), Some("Setup Guide"));
/// ```
pub fn first_heading(content: &str, after: Option<usize>) -> Option<String> {
    content
        .lines()
        .enumerate()
        .filter(|(idx, _)| after.map_or(true, |a| *idx > a))
        .find_map(|(_, line)| {
            RE_HEADING
                .captures(line.trim())
                .map(|c| c[1].trim().to_string())
        })
}

/// Turns a file name into a human-friendly title.
///
/// ```
/// use metadata_validator::frontmatter::title_from_filename;
///
/// assert_eq!(title_from_filename("docs/my_file-name.md"), "My File Name");
/// ```
pub fn title_from_filename(path: &str) -> String {
    let stem = std::path::Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    stem.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
