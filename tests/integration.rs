use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn metadata_validator() -> Command {
    assert_cmd::cargo::cargo_bin_cmd!("metadata-validator")
}

/// Copies a fixture into a fresh temp dir so `--fix` runs leave the tree alone.
fn scratch_copy(fixture: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let src = Path::new("tests/fixtures").join(fixture);
    let dest = dir.path().join(src.file_name().unwrap());
    std::fs::copy(&src, &dest).unwrap();
    (dir, dest)
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_clean_document_passes() {
    metadata_validator()
        .args(["validate", "tests/fixtures/valid-doc.md", "--no-prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn validate_messy_document_fails() {
    metadata_validator()
        .args(["validate", "tests/fixtures/messy-doc.md", "--no-prompt"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("Description"));
}

#[test]
fn validate_messy_document_json_format() {
    let output = metadata_validator()
        .args(["validate", "tests/fixtures/messy-doc.md", "--format", "json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["passed"], false);
    let created = parsed["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["field_name"] == "Created")
        .unwrap();
    assert_eq!(created["normalized_value"], "2025-07-05");
}

#[test]
fn validate_sarif_format() {
    metadata_validator()
        .args(["validate", "tests/fixtures/messy-doc.md", "--format", "sarif"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"version\": \"2.1.0\""))
        .stdout(predicate::str::contains("metadata/empty-field-not-allowed"));
}

#[test]
fn validate_ambiguous_date_uses_default_order() {
    metadata_validator()
        .args(["validate", "tests/fixtures/ambiguous-doc.md", "--no-prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-05-07"))
        .stdout(predicate::str::contains("assumed"));
}

#[test]
fn validate_document_without_metadata_fills_every_field() {
    // Title from the heading, dates from today, the rest from config defaults.
    metadata_validator()
        .args(["validate", "tests/fixtures/no-metadata.md", "--no-prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Architecture Overview"));
}

#[test]
fn validate_with_lenient_config_passes() {
    metadata_validator()
        .args([
            "validate",
            "tests/fixtures/no-metadata.md",
            "--no-prompt",
            "--config",
            "tests/fixtures/configs/lenient.toml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"));
}

#[test]
fn validate_nonexistent_path_exits_2() {
    metadata_validator()
        .args(["validate", "tests/fixtures/does-not-exist.md"])
        .assert()
        .code(2);
}

#[test]
fn validate_bad_config_exits_2() {
    metadata_validator()
        .args([
            "validate",
            "tests/fixtures/valid-doc.md",
            "--config",
            "tests/fixtures/configs/duplicate-field.toml",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("declared more than once"));
}

#[test]
fn validate_bad_pattern_exits_2() {
    metadata_validator()
        .args([
            "validate",
            "tests/fixtures/valid-doc.md",
            "--config",
            "tests/fixtures/configs/bad-pattern.toml",
        ])
        .assert()
        .code(2);
}

#[test]
fn validate_output_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");
    metadata_validator()
        .args(["validate", "tests/fixtures/valid-doc.md", "--format", "json", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));

    let content = std::fs::read_to_string(&out).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["passed"], true);
}

#[test]
fn validate_fix_writes_normalized_values() {
    let (_dir, path) = scratch_copy("messy-doc.md");
    metadata_validator()
        .args(["validate", "--fix", "--no-prompt"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Updated"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("- **Created:** 2025-07-05\n"));
    assert!(content.contains("- **Version:** 0.1.0\n"));
    assert!(content.contains("- **Description:**\n"));
    assert!(!content.contains("07/05/2025"));
    assert!(content.contains("# Onboarding Notes"));
}

#[test]
fn validate_fix_without_auto_update_keeps_date_semantics() {
    let (_dir, path) = scratch_copy("messy-doc.md");
    metadata_validator()
        .args(["validate", "--fix", "--no-prompt", "--no-auto-update"])
        .arg(&path)
        .assert()
        .code(1);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("- **Last Updated:** 2025-07-05\n"));
}

#[test]
fn validate_fix_fills_missing_dates_with_today() {
    let (_dir, path) = scratch_copy("no-metadata.md");
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    metadata_validator()
        .args(["validate", "--fix", "--no-prompt"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("---\n"));
    assert!(content.contains(&format!("- **Created:** {today}\n")));
    assert!(content.contains(&format!("- **Last Updated:** {today}\n")));
    assert!(content.contains("- **Document Title:** Architecture Overview\n"));
    assert!(content.contains("# Architecture Overview"));
}

#[test]
fn validate_fix_keeps_crlf_line_endings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("windows.md");
    let doc = [
        "---",
        "- **Document Title:** Windows Notes",
        "- **Author:** Docs Team",
        "- **Created:** Jul 5, 2025",
        "- **Last Updated:** 2025-07-05",
        "- **Version:** 1.0.0",
        "- **Description:** Saved with CRLF.",
        "---",
        "",
        "# Windows Notes",
        "",
    ]
    .join("\r\n");
    std::fs::write(&path, doc).unwrap();

    metadata_validator()
        .args(["validate", "--fix", "--no-prompt"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("- **Created:** 2025-07-05\r\n"));
    assert!(content.ends_with("# Windows Notes\r\n"));
    assert_eq!(content.matches('\n').count(), content.matches("\r\n").count());
}

#[test]
fn validate_reports_changelog_version_mismatch() {
    metadata_validator()
        .args(["validate", "tests/fixtures/release/guide.md", "--no-prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("latest release 1.2.0"))
        .stdout(predicate::str::contains("## [1.3.0]"))
        .stdout(predicate::str::contains("not YYYY-MM-DD"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_directory_reports_each_document() {
    metadata_validator()
        .args(["check", "tests/fixtures/docs"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("broken.md"))
        .stdout(predicate::str::contains("setup.md"))
        .stdout(predicate::str::contains("Summary"))
        .stdout(predicate::str::contains("1 failed"))
        .stdout(predicate::str::contains("node_modules").not());
}

#[test]
fn check_directory_json_format() {
    let output = metadata_validator()
        .args(["check", "tests/fixtures/docs", "--format", "json"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let reports = parsed.as_array().unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(
        reports.iter().filter(|r| r["passed"] == false).count(),
        1
    );
}

#[test]
fn check_directory_sarif_format() {
    metadata_validator()
        .args(["check", "tests/fixtures/docs", "--format", "sarif"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("metadata/impossible-calendar-date"));
}

#[test]
fn check_nonexistent_directory_exits_2() {
    metadata_validator()
        .args(["check", "tests/fixtures/no-such-dir"])
        .assert()
        .code(2);
}

#[test]
fn check_directory_without_markdown_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    metadata_validator()
        .arg("check")
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no markdown files"));
}

// ---------------------------------------------------------------------------
// normalize-date
// ---------------------------------------------------------------------------

#[test]
fn normalize_date_values() {
    metadata_validator()
        .args(["normalize-date", "Jul 5, 2025", "20250705", "2025.07.05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jul 5, 2025 -> "))
        .stdout(predicate::str::contains("2025-07-05"));
}

#[test]
fn normalize_date_day_first() {
    metadata_validator()
        .args(["normalize-date", "--day-first", "07/05/2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-05-07"))
        .stdout(predicate::str::contains("ambiguous"));
}

#[test]
fn normalize_date_invalid_exits_1() {
    metadata_validator()
        .args(["normalize-date", "2025-13-40"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("INVALID"));
}

#[test]
fn normalize_date_requires_a_value() {
    metadata_validator().args(["normalize-date"]).assert().code(2);
}

// ---------------------------------------------------------------------------
// changelog
// ---------------------------------------------------------------------------

#[test]
fn changelog_lists_nonstandard_dates() {
    metadata_validator()
        .args(["changelog", "tests/fixtures/release/CHANGELOG.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2 release heading(s)"))
        .stdout(predicate::str::contains("'Mar 3, 2025' -> "))
        .stdout(predicate::str::contains("--fix"));
}

#[test]
fn changelog_fix_rewrites_dates() {
    let (_dir, path) = scratch_copy("release/CHANGELOG.md");
    metadata_validator()
        .args(["changelog", "--fix"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("## [1.2.0] - 2025-07-05\n"));
    assert!(content.contains("## [1.1.0] - 2025-03-03\n"));

    metadata_validator()
        .arg("changelog")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

// ---------------------------------------------------------------------------
// list-patterns
// ---------------------------------------------------------------------------

#[test]
fn list_patterns_shows_table() {
    metadata_validator()
        .args(["list-patterns"])
        .assert()
        .success()
        .stdout(predicate::str::contains("YYYY-MM-DD"))
        .stdout(predicate::str::contains("Mon DD, YYYY"))
        .stdout(predicate::str::contains("ambiguous"));
}

#[test]
fn verbose_flag_is_accepted() {
    metadata_validator()
        .args(["-vv", "normalize-date", "2025-07-05"])
        .assert()
        .success()
        .stderr(predicate::str::contains("date pattern matched"));
}
