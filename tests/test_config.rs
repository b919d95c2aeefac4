use metadata_validator::config::{Config, ConfigError};
use metadata_validator::dates::DateOrder;
use std::path::Path;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn default_config_carries_reference_fields() {
    let config = Config::default();
    let names: Vec<&str> = config.required_fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Document Title",
            "Author",
            "Created",
            "Last Updated",
            "Version",
            "Description"
        ]
    );
    assert_eq!(config.field("Version").unwrap().default.as_deref(), Some("0.1.0"));
    assert!(config.field("Created").unwrap().default.is_none());
    assert!(config.strict_mode);
    assert!(!config.allow_empty_values);
    assert!(config.confirm_ambiguous_dates);
    assert!(config.auto_update_last_updated);
    assert_eq!(config.ambiguous_date_order, DateOrder::MonthFirst);
}

#[test]
fn default_config_is_valid() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn empty_toml_gives_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.required_fields.len(), 6);
    assert_eq!(config.date_fields, ["Created", "Last Updated"]);
    assert!(!config.date_patterns.is_empty());
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn toml_overrides_flags() {
    let config = Config::from_toml_str(
        r#"
strict_mode = false
allow_empty_values = true
confirm_ambiguous_dates = false
auto_update_last_updated = false
ambiguous_date_order = "day_first"
"#,
    )
    .unwrap();
    assert!(!config.strict_mode);
    assert!(config.allow_empty_values);
    assert!(!config.confirm_ambiguous_dates);
    assert!(!config.auto_update_last_updated);
    assert_eq!(config.ambiguous_date_order, DateOrder::DayFirst);
}

#[test]
fn order_aliases_are_accepted() {
    let us = Config::from_toml_str(r#"ambiguous_date_order = "us""#).unwrap();
    assert_eq!(us.ambiguous_date_order, DateOrder::MonthFirst);
    let eu = Config::from_toml_str(r#"ambiguous_date_order = "european""#).unwrap();
    assert_eq!(eu.ambiguous_date_order, DateOrder::DayFirst);
}

#[test]
fn unknown_order_is_rejected() {
    let err = Config::from_toml_str(r#"ambiguous_date_order = "sideways""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn required_fields_accept_names_and_specs() {
    let config = Config::from_toml_str(
        r#"
required_fields = [
    "Title",
    { name = "Owner", default = "Platform" },
    { name = "Reviewer", required = false },
]
"#,
    )
    .unwrap();
    assert_eq!(config.required_fields.len(), 3);
    assert!(config.field("Title").unwrap().required);
    assert_eq!(config.field("Owner").unwrap().default.as_deref(), Some("Platform"));
    assert!(!config.field("Reviewer").unwrap().required);
}

#[test]
fn defaults_table_is_merged_into_fields() {
    let config = Config::from_toml_str(
        r#"
[defaults]
Author = "Docs Team"
Created = "2025-01-01"
"#,
    )
    .unwrap();
    assert_eq!(config.field("Author").unwrap().default.as_deref(), Some("Docs Team"));
    assert_eq!(config.field("Created").unwrap().default.as_deref(), Some("2025-01-01"));
    // Untouched defaults survive.
    assert_eq!(config.field("Version").unwrap().default.as_deref(), Some("0.1.0"));
}

#[test]
fn custom_date_patterns_replace_builtin_table() {
    let config = Config::from_toml_str(
        r#"
[[date_patterns]]
name = "DD/MM/YYYY"
regex = '(\d{2})/(\d{2})/(\d{4})'
description = "European"
"#,
    )
    .unwrap();
    assert_eq!(config.date_patterns.len(), 1);
    assert_eq!(config.date_patterns[0].target_format, "YYYY-MM-DD");

    let normalizer = config.normalizer().unwrap();
    assert_eq!(normalizer.table().len(), 1);
}

#[test]
fn duplicate_field_is_rejected() {
    let err = Config::from_toml_str(r#"required_fields = ["Author", "Created", "Author"]"#)
        .unwrap_err();
    match err {
        ConfigError::DuplicateField(name) => assert_eq!(name, "Author"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn broken_pattern_is_rejected() {
    let err = Config::from_toml_str(
        r#"
[[date_patterns]]
name = "DD/MM/YYYY"
regex = '(\d{2})/(\d{2})'
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Pattern(_)));
}

#[test]
fn malformed_toml_is_rejected() {
    assert!(matches!(
        Config::from_toml_str("strict_mode = maybe").unwrap_err(),
        ConfigError::Toml(_)
    ));
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn json_config_is_accepted() {
    let config = Config::from_json_str(
        r#"{
            "required_fields": ["Document Title", "Created"],
            "defaults": {"Document Title": "Untitled"},
            "strict_mode": false,
            "ambiguous_date_order": "dmy"
        }"#,
    )
    .unwrap();
    assert_eq!(config.required_fields.len(), 2);
    assert_eq!(
        config.field("Document Title").unwrap().default.as_deref(),
        Some("Untitled")
    );
    assert!(!config.strict_mode);
    assert_eq!(config.ambiguous_date_order, DateOrder::DayFirst);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(
        Config::from_json_str("{ not json").unwrap_err(),
        ConfigError::Json(_)
    ));
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn load_toml_file() {
    let config = Config::load(Some(Path::new("tests/fixtures/configs/lenient.toml"))).unwrap();
    assert!(!config.strict_mode);
    assert!(config.allow_empty_values);
    assert_eq!(config.ambiguous_date_order, DateOrder::DayFirst);
    assert_eq!(config.field("Author").unwrap().default.as_deref(), Some("Unknown"));
    assert_eq!(config.field("Version").unwrap().default.as_deref(), Some("0.1.0"));
}

#[test]
fn load_json_file() {
    let config =
        Config::load(Some(Path::new("tests/fixtures/configs/metadata_standards.json"))).unwrap();
    assert_eq!(config.required_fields.len(), 6);
    assert_eq!(
        config.field("Description").unwrap().default.as_deref(),
        Some("No description provided.")
    );
    assert_eq!(config.ambiguous_date_order, DateOrder::MonthFirst);
}

#[test]
fn load_missing_file_is_an_error() {
    let err = Config::load(Some(Path::new("tests/fixtures/configs/nope.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn load_error_names_the_file() {
    let err =
        Config::load(Some(Path::new("tests/fixtures/configs/duplicate-field.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::InFile { .. }));
    assert!(err.to_string().contains("duplicate-field.toml"));
}

#[test]
fn load_from_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "strict_mode = false\n").unwrap();
    let config = Config::load(Some(&path)).unwrap();
    assert!(!config.strict_mode);
}
