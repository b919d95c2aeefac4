//! Configuration loading and management.
//!
//! A [`Config`] describes which metadata fields a document must carry, their
//! defaults, which fields hold dates, the ordered date notation table, and
//! the behavior flags of a validation run. It is built once at start-up and
//! never mutated afterwards.
//!
//! # Configuration file
//!
//! Both TOML and JSON are accepted; the format is chosen from the file
//! extension. Unknown keys are ignored so older binaries keep reading newer
//! files.
//!
//! ```toml
//! required_fields = ["Document Title", "Author", "Created", "Last Updated"]
//! strict_mode = true
//! allow_empty_values = false
//! ambiguous_date_order = "day_first"
//!
//! [defaults]
//! Author = "Docs Team"
//! ```
//!
//! `required_fields` entries may also be full objects
//! (`{ name = "Version", default = "0.1.0" }`). A `defaults` table is merged
//! into the field specs after loading.

use crate::dates::{patterns, DateNormalizer, DateOrder, DatePattern, PatternError, PatternTable};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// File names looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["metadata-validator.toml", "metadata_standards.json"];

/// Name of the field recomputed by
/// [`auto_update_last_updated`](Config::auto_update_last_updated).
pub const LAST_UPDATED: &str = "Last Updated";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("required field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// One metadata field the document is expected to carry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default = "default_true")]
    pub required: bool,
    /// Value filled in when the field is absent.
    #[serde(default)]
    pub default: Option<String>,
}

fn default_true() -> bool {
    true
}

impl FieldSpec {
    pub fn new(name: &str, default: Option<&str>) -> Self {
        FieldSpec {
            name: name.to_string(),
            required: true,
            default: default.map(str::to_string),
        }
    }
}

/// A `required_fields` entry: either a bare name or a full spec.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FieldEntry {
    Name(String),
    Spec(FieldSpec),
}

fn deserialize_fields<'de, D>(deserializer: D) -> Result<Vec<FieldSpec>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries: Vec<FieldEntry> = serde::Deserialize::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|e| match e {
            FieldEntry::Name(name) => FieldSpec {
                name,
                required: true,
                default: None,
            },
            FieldEntry::Spec(spec) => spec,
        })
        .collect())
}

/// Main configuration for a validation run.
///
/// All fields carry defaults matching the reference metadata standard, so
/// the config file can be omitted entirely.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Expected fields, in the order they are reported and written back.
    #[serde(deserialize_with = "deserialize_fields")]
    pub required_fields: Vec<FieldSpec>,
    /// Extra defaults keyed by field name, merged into `required_fields`.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub defaults: HashMap<String, String>,
    /// Fields whose values are dates and go through the normalizer.
    pub date_fields: Vec<String>,
    /// Ordered date notations; the first match wins.
    pub date_patterns: Vec<DatePattern>,
    /// Missing fields without a default fail the run instead of warning.
    pub strict_mode: bool,
    /// Accept present-but-empty values.
    pub allow_empty_values: bool,
    /// Ask the confirmation gate before committing an ambiguous date.
    pub confirm_ambiguous_dates: bool,
    /// Recompute `Last Updated` to the current date on every run instead of
    /// validating the stored value.
    pub auto_update_last_updated: bool,
    /// Reading applied to ambiguous numeric dates when nobody confirms.
    pub ambiguous_date_order: DateOrder,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            required_fields: vec![
                FieldSpec::new("Document Title", Some("Unknown")),
                FieldSpec::new("Author", Some("Unknown")),
                FieldSpec::new("Created", None),
                FieldSpec::new(LAST_UPDATED, None),
                FieldSpec::new("Version", Some("0.1.0")),
                FieldSpec::new("Description", Some("No description provided.")),
            ],
            defaults: HashMap::new(),
            date_fields: vec!["Created".to_string(), LAST_UPDATED.to_string()],
            date_patterns: patterns::builtin(),
            strict_mode: true,
            allow_empty_values: false,
            confirm_ambiguous_dates: true,
            auto_update_last_updated: true,
            ambiguous_date_order: DateOrder::MonthFirst,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML or JSON file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. Otherwise try each of [`DEFAULT_CONFIG_FILES`] in the current
    ///    directory.
    /// 3. If none exists, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the explicit path is missing, the file
    /// cannot be read or parsed, or the result fails [`Config::validate`].
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
            None => DEFAULT_CONFIG_FILES
                .iter()
                .map(Path::new)
                .find(|p| p.exists())
                .map(Path::to_path_buf),
        };

        let Some(path) = config_path else {
            tracing::debug!("no config file found, using built-in defaults");
            return Ok(Config::default());
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Config::from_json_str(&content)
        } else {
            Config::from_toml_str(&content)
        };

        tracing::debug!(path = %path.display(), "loaded config");
        parsed.map_err(|e| ConfigError::InFile {
            path,
            source: Box::new(e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.finish()
    }

    pub fn from_json_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.finish()
    }

    fn finish(mut self) -> Result<Config, ConfigError> {
        self.merge_defaults();
        self.validate()?;
        Ok(self)
    }

    /// Folds the `defaults` table into the matching field specs.
    fn merge_defaults(&mut self) {
        for spec in &mut self.required_fields {
            if let Some(default) = self.defaults.get(&spec.name) {
                spec.default = Some(default.clone());
            }
        }
    }

    /// Checks the invariants a run relies on: unique field names and a
    /// compilable date notation table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateField`] or [`ConfigError::Pattern`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for spec in &self.required_fields {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateField(spec.name.clone()));
            }
        }
        PatternTable::compile(&self.date_patterns)?;
        Ok(())
    }

    /// Returns `true` if `field` holds a date.
    ///
    /// ```
    /// use metadata_validator::config::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.is_date_field("Created"));
    /// assert!(!config.is_date_field("Author"));
    /// ```
    pub fn is_date_field(&self, field: &str) -> bool {
        self.date_fields.iter().any(|f| f == field)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.required_fields.iter().find(|f| f.name == name)
    }

    /// Builds the date normalizer described by this config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if a date pattern fails to compile.
    pub fn normalizer(&self) -> Result<DateNormalizer, ConfigError> {
        Ok(DateNormalizer::new(
            PatternTable::compile(&self.date_patterns)?,
            self.ambiguous_date_order,
            self.confirm_ambiguous_dates,
        ))
    }
}
