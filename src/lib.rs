//! # metadata-validator
//!
//! Validation of markdown metadata blocks.
//!
//! `metadata-validator` checks that a document carries its required fields
//! (Document Title, Author, Created, Last Updated, Version, Description),
//! fills configured defaults, and normalizes every date field to ISO-8601
//! (`YYYY-MM-DD`) from a table of recognized notations. Numeric dates whose
//! day/month order cannot be told apart are never guessed silently: they are
//! either confirmed through an injected [`gate::ConfirmationGate`] or read in
//! a configured default order and flagged.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use metadata_validator::{config::Config, frontmatter, output, validator};
//!
//! let content = std::fs::read_to_string("README.md").unwrap();
//! let block = frontmatter::parse_metadata_block(&content).unwrap();
//!
//! let validator = validator::Validator::new(Config::load(None).unwrap()).unwrap();
//! let ctx = validator::RunContext::today();
//! let report = validator.validate("README.md", &block.to_map(), &ctx);
//!
//! print!("{}", output::format_report(&report, &output::OutputFormat::Pretty));
//! std::process::exit(if report.passed { 0 } else { 1 });
//! ```
//!
//! ## Architecture
//!
//! 1. **[`config`]**: load and check configuration from TOML or JSON.
//! 2. **[`dates`]**: the date notation table and the
//!    [`dates::DateNormalizer`].
//! 3. **[`gate`]**: the confirmation capability for ambiguous dates.
//! 4. **[`validator`]**: per-field checks producing a report.
//! 5. **[`finding`]**: result types ([`finding::ValidationResult`],
//!    [`finding::ValidationReport`]).
//! 6. **[`output`]**: pretty text, JSON, or [SARIF].
//! 7. **[`frontmatter`]** and **[`changelog`]**: text helpers for the
//!    metadata block and `CHANGELOG.md` release headings.
//!
//! The library itself performs no I/O apart from [`config::Config::load`].
//!
//! [SARIF]: https://sarifweb.azurewebsites.net/

pub mod changelog;
pub mod config;
pub mod dates;
pub mod finding;
pub mod frontmatter;
pub mod gate;
pub mod output;
pub mod validator;
