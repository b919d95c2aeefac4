mod cli;
mod logging;
mod prompt;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use metadata_validator::config::{Config, ConfigError};
use metadata_validator::dates::{PatternClass, ResolutionSource};
use metadata_validator::finding::{RunStatus, ValidationReport};
use metadata_validator::gate::{ConfirmationGate, DefaultOrder};
use metadata_validator::validator::{RunContext, Validator};
use metadata_validator::{changelog, frontmatter, output};
use rayon::prelude::*;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Directories never descended into by `check`.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target", ".venv", "venv"];

const CHANGELOG_FILES: &[&str] = &["CHANGELOG.md", "changelog.md", "Changelog.md"];

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Validate {
            path,
            format,
            output: output_path,
            strict,
            config: config_path,
            fix,
            no_auto_update,
            no_prompt,
        } => {
            if !path.is_file() {
                eprintln!("Error: file does not exist: {}", path.display());
                std::process::exit(2);
            }

            let mut config = load_config(config_path.as_deref());
            if strict {
                config.strict_mode = true;
            }
            if no_auto_update {
                config.auto_update_last_updated = false;
            }
            let interactive = !no_prompt
                && config.confirm_ambiguous_dates
                && std::io::stdin().is_terminal()
                && matches!(format, output::OutputFormat::Pretty);
            let validator = build_validator(config);

            let content = read_or_exit(&path);
            let gate: &dyn ConfirmationGate = if interactive {
                &prompt::TerminalGate
            } else {
                &DefaultOrder
            };

            let (report, fields) = validate_document(&validator, &path, &content, gate);
            let formatted = output::format_report(&report, &format);

            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &formatted).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {e}");
                    std::process::exit(2);
                });
                eprintln!("Output written to {}", out_path.display());
            } else {
                print!("{formatted}");
            }

            if fix {
                let changes = report.changes(&fields);
                if changes.is_empty() {
                    eprintln!("Nothing to fix in {}", path.display());
                } else {
                    let order: Vec<&str> = validator
                        .config()
                        .required_fields
                        .iter()
                        .map(|f| f.name.as_str())
                        .collect();
                    let updated = frontmatter::rewrite_metadata_block(&content, &order, &changes);
                    write_atomic(&path, &updated).unwrap_or_else(|e| {
                        eprintln!("Error writing {}: {e}", path.display());
                        std::process::exit(2);
                    });
                    eprintln!(
                        "Updated {} field(s) in {}",
                        changes.len(),
                        path.display()
                    );
                }
            }

            if matches!(format, output::OutputFormat::Pretty) {
                if let Some(version) = report
                    .result("Version")
                    .and_then(|r| r.normalized_value.as_deref())
                {
                    print_changelog_consistency(&path, &content, version);
                }
            }

            std::process::exit(if report.passed { 0 } else { 1 });
        }

        Commands::Check {
            path,
            format,
            strict,
            config: config_path,
        } => {
            if !path.is_dir() {
                eprintln!("Error: directory does not exist: {}", path.display());
                std::process::exit(2);
            }

            let files = find_markdown_files(&path);
            if files.is_empty() {
                eprintln!("Error: no markdown files found in '{}'", path.display());
                std::process::exit(2);
            }

            let mut config = load_config(config_path.as_deref());
            if strict {
                config.strict_mode = true;
            }
            let validator = build_validator(config);

            let outcomes: Vec<Result<ValidationReport, String>> = files
                .par_iter()
                .map(|file| {
                    let content = std::fs::read_to_string(file)
                        .map_err(|e| format!("{}: {e}", file.display()))?;
                    Ok(validate_document(&validator, file, &content, &DefaultOrder).0)
                })
                .collect();

            let mut reports = Vec::with_capacity(outcomes.len());
            let mut read_errors = 0usize;
            for outcome in outcomes {
                match outcome {
                    Ok(report) => reports.push(report),
                    Err(e) => {
                        eprintln!("Error reading {e}");
                        read_errors += 1;
                    }
                }
            }

            match format {
                output::OutputFormat::Pretty => {
                    for report in &reports {
                        print!("{}", output::pretty::format(report));
                    }
                    print!("{}", format_collection_summary(&path, &reports));
                }
                output::OutputFormat::Json => println!("{}", output::json::format_many(&reports)),
                output::OutputFormat::Sarif => println!("{}", output::sarif::format(&reports)),
            }

            let all_passed = read_errors == 0 && reports.iter().all(|r| r.passed);
            std::process::exit(if all_passed { 0 } else { 1 });
        }

        Commands::NormalizeDate {
            values,
            day_first,
            config: config_path,
        } => {
            let mut config = load_config(config_path.as_deref());
            if day_first {
                config.ambiguous_date_order = metadata_validator::dates::DateOrder::DayFirst;
            }
            config.confirm_ambiguous_dates = false;
            let validator = build_validator(config);

            let mut failed = false;
            for value in &values {
                match validator.normalizer().normalize(value, &DefaultOrder) {
                    Ok(date) => {
                        let note = match date.resolution {
                            Some(r) if r.source == ResolutionSource::Default => {
                                format!("  (ambiguous, assumed {})", r.order).yellow().to_string()
                            }
                            _ => String::new(),
                        };
                        println!(
                            "{value} -> {}  {}{note}",
                            date.value.green().bold(),
                            date.pattern.dimmed()
                        );
                    }
                    Err(e) => {
                        failed = true;
                        println!("{value} -> {}  {}", "INVALID".red().bold(), e.to_string().dimmed());
                    }
                }
            }
            std::process::exit(if failed { 1 } else { 0 });
        }

        Commands::Changelog {
            path,
            fix,
            config: config_path,
        } => {
            if !path.is_file() {
                eprintln!("Error: file does not exist: {}", path.display());
                std::process::exit(2);
            }
            let mut config = load_config(config_path.as_deref());
            config.confirm_ambiguous_dates = false;
            let validator = build_validator(config);
            let content = read_or_exit(&path);

            let nonstandard = changelog::nonstandard_dates(&content);
            if nonstandard.is_empty() {
                println!(
                    "{} all {} release dates in {} are YYYY-MM-DD",
                    "OK".green().bold(),
                    changelog::release_headings(&content).len(),
                    path.display()
                );
                std::process::exit(0);
            }

            println!(
                "{} {} release heading(s) with non-standard dates:",
                "WARN".yellow().bold(),
                nonstandard.len()
            );
            let rewrite =
                changelog::normalize_dates(&content, validator.normalizer(), &DefaultOrder);
            for change in &rewrite.changes {
                println!(
                    "  line {:<5} [{}] '{}' -> {}",
                    change.line,
                    change.version,
                    change.from,
                    change.to.green()
                );
            }
            for (heading, error) in &rewrite.failures {
                println!(
                    "  line {:<5} [{}] {}",
                    heading.line,
                    heading.version,
                    error.to_string().red()
                );
            }

            if fix && rewrite.changed() {
                write_atomic(&path, &rewrite.content).unwrap_or_else(|e| {
                    eprintln!("Error writing {}: {e}", path.display());
                    std::process::exit(2);
                });
                println!("Normalized {} date(s) in {}", rewrite.changes.len(), path.display());
                std::process::exit(if rewrite.failures.is_empty() { 0 } else { 1 });
            }
            if rewrite.changed() {
                println!("Run with --fix to apply these changes.");
            }
            std::process::exit(1);
        }

        Commands::ListPatterns {
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());
            let validator = build_validator(config);
            let table = validator.normalizer().table();

            println!("{}", "Date Patterns".bold().underline());
            println!();
            for (i, pattern) in table.iter().enumerate() {
                let class = match pattern.class {
                    PatternClass::YearFirst => "year-first".normal(),
                    PatternClass::NamedMonth => "named-month".normal(),
                    PatternClass::NumericDayMonth { ambiguous: true } => "ambiguous".yellow(),
                    PatternClass::NumericDayMonth { ambiguous: false } => "day/month".normal(),
                };
                println!(
                    "  {:>2}. {name:<16} {class:<12} {desc}",
                    i + 1,
                    name = pattern.name.bold(),
                    desc = pattern.description.dimmed(),
                );
            }
            println!();
            println!(
                "  Ambiguous dates default to {} order.",
                validator.normalizer().default_order()
            );
        }
    }
}

fn load_config(path: Option<&Path>) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}

fn build_validator(config: Config) -> Validator {
    Validator::new(config).unwrap_or_else(|e: ConfigError| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}

fn read_or_exit(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        std::process::exit(2);
    })
}

/// Parses the metadata block of `content` and validates it.
///
/// Returns the report together with the field map that was validated so
/// callers can compute what changed.
fn validate_document(
    validator: &Validator,
    path: &Path,
    content: &str,
    gate: &dyn ConfirmationGate,
) -> (ValidationReport, std::collections::HashMap<String, String>) {
    let block = frontmatter::parse_metadata_block(content);
    if block.is_none() {
        tracing::info!(path = %path.display(), "no metadata block found");
    }
    let fields = block.as_ref().map(|b| b.to_map()).unwrap_or_default();

    let title = frontmatter::first_heading(content, block.as_ref().map(|b| b.end))
        .unwrap_or_else(|| frontmatter::title_from_filename(&path.to_string_lossy()));
    let ctx = RunContext::today()
        .with_gate(gate)
        .with_default("Document Title", &title)
        .with_today_for_dates(validator.config());

    let report = validator.validate(&path.display().to_string(), &fields, &ctx);
    (report, fields)
}

/// Returns every `*.md` file under `root`, sorted, skipping [`SKIPPED_DIRS`].
fn find_markdown_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.depth() > 0
                && e.file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name)))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        })
        .collect();
    files.sort();
    files
}

/// Replaces `path` with `content` without leaving a half-written file behind.
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Compares the document's `Version` with the sibling changelog, or with a
/// changelog section embedded in the document itself.
fn print_changelog_consistency(doc: &Path, doc_content: &str, version: &str) {
    let dir = doc
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let sibling = CHANGELOG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file() && p != doc);
    let (source, content) = match sibling {
        Some(changelog_path) => match std::fs::read_to_string(&changelog_path) {
            Ok(content) => (changelog_path.display().to_string(), content),
            Err(e) => {
                tracing::warn!(path = %changelog_path.display(), "cannot read changelog: {e}");
                return;
            }
        },
        None => match changelog::embedded_section(doc_content) {
            Some(section) => (format!("{} (changelog section)", doc.display()), section),
            None => return,
        },
    };

    if let Some(latest) = changelog::version_mismatch(version, &content) {
        println!();
        println!(
            "{} Version {version} does not match the latest release {latest} in {source}",
            "Note:".yellow().bold(),
        );
        println!("Suggested entry:\n");
        print!(
            "{}",
            changelog::suggest_entry(
                version,
                chrono::Local::now().date_naive(),
                changelog::Bump::between(&latest, version)
            )
        );
    }

    let nonstandard = changelog::nonstandard_dates(&content);
    if !nonstandard.is_empty() {
        println!(
            "{} {} release date(s) in {source} are not YYYY-MM-DD; run `metadata-validator changelog <FILE> --fix`",
            "Note:".yellow().bold(),
            nonstandard.len(),
        );
    }
}

/// Renders a compact summary table after all individual reports have been printed.
fn format_collection_summary(root: &Path, reports: &[ValidationReport]) -> String {
    let mut out = String::new();
    let separator = "─".repeat(54);

    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        format!("  Summary: {}  ({} documents)", root.display(), reports.len())
            .bold()
            .underline()
    ));
    out.push_str(&format!("{}\n", separator.dimmed()));

    let mut n_failed = 0usize;
    let mut n_warned = 0usize;
    let mut n_passed = 0usize;

    for report in reports {
        let (icon, status_str) = match report.status {
            RunStatus::Passed => {
                n_passed += 1;
                ("✓".green().to_string(), "PASSED ".green().bold().to_string())
            }
            RunStatus::Warning => {
                n_warned += 1;
                ("⚠".yellow().to_string(), "WARNING".yellow().bold().to_string())
            }
            RunStatus::Failed => {
                n_failed += 1;
                ("✗".red().to_string(), "FAILED ".red().bold().to_string())
            }
        };

        let (errors, warnings, info) = report.count_by_severity();
        out.push_str(&format!(
            "  {icon}  {name:<40} {status_str}  {errors}e {warnings}w {info}i\n",
            name = report.document,
        ));
    }

    out.push_str(&format!("{}\n", separator.dimmed()));
    out.push_str(&format!(
        "  Total: {}  {}  {}\n",
        format!("{n_failed} failed").red().bold(),
        format!("{n_warned} warnings").yellow().bold(),
        format!("{n_passed} passed").green().bold(),
    ));

    out
}
