use clap::{Parser, Subcommand};
use metadata_validator::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "metadata-validator",
    version,
    about = "Validate markdown metadata blocks and normalize their dates"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the metadata block of one markdown file
    Validate {
        /// Path to the markdown file
        path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Fail on missing fields that have no default
        #[arg(long)]
        strict: bool,

        /// Custom config file path (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write normalized values, defaults and the refreshed 'Last Updated' back to the file
        #[arg(long)]
        fix: bool,

        /// Keep the stored 'Last Updated' instead of setting it to today
        #[arg(long)]
        no_auto_update: bool,

        /// Never ask about ambiguous dates; apply the configured default order
        #[arg(long)]
        no_prompt: bool,
    },

    /// Validate every markdown file under a directory
    Check {
        /// Directory to scan recursively
        path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Fail on missing fields that have no default
        #[arg(long)]
        strict: bool,

        /// Custom config file path (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Normalize one or more date strings to YYYY-MM-DD
    #[command(name = "normalize-date")]
    NormalizeDate {
        /// Date strings to normalize
        #[arg(required = true)]
        values: Vec<String>,

        /// Read ambiguous dates day-first (European order)
        #[arg(long)]
        day_first: bool,

        /// Custom config file path (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check (and optionally fix) release dates in a changelog
    Changelog {
        /// Path to the changelog file
        path: PathBuf,

        /// Rewrite non-standard dates in place
        #[arg(long)]
        fix: bool,

        /// Custom config file path (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the recognized date notations in priority order
    #[command(name = "list-patterns")]
    ListPatterns {
        /// Custom config file path (TOML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
