//! CLI argument parsing for pdfbind.
//!
//! This module defines the command-line interface using `clap` and turns it
//! into a validated [`Config`].

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfbind::config::{AppendFailurePolicy, CompressionLevel, Config, OverwriteMode};
use pdfbind::error::{BinderError, Result};

/// Bind PDF files into a single document.
///
/// Sources are checked first. Missing, corrupted and password-protected
/// files are skipped and reported; the rest are bound in the order given.
/// The output only appears once it is complete.
#[derive(Parser, Debug)]
#[command(name = "pdfbind")]
#[command(version)]
#[command(about = "Bind PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files, glob patterns or directories (in order)
    ///
    /// Directories expand to the PDF files they contain, sorted by name.
    ///
    /// Examples:
    ///   pdfbind cover.pdf body.pdf -o book.pdf
    ///   pdfbind 'chapters/*.pdf' -o book.pdf
    ///   pdfbind scans/ -o scans.pdf
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Classify inputs and report, without creating output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show per-source details and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the bind result as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Overwrite an existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for the output PDF
    ///
    /// - none: write streams as read
    /// - standard: compress uncompressed streams (default)
    /// - maximum: also drop unreachable objects and empty streams
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Stop and discard the output if a checked source fails to append
    ///
    /// By default such sources are skipped like any other unusable source.
    #[arg(long)]
    pub stop_on_append_error: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::InvalidConfig`] if the compression level is
    /// unknown or the resulting configuration is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let append_failure = if self.stop_on_append_error {
            AppendFailurePolicy::Abort
        } else {
            AppendFailurePolicy::Skip
        };

        let config = Config {
            inputs: self.inputs.clone(),
            output: self.output.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
            overwrite_mode,
            compression,
            append_failure,
        };

        config.validate().map_err(|e| {
            BinderError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Early checks that need no file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error for empty inputs or conflicting flags.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(BinderError::invalid_config("No input files specified"));
        }

        if self.force && self.no_clobber {
            return Err(BinderError::invalid_config(
                "Cannot use both --force and --no-clobber",
            ));
        }

        if self.output.as_os_str().is_empty() {
            return Err(BinderError::invalid_config("Output path is empty"));
        }

        Ok(())
    }
}
