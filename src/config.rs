//! Configuration module for pdfbind.
//!
//! [`Config`] is the validated, normalized form of the command line.
//! [`BindOptions`] is the subset that the library components consume and is
//! handed to every orchestrator a [`BinderFactory`](crate::bind::BinderFactory)
//! creates.

use anyhow::{Result, bail};

use crate::BinderError;
use std::{path::PathBuf, str::FromStr};

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as read.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress and drop every unreachable object.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = BinderError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(BinderError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// What to do when a source classified `Ok` fails to append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppendFailurePolicy {
    /// Record the source as skipped and continue with the batch.
    #[default]
    Skip,
    /// Discard the target and surface the append error.
    Abort,
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Options that shape a single bind operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindOptions {
    /// Compression applied when the target is finalized.
    pub compression: CompressionLevel,
    /// Handling of append-time failures.
    pub append_failure: AppendFailurePolicy,
}

/// Complete configuration for a bind run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths (in bind order).
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Classify inputs only; do not create output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Print the bind result as JSON.
    pub json: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Handling of sources that fail after classification.
    pub append_failure: AppendFailurePolicy,
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The output path is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.inputs.iter().any(|input| input == &self.output) {
            bail!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            );
        }

        Ok(())
    }

    /// Library options derived from this configuration.
    pub fn bind_options(&self) -> BindOptions {
        BindOptions {
            compression: self.compression,
            append_failure: self.append_failure,
        }
    }

    /// Check if progress and summaries should be displayed.
    ///
    /// JSON output replaces the human-readable report.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}
