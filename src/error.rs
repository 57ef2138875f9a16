//! Error types for pdfbind.
//!
//! Only setup-level failures travel as errors. Per-source problems
//! (missing, unreadable or protected inputs) are recorded as
//! [`SourceState`](crate::model::SourceState) values in the bind result
//! and never abort a batch.
//!
//! # Error Categories
//!
//! - **Target errors**: the output location cannot be allocated or committed
//! - **Append errors**: a source could not be appended to the target
//! - **Usage errors**: invalid configuration, missing target, declined prompt

use std::io;
use std::path::PathBuf;

use crate::model::SourceState;

/// Result type alias for pdfbind operations.
pub type Result<T> = std::result::Result<T, BinderError>;

/// Main error type for pdfbind operations.
#[derive(Debug, thiserror::Error)]
pub enum BinderError {
    /// The output artifact could not be allocated or finalized.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    TargetCreation {
        /// Path of the requested output.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A source could not be appended to the target.
    #[error("Failed to append {}: {reason}", path.display())]
    Append {
        /// Path of the source that failed.
        path: PathBuf,
        /// State the failure implies for the source.
        state: SourceState,
        /// Details about the failure.
        reason: String,
    },

    /// An append or finalize was requested before a target was created.
    #[error("No output target has been created")]
    TargetNotCreated,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation at a prompt.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for BinderError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl BinderError {
    /// Create a TargetCreation error.
    pub fn target_creation(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::TargetCreation {
            path: path.into(),
            source,
        }
    }

    /// Create an Append error.
    pub fn append_failed(
        path: impl Into<PathBuf>,
        state: SourceState,
        reason: impl Into<String>,
    ) -> Self {
        Self::Append {
            path: path.into(),
            state,
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error ends the whole operation.
    ///
    /// Append errors are fatal only for the source they concern.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Append { .. })
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TargetCreation { .. } => 5,
            Self::Append { .. } => 3,
            Self::TargetNotCreated => 1,
            Self::OutputExists { .. } => 4,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
