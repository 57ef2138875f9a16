//! Data model shared by every stage of a bind operation.
//!
//! Values here are plain, immutable records. A [`StatedSource`] is created
//! once per source per operation and a [`BindResult`] exactly once per
//! completed or cancelled operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// An input file offered for binding.
///
/// Identity is the path; the display name is only used for progress and
/// reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    path: PathBuf,
    display_name: String,
}

impl SourceFile {
    /// Create a source whose display name is the file name of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self { path, display_name }
    }

    /// Create a source with an explicit display name.
    pub fn with_display_name(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
        }
    }

    /// Path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name shown to users.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl From<PathBuf> for SourceFile {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for SourceFile {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<&str> for SourceFile {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Usability of a source, as determined by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceState {
    /// Structurally valid and needs no credential.
    Ok,
    /// Not a recognized document, or corrupted/truncated.
    Unreadable,
    /// Recognized but access-restricted (encrypted).
    Protected,
    /// Does not resolve to an existing, currently readable file.
    Missing,
}

impl SourceState {
    /// Whether the source may be appended.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Short lowercase label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Unreadable => "unreadable",
            Self::Protected => "protected",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for SourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A source paired with its classification for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatedSource {
    /// The submitted source.
    pub source: SourceFile,
    /// Its state within this operation.
    pub state: SourceState,
    /// Diagnostic for non-`Ok` states.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StatedSource {
    /// Create a stated source.
    pub fn new(source: SourceFile, state: SourceState, reason: Option<String>) -> Self {
        Self {
            source,
            state,
            reason,
        }
    }

    /// Path of the underlying source.
    pub fn path(&self) -> &Path {
        self.source.path()
    }
}

/// The artifact a bind operation produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDescriptor {
    /// Final location of the output.
    pub output_path: PathBuf,
}

impl TargetDescriptor {
    /// Create a target descriptor.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

/// Progress of a running bind operation. Emitted once per processed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindProgress {
    /// Sources processed so far.
    pub completed_count: usize,
    /// Sources submitted.
    pub total_count: usize,
    /// Display name of the source just processed.
    pub current_source: Option<String>,
}

impl BindProgress {
    /// Completion in the range `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total_count == 0 {
            1.0
        } else {
            self.completed_count as f64 / self.total_count as f64
        }
    }
}

/// Authoritative record of a finished bind operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindResult {
    /// Requested output location.
    pub output_path: PathBuf,
    /// Sources written to the output, in output order.
    pub appended: Vec<StatedSource>,
    /// Sources left out, in submission order.
    pub skipped: Vec<StatedSource>,
    /// Whether the operation stopped on a cancellation request.
    pub cancelled: bool,
    /// Pages in the committed output; zero when cancelled.
    pub total_pages: usize,
}

impl BindResult {
    /// Paths of the appended sources, in output order.
    pub fn appended_paths(&self) -> Vec<&Path> {
        self.appended.iter().map(StatedSource::path).collect()
    }

    /// Paths of the skipped sources, in submission order.
    pub fn skipped_paths(&self) -> Vec<&Path> {
        self.skipped.iter().map(StatedSource::path).collect()
    }

    /// True when the output was committed.
    pub fn is_complete(&self) -> bool {
        !self.cancelled
    }
}
