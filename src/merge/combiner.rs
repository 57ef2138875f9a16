//! Output artifact lifecycle.
//!
//! A [`DocumentCombiner`] owns one output from creation to commit:
//!
//! - Creation allocates an exclusively owned staging file next to the
//!   target, so the final rename stays on one filesystem and is atomic.
//! - Appends graft sources onto an in-memory document in call order.
//! - Finalization serializes into the staging file, syncs it and renames
//!   it over the target.
//!
//! Until [`DocumentCombiner::finalize`] succeeds the target path is never
//! touched. Dropping the combiner on any other path deletes the staging
//! file.

use lopdf::{Document, ObjectId};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::CompressionLevel;
use crate::error::{BinderError, Result};
use crate::merge::pages;
use crate::model::SourceState;
use crate::validation;

/// Summary of a committed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedTarget {
    /// Where the output was committed.
    pub path: PathBuf,

    /// Pages in the output.
    pub page_count: usize,

    /// Sources appended.
    pub sources_appended: usize,

    /// Size of the written file in bytes.
    pub file_size: u64,
}

/// Builds one output document from sequentially appended sources.
#[derive(Debug)]
pub struct DocumentCombiner {
    target: PathBuf,
    staging: NamedTempFile,
    document: Document,
    pages_id: ObjectId,
    compression: CompressionLevel,
    sources_appended: usize,
    page_count: usize,
}

impl DocumentCombiner {
    /// Allocate the output for `output`.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::TargetCreation`] if:
    /// - `output` is an existing directory
    /// - The containing directory does not exist
    /// - A staging file cannot be created in the containing directory
    pub fn create_target(output: impl AsRef<Path>, compression: CompressionLevel) -> Result<Self> {
        let output = output.as_ref();

        if output.is_dir() {
            return Err(BinderError::target_creation(
                output,
                io::Error::other("output path is a directory"),
            ));
        }

        let parent = staging_dir(output);
        let metadata =
            fs::metadata(parent).map_err(|e| BinderError::target_creation(output, e))?;
        if !metadata.is_dir() {
            return Err(BinderError::target_creation(
                output,
                io::Error::other(format!("{} is not a directory", parent.display())),
            ));
        }

        let staging = tempfile::Builder::new()
            .prefix(".pdfbind-")
            .suffix(".part")
            .tempfile_in(parent)
            .map_err(|e| BinderError::target_creation(output, e))?;

        let (document, pages_id) = pages::empty_document();

        tracing::debug!(
            target_path = %output.display(),
            staging = %staging.path().display(),
            "allocated output target"
        );

        Ok(Self {
            target: output.to_path_buf(),
            staging,
            document,
            pages_id,
            compression,
            sources_appended: 0,
            page_count: 0,
        })
    }

    /// Final location of the output.
    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// Sources appended so far.
    pub fn sources_appended(&self) -> usize {
        self.sources_appended
    }

    /// Pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Append every page of the source at `path` after the current content.
    ///
    /// Returns the number of pages appended. A failed append leaves the
    /// output exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::Append`] carrying the state the failure
    /// implies for the source (for example `Missing` when the file vanished
    /// after classification).
    pub fn append(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();

        let source = validation::load_source(path)
            .map_err(|rejection| BinderError::append_failed(path, rejection.state, rejection.reason))?;

        let pages = pages::graft(&mut self.document, self.pages_id, source)
            .map_err(|reason| BinderError::append_failed(path, SourceState::Unreadable, reason))?;

        self.sources_appended += 1;
        self.page_count += pages;

        tracing::debug!(
            path = %path.display(),
            pages,
            total_pages = self.page_count,
            "appended source"
        );

        Ok(pages)
    }

    /// Commit the output to its final path.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::TargetCreation`] if serialization, syncing or
    /// the final rename fails. The staging file is removed and the target
    /// path left as it was.
    pub fn finalize(self) -> Result<FinalizedTarget> {
        let Self {
            target,
            mut staging,
            mut document,
            compression,
            sources_appended,
            page_count,
            ..
        } = self;

        let fail = |e: io::Error| BinderError::target_creation(&target, e);

        document.prune_objects();
        document.renumber_objects();
        match compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => document.compress(),
            CompressionLevel::Maximum => {
                document.delete_zero_length_streams();
                document.prune_objects();
                document.compress();
            }
        }

        {
            let mut writer = BufWriter::new(staging.as_file_mut());
            document
                .save_to(&mut writer)
                .map_err(|e| fail(io::Error::other(e.to_string())))?;
            writer.flush().map_err(fail)?;
        }
        staging.as_file().sync_all().map_err(fail)?;

        // Staging files are created owner-only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staging
                .as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(fail)?;
        }

        let file = staging.persist(&target).map_err(|e| fail(e.error))?;
        let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        tracing::info!(
            target_path = %target.display(),
            sources = sources_appended,
            pages = page_count,
            bytes = file_size,
            "committed output"
        );

        Ok(FinalizedTarget {
            path: target,
            page_count,
            sources_appended,
            file_size,
        })
    }

    /// Abandon the output. The target path is left untouched.
    pub fn discard(self) {
        tracing::debug!(
            target_path = %self.target.display(),
            sources = self.sources_appended,
            "discarded uncommitted output"
        );
    }
}

/// Directory the staging file is created in: the target's own directory.
fn staging_dir(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
