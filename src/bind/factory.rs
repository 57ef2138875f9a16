//! Construction of orchestrators and binders.
//!
//! There is no shared instance: every call hands out a fresh value, so two
//! operations never share state.

use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::bind::BindOrchestrator;
use crate::config::BindOptions;
use crate::error::{BinderError, Result};
use crate::merge::{DocumentCombiner, FinalizedTarget};
use crate::model::{BindProgress, BindResult, SourceFile, SourceState, TargetDescriptor};
use crate::validation::{Classification, Classify, SourceClassifier};

/// Hands out single-use orchestrators and binders configured with the same
/// options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinderFactory {
    options: BindOptions,
}

impl BinderFactory {
    /// Create a factory with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with the given options.
    pub fn with_options(options: BindOptions) -> Self {
        Self { options }
    }

    /// Options passed to everything this factory creates.
    pub fn options(&self) -> BindOptions {
        self.options
    }

    /// A fresh orchestrator for one operation.
    pub fn orchestrator(
        &self,
        sources: Vec<SourceFile>,
        target: TargetDescriptor,
    ) -> BindOrchestrator {
        BindOrchestrator::new(sources, target, self.options)
    }

    /// A fresh binder using the standard classifier.
    pub fn binder(&self) -> Binder {
        Binder::with_classifier(self.options, SourceClassifier::new())
    }

    /// A fresh binder using a custom classifier.
    pub fn binder_with_classifier<C: Classify>(&self, classifier: C) -> Binder<C> {
        Binder::with_classifier(self.options, classifier)
    }
}

/// Step-by-step binding surface.
///
/// A binder holds at most one uncommitted target. Dropping the binder
/// discards it.
#[derive(Debug)]
pub struct Binder<C = SourceClassifier> {
    options: BindOptions,
    classifier: C,
    combiner: Option<DocumentCombiner>,
}

impl<C: Classify> Binder<C> {
    fn with_classifier(options: BindOptions, classifier: C) -> Self {
        Self {
            options,
            classifier,
            combiner: None,
        }
    }

    /// Whether an uncommitted target is held.
    pub fn has_target(&self) -> bool {
        self.combiner.is_some()
    }

    /// Allocate a new target at `output`, discarding any uncommitted one.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::TargetCreation`] if the output cannot be
    /// allocated.
    pub fn create_target(&mut self, output: impl AsRef<Path>) -> Result<()> {
        self.discard();
        self.combiner = Some(DocumentCombiner::create_target(
            output,
            self.options.compression,
        )?);
        Ok(())
    }

    /// Classify `path` and append it to the current target.
    ///
    /// # Errors
    ///
    /// - [`BinderError::TargetNotCreated`] without a target
    /// - [`BinderError::Append`] if the source is not usable or fails to
    ///   append
    pub fn append_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let combiner = self.combiner.as_mut().ok_or(BinderError::TargetNotCreated)?;

        let classification = self.classifier.classify_source(path);
        if classification.state != SourceState::Ok {
            return Err(BinderError::append_failed(
                path,
                classification.state,
                classification
                    .reason
                    .unwrap_or_else(|| format!("source is {}", classification.state)),
            ));
        }

        combiner.append(path)?;
        Ok(())
    }

    /// Commit the current target.
    ///
    /// # Errors
    ///
    /// [`BinderError::TargetNotCreated`] without a target, otherwise the
    /// combiner's finalize error.
    pub fn finalize(&mut self) -> Result<FinalizedTarget> {
        self.combiner
            .take()
            .ok_or(BinderError::TargetNotCreated)?
            .finalize()
    }

    /// Drop the current target without committing it.
    pub fn discard(&mut self) {
        if let Some(combiner) = self.combiner.take() {
            combiner.discard();
        }
    }

    /// State of the source at `path`.
    pub fn classify(&self, path: impl AsRef<Path>) -> SourceState {
        self.classifier.classify_source(path.as_ref()).state
    }

    /// Detailed classification of the source at `path`.
    pub fn inspect(&self, path: impl AsRef<Path>) -> Classification {
        self.classifier.classify_source(path.as_ref())
    }
}

impl<C: Classify + Clone + 'static> Binder<C> {
    /// Run a whole bind operation on a blocking worker.
    ///
    /// Progress is delivered to `on_progress` on the calling task, in
    /// processing order. The binder's own target, if any, is not involved.
    ///
    /// # Errors
    ///
    /// Fatal errors of the operation; see [`BindOrchestrator::run`].
    pub async fn bind_async<F>(
        &self,
        sources: Vec<SourceFile>,
        target: TargetDescriptor,
        cancel: CancellationToken,
        mut on_progress: F,
    ) -> Result<BindResult>
    where
        F: FnMut(BindProgress),
    {
        let mut handle =
            BindOrchestrator::with_classifier(sources, target, self.options, self.classifier.clone())
                .spawn_with_token(cancel);

        while let Some(progress) = handle.next_progress().await {
            on_progress(progress);
        }

        handle.wait().await
    }
}

impl<C> Drop for Binder<C> {
    fn drop(&mut self) {
        if let Some(combiner) = self.combiner.take() {
            tracing::debug!(
                target_path = %combiner.target_path().display(),
                "releasing uncommitted target"
            );
            combiner.discard();
        }
    }
}
