//! End-to-end bind operations.
//!
//! A [`BindOrchestrator`] takes an ordered list of sources and one target,
//! classifies each source, appends the usable ones in submission order and
//! produces exactly one [`BindResult`]. It is single-use: [`BindOrchestrator::run`]
//! and [`BindOrchestrator::spawn`] consume it.
//!
//! Cancellation is cooperative and only observed between sources, so an
//! append in flight always completes before the operation stops.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::bind::BinderFactory;
//! use pdfbind::model::{SourceFile, TargetDescriptor};
//!
//! # async fn example() -> pdfbind::Result<()> {
//! let factory = BinderFactory::new();
//! let sources = vec![SourceFile::new("a.pdf"), SourceFile::new("b.pdf")];
//!
//! let mut handle = factory
//!     .orchestrator(sources, TargetDescriptor::new("book.pdf"))
//!     .spawn();
//!
//! while let Some(progress) = handle.next_progress().await {
//!     println!("{}/{}", progress.completed_count, progress.total_count);
//! }
//!
//! let result = handle.wait().await?;
//! println!("appended {} sources", result.appended.len());
//! # Ok(())
//! # }
//! ```

pub mod factory;

pub use factory::{Binder, BinderFactory};

use futures::Stream;
use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{AppendFailurePolicy, BindOptions};
use crate::error::{BinderError, Result};
use crate::merge::DocumentCombiner;
use crate::model::{BindProgress, BindResult, SourceFile, SourceState, StatedSource, TargetDescriptor};
use crate::validation::{Classify, SourceClassifier};

/// Lifecycle of a bind operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    /// Sources and target are known; nothing has executed.
    Created,
    /// Classifying the current source.
    Validating,
    /// Appending the current source to the target.
    Combining,
    /// The target was committed.
    Completed,
    /// Stopped on a cancellation request; the target was discarded.
    Cancelled,
    /// Stopped on a fatal error; the target was discarded.
    Aborted,
}

impl BindState {
    /// Whether the operation has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Aborted)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: BindState) -> bool {
        use BindState::*;

        match (self, next) {
            (Created, Validating | Cancelled | Aborted) => true,
            (Validating, Combining | Completed | Cancelled | Aborted) => true,
            (Combining, Validating | Completed | Cancelled | Aborted) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BindState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Validating => "validating",
            Self::Combining => "combining",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

/// Drives one bind operation from classification to commit.
#[derive(Debug)]
pub struct BindOrchestrator<C = SourceClassifier> {
    sources: Vec<SourceFile>,
    target: TargetDescriptor,
    options: BindOptions,
    classifier: C,
    state: BindState,
}

impl BindOrchestrator<SourceClassifier> {
    /// Create an orchestrator using the standard classifier.
    pub fn new(sources: Vec<SourceFile>, target: TargetDescriptor, options: BindOptions) -> Self {
        Self::with_classifier(sources, target, options, SourceClassifier::new())
    }
}

impl<C: Classify> BindOrchestrator<C> {
    /// Create an orchestrator with a custom classifier.
    pub fn with_classifier(
        sources: Vec<SourceFile>,
        target: TargetDescriptor,
        options: BindOptions,
        classifier: C,
    ) -> Self {
        Self {
            sources,
            target,
            options,
            classifier,
            state: BindState::Created,
        }
    }

    /// Current state.
    pub fn state(&self) -> BindState {
        self.state
    }

    /// Sources in submission order.
    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    /// The output this operation produces.
    pub fn target(&self) -> &TargetDescriptor {
        &self.target
    }

    /// Execute the operation on the calling thread.
    ///
    /// `on_progress` is called once per processed source, in submission
    /// order. Cancellation through `cancel` is checked before each source.
    ///
    /// # Errors
    ///
    /// - [`BinderError::TargetCreation`] if the target cannot be allocated
    ///   or committed
    /// - [`BinderError::Append`] if a source fails to append and the
    ///   options ask to abort on append failures
    pub fn run<F>(mut self, cancel: &CancellationToken, mut on_progress: F) -> Result<BindResult>
    where
        F: FnMut(BindProgress),
    {
        let total = self.sources.len();
        let output_path = self.target.output_path.clone();

        tracing::info!(
            output = %output_path.display(),
            total,
            "starting bind operation"
        );

        let mut appended = Vec::new();
        let mut skipped = Vec::new();

        if cancel.is_cancelled() {
            self.transition(BindState::Cancelled);
            tracing::info!(output = %output_path.display(), "bind cancelled before start");
            return Ok(cancelled_result(output_path, appended, skipped));
        }

        let mut combiner =
            match DocumentCombiner::create_target(&output_path, self.options.compression) {
                Ok(combiner) => combiner,
                Err(e) => {
                    self.transition(BindState::Aborted);
                    return Err(e);
                }
            };
        self.transition(BindState::Validating);

        let sources = std::mem::take(&mut self.sources);
        for (index, source) in sources.into_iter().enumerate() {
            if cancel.is_cancelled() {
                combiner.discard();
                self.transition(BindState::Cancelled);
                tracing::info!(
                    output = %output_path.display(),
                    completed = index,
                    total,
                    "bind cancelled"
                );
                return Ok(cancelled_result(output_path, appended, skipped));
            }

            self.transition(BindState::Validating);
            let classification = self.classifier.classify_source(source.path());
            let current_source = source.display_name().to_string();

            if classification.state.is_ok() {
                self.transition(BindState::Combining);
                match combiner.append(source.path()) {
                    Ok(_) => appended.push(StatedSource::new(source, SourceState::Ok, None)),
                    Err(BinderError::Append { state, reason, .. })
                        if self.options.append_failure == AppendFailurePolicy::Skip =>
                    {
                        tracing::warn!(
                            path = %source.path().display(),
                            %state,
                            %reason,
                            "skipping source that failed to append"
                        );
                        skipped.push(StatedSource::new(source, state, Some(reason)));
                    }
                    Err(e) => {
                        combiner.discard();
                        self.transition(BindState::Aborted);
                        tracing::warn!(error = %e, "bind aborted");
                        return Err(e);
                    }
                }
            } else {
                tracing::warn!(
                    path = %source.path().display(),
                    state = %classification.state,
                    reason = classification.reason.as_deref().unwrap_or(""),
                    "skipping source"
                );
                skipped.push(StatedSource::new(
                    source,
                    classification.state,
                    classification.reason,
                ));
            }

            on_progress(BindProgress {
                completed_count: index + 1,
                total_count: total,
                current_source: Some(current_source),
            });
        }

        let finalized = match combiner.finalize() {
            Ok(finalized) => finalized,
            Err(e) => {
                self.transition(BindState::Aborted);
                return Err(e);
            }
        };
        self.transition(BindState::Completed);

        tracing::info!(
            output = %finalized.path.display(),
            appended = appended.len(),
            skipped = skipped.len(),
            pages = finalized.page_count,
            "bind completed"
        );

        Ok(BindResult {
            output_path: finalized.path,
            appended,
            skipped,
            cancelled: false,
            total_pages: finalized.page_count,
        })
    }

    fn transition(&mut self, next: BindState) {
        if self.state == next {
            return;
        }
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "bind state transition");
        self.state = next;
    }
}

impl<C: Classify + 'static> BindOrchestrator<C> {
    /// Run the operation on a dedicated blocking worker with a fresh
    /// cancellation token.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self) -> BindHandle {
        self.spawn_with_token(CancellationToken::new())
    }

    /// Run the operation on a dedicated blocking worker, observing `cancel`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_with_token(self, cancel: CancellationToken) -> BindHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker_token = cancel.clone();

        let task = tokio::task::spawn_blocking(move || {
            self.run(&worker_token, |progress| {
                // The receiver may be gone; the operation still completes.
                let _ = tx.send(progress);
            })
        });

        BindHandle {
            progress: rx,
            cancel,
            task: Some(task),
        }
    }
}

/// Handle to a spawned bind operation.
///
/// Dropping the handle before [`BindHandle::wait`] requests cancellation.
#[derive(Debug)]
pub struct BindHandle {
    progress: mpsc::UnboundedReceiver<BindProgress>,
    cancel: CancellationToken,
    task: Option<JoinHandle<Result<BindResult>>>,
}

impl BindHandle {
    /// Request cancellation at the next source boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token observed by the operation.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Next progress event, or `None` once the operation has stopped
    /// emitting.
    pub async fn next_progress(&mut self) -> Option<BindProgress> {
        self.progress.recv().await
    }

    /// Progress events as a stream.
    pub fn progress_stream(&mut self) -> impl Stream<Item = BindProgress> + '_ {
        futures::stream::poll_fn(move |cx| self.progress.poll_recv(cx))
    }

    /// Wait for the operation to end.
    ///
    /// # Errors
    ///
    /// Returns the operation's fatal error, or [`BinderError::Other`] if
    /// the worker panicked.
    pub async fn wait(mut self) -> Result<BindResult> {
        let task = self
            .task
            .take()
            .ok_or_else(|| BinderError::other("bind operation already awaited"))?;

        task.await
            .map_err(|e| BinderError::other(format!("bind worker failed: {e}")))?
    }
}

impl Drop for BindHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.cancel();
        }
    }
}

fn cancelled_result(
    output_path: std::path::PathBuf,
    appended: Vec<StatedSource>,
    skipped: Vec<StatedSource>,
) -> BindResult {
    BindResult {
        output_path,
        appended,
        skipped,
        cancelled: true,
        total_pages: 0,
    }
}
