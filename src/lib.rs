//! # pdfbind
//!
//! Bind PDF source files into a single document.
//!
//! A bind operation classifies every source, appends the usable ones in
//! submission order and commits the output atomically. Problems with
//! individual sources never stop the batch: they are reported in the
//! [`BindResult`](model::BindResult) alongside the sources that made it in.
//!
//! ## Components
//!
//! - [`validation::SourceClassifier`] decides whether a source is usable
//! - [`merge::DocumentCombiner`] owns one output from creation to commit
//! - [`bind::BindOrchestrator`] drives one operation, with progress and
//!   cancellation
//! - [`bind::BinderFactory`] hands out fresh orchestrators and binders
//! - [`filters::FileFilterRegistry`] lists the recognized document types
//!
//! ## Example
//!
//! ```no_run
//! use pdfbind::bind::BinderFactory;
//! use pdfbind::model::{SourceFile, TargetDescriptor};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> pdfbind::Result<()> {
//! let binder = BinderFactory::new().binder();
//! let result = binder
//!     .bind_async(
//!         vec![SourceFile::new("cover.pdf"), SourceFile::new("body.pdf")],
//!         TargetDescriptor::new("book.pdf"),
//!         CancellationToken::new(),
//!         |progress| println!("{}/{}", progress.completed_count, progress.total_count),
//!     )
//!     .await?;
//!
//! for skipped in &result.skipped {
//!     eprintln!("skipped {}: {}", skipped.path().display(), skipped.state);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod bind;
pub mod config;
pub mod error;
pub mod filters;
pub mod merge;
pub mod model;
pub mod output;
pub mod utils;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use bind::{BindHandle, BindOrchestrator, BindState, Binder, BinderFactory};
pub use error::{BinderError, Result};
pub use model::{BindProgress, BindResult, SourceFile, SourceState, StatedSource, TargetDescriptor};

/// Version of the pdfbind library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the pdfbind library.
pub const NAME: &str = env!("CARGO_PKG_NAME");
