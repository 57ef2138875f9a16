//! Combining validated sources into one output document.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::merge::DocumentCombiner;
//! use pdfbind::config::CompressionLevel;
//!
//! # fn example() -> pdfbind::Result<()> {
//! let mut combiner = DocumentCombiner::create_target("book.pdf", CompressionLevel::Standard)?;
//! combiner.append("preface.pdf")?;
//! combiner.append("chapter-1.pdf")?;
//! let finalized = combiner.finalize()?;
//! println!("Wrote {} pages", finalized.page_count);
//! # Ok(())
//! # }
//! ```

pub mod combiner;
pub(crate) mod pages;

pub use combiner::{DocumentCombiner, FinalizedTarget};
