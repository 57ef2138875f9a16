//! Output formatting and display for pdfbind.
//!
//! This module handles all user-facing output of the binary:
//! - Formatted status messages
//! - Progress driven by bind events
//! - Bind and dry-run reports
//!
//! Diagnostics for operators go through `tracing` instead.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::output::OutputFormatter;
//! use pdfbind::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Binding sources");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::model::BindResult;
use crate::utils::format_file_size;
use crate::validation::Classification;

/// Report the outcome of a bind operation.
pub fn display_bind_result(formatter: &OutputFormatter, result: &BindResult) {
    for skipped in &result.skipped {
        let reason = skipped.reason.as_deref().unwrap_or("no details");
        formatter.warning(&format!(
            "Skipped {} ({}): {reason}",
            skipped.path().display(),
            skipped.state
        ));
    }

    if result.cancelled {
        formatter.warning(&format!(
            "Cancelled after {} source(s); {} was not written",
            result.appended.len() + result.skipped.len(),
            result.output_path.display()
        ));
        return;
    }

    if formatter.is_verbose() {
        formatter.section("Appended");
        for (index, appended) in result.appended.iter().enumerate() {
            formatter.list_item(index + 1, appended.source.display_name());
        }
        formatter.blank_line();
    }

    formatter.success(&format!(
        "Created {}: {} page(s) from {} source(s), {} skipped",
        result.output_path.display(),
        result.total_pages,
        result.appended.len(),
        result.skipped.len()
    ));
}

/// Report the classification of one source in a dry run.
pub fn display_classification(
    formatter: &OutputFormatter,
    index: usize,
    classification: &Classification,
) {
    let path = classification.path.display();

    if classification.state.is_ok() {
        let pages = classification.page_count.unwrap_or(0);
        formatter.list_item(index, &format!("{path}: ok, {pages} page(s)"));
    } else {
        let reason = classification.reason.as_deref().unwrap_or("no details");
        formatter.list_item(
            index,
            &format!("{path}: {} ({reason})", classification.state),
        );
    }

    if let Some(ref version) = classification.version {
        formatter.detail("PDF version", version);
    }
    if let Some(size) = classification.file_size {
        formatter.detail("Size", &format_file_size(size));
    }
}
