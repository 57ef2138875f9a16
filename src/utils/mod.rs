//! Input expansion and small display helpers.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{BinderError, Result};
use crate::filters::FileFilterRegistry;

/// Expand command-line inputs into source paths, keeping argument order.
///
/// Each input is handled as follows:
/// - An existing directory expands to the registry-matching files directly
///   inside it, sorted by file name.
/// - An input containing glob metacharacters expands to its matches in
///   glob order. A pattern with no matches is an error.
/// - Anything else is passed through unchanged, even if it does not exist,
///   so the bind can report it as missing.
///
/// # Errors
///
/// Returns [`BinderError::InvalidConfig`] for malformed or empty patterns
/// and [`BinderError::Other`] for unreadable directories.
pub fn collect_source_paths<T>(inputs: T, registry: &FileFilterRegistry) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<Path>,
{
    let mut resolved = Vec::new();

    for input in inputs {
        let input = input.as_ref();

        if input.is_dir() {
            resolved.extend(expand_directory(input, registry)?);
        } else if is_pattern(input) {
            resolved.extend(expand_pattern(input)?);
        } else {
            resolved.push(input.to_path_buf());
        }
    }

    Ok(resolved)
}

fn is_pattern(path: &Path) -> bool {
    path.to_string_lossy().contains(['*', '?', '['])
}

fn expand_directory(dir: &Path, registry: &FileFilterRegistry) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            BinderError::other(format!("Failed to read {}: {err}", dir.display()))
        })?;

        if entry.file_type().is_file() && registry.matches(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    tracing::debug!(dir = %dir.display(), count = paths.len(), "expanded directory");
    Ok(paths)
}

fn expand_pattern(pattern: &Path) -> Result<Vec<PathBuf>> {
    let pattern_str = pattern.to_string_lossy();

    let entries = glob::glob(&pattern_str)
        .map_err(|err| BinderError::invalid_config(format!("Invalid pattern {pattern_str}: {err}")))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| BinderError::other(err.to_string()))?;
        paths.push(path);
    }

    if paths.is_empty() {
        return Err(BinderError::invalid_config(format!(
            "Pattern matched no files: {pattern_str}"
        )));
    }

    Ok(paths)
}

/// Format a byte count for people.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
