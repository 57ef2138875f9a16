//! Recognized document types.
//!
//! The registry is a plain data holder. Presentation layers use it to build
//! file-picker filters; the CLI uses [`FileFilterRegistry::matches`] when a
//! directory is given as input.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recognized document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeDescriptor {
    description: String,
    extensions: Vec<String>,
    sort_priority: i32,
}

impl DocumentTypeDescriptor {
    /// Create a descriptor. Extensions are given without the leading dot.
    pub fn new<I, S>(description: impl Into<String>, extensions: I, sort_priority: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            sort_priority,
        }
    }

    /// Human-readable description, e.g. "PDF Document".
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Extensions in declaration order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Lower values are listed first.
    pub fn sort_priority(&self) -> i32 {
        self.sort_priority
    }

    /// Picker pattern such as `*.pdf;*.PDF`.
    pub fn pattern(&self) -> String {
        self.extensions
            .iter()
            .map(|ext| format!("*.{}", ext.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Whether `path` carries one of this descriptor's extensions.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };

        self.extensions
            .iter()
            .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Ordered set of [`DocumentTypeDescriptor`]s.
#[derive(Debug, Clone, Default)]
pub struct FileFilterRegistry {
    descriptors: Vec<DocumentTypeDescriptor>,
}

impl FileFilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the PDF descriptor registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DocumentTypeDescriptor::new("PDF Document", ["pdf"], 0));
        registry
    }

    /// Add a descriptor.
    ///
    /// It is placed after every descriptor whose priority is lower or equal,
    /// so equal priorities keep insertion order.
    pub fn register(&mut self, descriptor: DocumentTypeDescriptor) {
        let at = self
            .descriptors
            .partition_point(|d| d.sort_priority <= descriptor.sort_priority);
        self.descriptors.insert(at, descriptor);
    }

    /// Descriptors sorted by priority, then insertion order.
    pub fn filters(&self) -> &[DocumentTypeDescriptor] {
        &self.descriptors
    }

    /// Whether any registered descriptor matches `path`.
    pub fn matches(&self, path: &Path) -> bool {
        self.descriptors.iter().any(|d| d.matches(path))
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
