//! Source classification for pdfbind.
//!
//! Every candidate input is inspected once per operation and mapped to a
//! [`SourceState`]. Classification never fails: a missing, corrupted or
//! encrypted file is a result, not an error, so one bad file cannot stop the
//! classification of its siblings.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::validation::SourceClassifier;
//! use pdfbind::model::SourceState;
//!
//! let classifier = SourceClassifier::new();
//! match classifier.classify("chapter-1.pdf") {
//!     SourceState::Ok => println!("ready to bind"),
//!     other => println!("skipping: {other}"),
//! }
//! ```

use lopdf::{Document, Object};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::SourceState;

/// Bytes searched for the `%PDF-` signature. Some producers prepend junk.
const HEADER_WINDOW: usize = 1024;

/// Bytes at the end of the file searched for the trailer's `/Encrypt` key
/// when the document cannot be parsed.
const TRAILER_WINDOW: usize = 2048;

const PDF_SIGNATURE: &[u8] = b"%PDF-";
const ENCRYPT_KEY: &[u8] = b"/Encrypt";

/// Detailed outcome of inspecting one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Path that was inspected.
    pub path: PathBuf,

    /// Resulting state.
    pub state: SourceState,

    /// Why the source is not `Ok`.
    pub reason: Option<String>,

    /// Number of pages, for `Ok` sources.
    pub page_count: Option<usize>,

    /// Declared PDF version, for parsed sources.
    pub version: Option<String>,

    /// Size of the file in bytes, when it could be read.
    pub file_size: Option<u64>,
}

impl Classification {
    /// An `Ok` classification with no details, for classifiers that only
    /// decide acceptance.
    pub fn accepted(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: SourceState::Ok,
            reason: None,
            page_count: None,
            version: None,
            file_size: None,
        }
    }

    /// A rejected classification with the given state and reason.
    pub fn with_state(path: impl Into<PathBuf>, state: SourceState, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state,
            reason: Some(reason.into()),
            page_count: None,
            version: None,
            file_size: None,
        }
    }

    fn rejected(path: &Path, rejection: Rejection, file_size: Option<u64>) -> Self {
        Self {
            path: path.to_path_buf(),
            state: rejection.state,
            reason: Some(rejection.reason),
            page_count: None,
            version: None,
            file_size,
        }
    }
}

/// Why a source cannot be used, in classification terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rejection {
    pub(crate) state: SourceState,
    pub(crate) reason: String,
}

impl Rejection {
    fn new(state: SourceState, reason: impl Into<String>) -> Self {
        Self {
            state,
            reason: reason.into(),
        }
    }
}

/// Something that can classify sources for a bind operation.
///
/// The orchestrator is generic over this so alternative acceptance rules
/// can be plugged in. [`SourceClassifier`] is the standard implementation.
pub trait Classify: Send {
    /// Inspect the source at `path`.
    fn classify_source(&self, path: &Path) -> Classification;
}

impl Classify for SourceClassifier {
    fn classify_source(&self, path: &Path) -> Classification {
        self.inspect(path)
    }
}

/// Classifier for candidate source files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceClassifier;

impl SourceClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Determine the state of the source at `path`.
    pub fn classify(&self, path: impl AsRef<Path>) -> SourceState {
        self.inspect(path).state
    }

    /// Inspect the source at `path` and report details alongside its state.
    pub fn inspect(&self, path: impl AsRef<Path>) -> Classification {
        let path = path.as_ref();

        let bytes = match read_source(path) {
            Ok(bytes) => bytes,
            Err(rejection) => return Classification::rejected(path, rejection, None),
        };
        let file_size = Some(bytes.len() as u64);

        let classification = match parse_source(&bytes) {
            Ok(doc) => Classification {
                path: path.to_path_buf(),
                state: SourceState::Ok,
                reason: None,
                page_count: Some(doc.get_pages().len()),
                version: Some(doc.version.clone()),
                file_size,
            },
            Err(rejection) => Classification::rejected(path, rejection, file_size),
        };

        tracing::debug!(
            path = %path.display(),
            state = %classification.state,
            reason = classification.reason.as_deref().unwrap_or(""),
            "classified source"
        );

        classification
    }
}

/// Read and parse a source, returning the document only if it is usable.
///
/// Shared by classification and by the combiner's append, so both apply
/// the same acceptance rules.
pub(crate) fn load_source(path: &Path) -> std::result::Result<Document, Rejection> {
    let bytes = read_source(path)?;
    parse_source(&bytes)
}

/// Read the whole file through a scoped handle.
fn read_source(path: &Path) -> std::result::Result<Vec<u8>, Rejection> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| Rejection::new(SourceState::Missing, format!("cannot access file: {e}")))?;

    if !metadata.is_file() {
        return Err(Rejection::new(SourceState::Missing, "not a regular file"));
    }

    std::fs::read(path)
        .map_err(|e| Rejection::new(SourceState::Missing, format!("cannot read file: {e}")))
}

fn parse_source(bytes: &[u8]) -> std::result::Result<Document, Rejection> {
    if bytes.is_empty() {
        return Err(Rejection::new(SourceState::Unreadable, "file is empty"));
    }

    let window = &bytes[..bytes.len().min(HEADER_WINDOW)];
    if !contains(window, PDF_SIGNATURE) {
        return Err(Rejection::new(
            SourceState::Unreadable,
            "missing %PDF- signature",
        ));
    }

    let mut doc = Document::load_mem(bytes).map_err(|e| {
        let message = e.to_string();
        let trailer = &bytes[bytes.len().saturating_sub(TRAILER_WINDOW)..];
        if contains(trailer, ENCRYPT_KEY) || mentions_encryption(&message) {
            Rejection::new(SourceState::Protected, format!("encrypted document: {message}"))
        } else {
            Rejection::new(SourceState::Unreadable, format!("cannot parse document: {message}"))
        }
    })?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        open_without_password(&mut doc)?;
    }

    if doc.get_pages().is_empty() {
        return Err(Rejection::new(SourceState::Unreadable, "document has no pages"));
    }

    Ok(doc)
}

/// Leave an encrypted document decrypted and free of its `/Encrypt` entry,
/// or reject it if opening it needs a user password.
fn open_without_password(doc: &mut Document) -> std::result::Result<(), Rejection> {
    if doc.encryption_state.is_some() {
        // The reader already decrypted every object with the empty password.
        if let Some(Object::Reference(id)) = doc.trailer.remove(b"Encrypt") {
            doc.objects.remove(&id);
        }
        return Ok(());
    }

    doc.decrypt("").map_err(|e| {
        Rejection::new(
            SourceState::Protected,
            format!("document is encrypted and requires a password: {e}"),
        )
    })
}

fn mentions_encryption(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("encrypt") || message.contains("decrypt") || message.contains("password")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
