//! Values that flow in and out of a merge.

use serde::Serialize;

use crate::merge::MergeReport;

/// One PDF supplied by the caller, in the order it should appear.
///
/// The merge takes ownership for the duration of a single call and never
/// mutates the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    /// Display name, usually the file name.
    pub name: String,
    /// Raw PDF bytes.
    pub bytes: Vec<u8>,
}

impl InputDocument {
    /// Create an input document from a name and its bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Size of the raw document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document carries no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Progress notification emitted while a merge runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    /// Human-readable status line.
    pub message: String,
    /// Completion in the range `0.0..=100.0`.
    pub percent_complete: f64,
}

impl ProgressEvent {
    /// Event announcing that the document at `index` (of `total`) is next.
    pub fn processing(name: &str, index: usize, total: usize) -> Self {
        let percent_complete = if total == 0 {
            0.0
        } else {
            index as f64 / total as f64 * 100.0
        };
        Self {
            message: format!("Processing {name}..."),
            percent_complete,
        }
    }

    /// Final event emitted once every document has been visited.
    pub fn finalizing() -> Self {
        Self {
            message: "Building final document...".to_string(),
            percent_complete: 100.0,
        }
    }
}

/// The merged PDF and what happened to each input.
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Serialized output PDF.
    pub bytes: Vec<u8>,
    /// Per-document outcomes in input order.
    pub report: MergeReport,
}
