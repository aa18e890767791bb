//! duplexcat - Merge PDF files into one print job for double-sided printing.
//!
//! Every document in the output starts on the front of a fresh sheet: a
//! document with an odd number of pages is followed by one blank page sized
//! like its last page. The library supports:
//!
//! - Order-preserving merges with blank-page padding
//! - Per-document outcomes, so one broken input never sinks the batch
//! - Dry-run inspection that predicts the output
//! - Optional print advice from a hosted text model
//!
//! # Examples
//!
//! ## Merge in memory
//!
//! ```no_run
//! use duplexcat::{InputDocument, Processor};
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let documents = vec![
//!     InputDocument::new("cover.pdf", a),
//!     InputDocument::new("report.pdf", b),
//! ];
//!
//! let result = Processor::new().process(documents, |_| {}).await?;
//! println!(
//!     "{} pages, {} blank page(s) added",
//!     result.report.total_pages,
//!     result.report.blank_pages_added()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Merge files on disk
//!
//! ```no_run
//! use duplexcat::io::{PdfWriter, read_documents};
//! use duplexcat::merge::merge_documents;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = read_documents(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]).await?;
//! let result = merge_documents(documents).await?;
//!
//! PdfWriter::new()
//!     .write_bytes(&result.bytes, Path::new("print-job-ready.pdf"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod advisory;
pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use document::{InputDocument, MergeResult, ProgressEvent};
pub use error::{DuplexCatError, Result};
pub use merge::{DocumentOutcome, MergeReport, Processor};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
