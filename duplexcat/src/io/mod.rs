//! I/O operations for duplexcat.
//!
//! This module handles everything that touches the filesystem:
//! - Reading input documents from disk
//! - Parsing raw PDF bytes
//! - Serializing and writing the merged PDF
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::io::{DocumentReader, PdfWriter};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = DocumentReader::new();
//! let document = reader.read(Path::new("input.pdf")).await?;
//!
//! let writer = PdfWriter::new();
//! writer.write_bytes(&document.bytes, Path::new("copy.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{DocumentReader, ReadStatistics, parse_document, read_input_list};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};

use crate::document::InputDocument;
use crate::error::Result;
use std::path::PathBuf;

/// Read documents from paths in order.
///
/// Convenience function around [`DocumentReader::read_all`].
///
/// # Errors
///
/// Returns the first read error encountered.
///
/// # Examples
///
/// ```no_run
/// use duplexcat::io::read_documents;
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let documents = read_documents(&[PathBuf::from("a.pdf")]).await?;
/// println!("Read {} documents", documents.len());
/// # Ok(())
/// # }
/// ```
pub async fn read_documents(paths: &[PathBuf]) -> Result<Vec<InputDocument>> {
    let (documents, _stats) = DocumentReader::new().read_all(paths).await?;
    Ok(documents)
}
