//! Reading input documents.
//!
//! This module turns paths into [`InputDocument`]s and parses raw bytes:
//! - Async file reads through `tokio::fs`
//! - Up-front existence checks so bad paths fail before a merge starts
//! - Input-list files (one path per line)
//! - PDF parsing on a blocking worker
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::io::reader::DocumentReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = DocumentReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (documents, stats) = reader.read_all(&paths).await?;
//! println!("Read {} files ({})", documents.len(), stats.format_total_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task;
use tracing::{debug, instrument};

use crate::document::InputDocument;
use crate::error::{DuplexCatError, Result};
use crate::utils::format_file_size;

/// Statistics for a batch read.
#[derive(Debug, Clone)]
pub struct ReadStatistics {
    /// Number of files read.
    pub files_read: usize,

    /// Total bytes read.
    pub total_size: u64,

    /// Time spent reading.
    pub read_time: Duration,
}

impl ReadStatistics {
    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Reads input documents from disk.
///
/// Contents are not checked here; a file that is not a PDF is skipped
/// later, when the merge parses it.
#[derive(Debug, Clone, Default)]
pub struct DocumentReader;

impl DocumentReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a single document.
    ///
    /// The document is named after the file name of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist
    /// - The path is a directory
    /// - The file cannot be read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use duplexcat::io::reader::DocumentReader;
    /// # use std::path::Path;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let reader = DocumentReader::new();
    /// let document = reader.read(Path::new("document.pdf")).await?;
    /// println!("{} is {} bytes", document.name, document.len());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn read(&self, path: &Path) -> Result<InputDocument> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DuplexCatError::file_not_found(path.to_path_buf())
            } else {
                DuplexCatError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(DuplexCatError::not_a_file(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DuplexCatError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            })?;

        debug!(bytes = bytes.len(), "Read input document");
        Ok(InputDocument::new(display_name(path), bytes))
    }

    /// Read documents in the order given.
    ///
    /// Stops at the first path that cannot be read.
    ///
    /// # Errors
    ///
    /// Returns the first read error encountered.
    pub async fn read_all(
        &self,
        paths: &[PathBuf],
    ) -> Result<(Vec<InputDocument>, ReadStatistics)> {
        let start = Instant::now();
        let mut documents = Vec::with_capacity(paths.len());

        for path in paths {
            documents.push(self.read(path).await?);
        }

        let stats = ReadStatistics {
            files_read: documents.len(),
            total_size: documents.iter().map(|d| d.len() as u64).sum(),
            read_time: start.elapsed(),
        };

        Ok((documents, stats))
    }
}

/// Name shown for a document read from `path`.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse PDF bytes on a blocking worker.
///
/// # Errors
///
/// Returns [`DuplexCatError::EncryptedPdf`] for password-protected files
/// and [`DuplexCatError::FailedToLoadPdf`] for anything else lopdf rejects.
pub async fn parse_document(name: &str, bytes: Vec<u8>) -> Result<Document> {
    let document = task::spawn_blocking(move || Document::load_mem(&bytes))
        .await
        .map_err(|e| DuplexCatError::other(format!("Parse task failed: {e}")))?
        .map_err(|e| DuplexCatError::from_load_error(name, e))?;

    Ok(document)
}

/// Read input paths from a list file.
///
/// One path per line. Lines starting with `#` are comments; blank lines
/// are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    if path.as_os_str() == "-" {
        return Err(DuplexCatError::invalid_config(
            "Reading the input list from stdin is not supported",
        ));
    }

    let list_error = |e| DuplexCatError::FailedToReadInputList {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::open(path).await.map_err(list_error)?;
    let mut lines = BufReader::new(file).lines();
    let mut paths = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await.map_err(list_error)? {
        line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.contains('\0') {
            return Err(DuplexCatError::InvalidInputList {
                path: path.to_path_buf(),
                line_number,
                details: "Path contains a NUL byte".to_string(),
            });
        }

        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}
