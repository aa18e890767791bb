//! PDF serialization and output writing.
//!
//! This module provides safe PDF output with:
//! - Serialization of the merged document to bytes
//! - Atomic writes (write to temp file, then rename)
//! - Compression support
//! - Output directory creation
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let bytes = writer.to_bytes(doc).await?;
//! writer.write_bytes(&bytes, Path::new("print-job-ready.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::task;
use tracing::debug;

use crate::config::CompressionLevel;
use crate::error::{DuplexCatError, Result};
use crate::utils::format_file_size;

/// Options for serializing and writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress streams before serializing.
    pub compress: bool,

    /// Renumber objects contiguously before serializing.
    pub optimize: bool,

    /// Create missing parent directories of the output path.
    pub create_dirs: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl WriteOptions {
    /// Default options with compression taken from `level`.
    pub fn for_compression(level: CompressionLevel) -> Self {
        Self {
            compress: level == CompressionLevel::Standard,
            ..Default::default()
        }
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: true,
            create_dirs: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Serializes documents and writes them to disk.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self {
            options: WriteOptions::default(),
        }
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Create a writer without compression.
    pub fn without_compression() -> Self {
        Self {
            options: WriteOptions {
                compress: false,
                ..Default::default()
            },
        }
    }

    /// Options this writer was built with.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Serialize a document to bytes on a blocking worker.
    ///
    /// # Errors
    ///
    /// Returns [`DuplexCatError::SerializationFailed`] if lopdf cannot
    /// serialize the document. No partial bytes are returned.
    pub async fn to_bytes(&self, mut doc: Document) -> Result<Vec<u8>> {
        let options = self.options.clone();

        let bytes = task::spawn_blocking(move || {
            if options.compress {
                doc.compress();
            }
            if options.optimize {
                doc.renumber_objects();
            }

            let mut buffer = Vec::new();
            doc.save_to(&mut buffer)
                .map_err(|e| DuplexCatError::serialization_failed(e.to_string()))?;
            Ok::<_, DuplexCatError>(buffer)
        })
        .await
        .map_err(|e| DuplexCatError::serialization_failed(format!("Serialize task failed: {e}")))??;

        debug!(bytes = bytes.len(), "Serialized document");
        Ok(bytes)
    }

    /// Write serialized bytes to `path`.
    ///
    /// With atomic writes enabled the bytes go to a sibling temp file which
    /// is renamed over `path` once flushed, so a failed write never leaves
    /// a truncated output behind.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output directory cannot be created
    /// - The file cannot be created
    /// - Writing, flushing or renaming fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use duplexcat::io::writer::PdfWriter;
    /// # use std::path::Path;
    /// # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
    /// let writer = PdfWriter::new();
    /// let stats = writer.write_bytes(&bytes, Path::new("out.pdf")).await?;
    /// println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn write_bytes(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        if self.options.create_dirs
            && let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DuplexCatError::FailedToCreateOutput {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }

        let write_path = if self.options.atomic {
            temp_path_for(path)
        } else {
            path.to_path_buf()
        };

        let result = self.write_to(bytes, &write_path).await;
        if let Err(e) = result {
            if self.options.atomic {
                let _ = tokio::fs::remove_file(&write_path).await;
            }
            return Err(e);
        }

        if self.options.atomic {
            tokio::fs::rename(&write_path, path)
                .await
                .map_err(|e| DuplexCatError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }

        let stats = WriteStatistics {
            write_time: start.elapsed(),
            file_size: bytes.len() as u64,
            output_path: path.to_path_buf(),
        };
        debug!(path = %path.display(), size = %stats.format_file_size(), "Wrote output");
        Ok(stats)
    }

    async fn write_to(&self, bytes: &[u8], write_path: &Path) -> Result<()> {
        let file = tokio::fs::File::create(write_path).await.map_err(|e| {
            DuplexCatError::FailedToCreateOutput {
                path: write_path.to_path_buf(),
                source: e,
            }
        })?;

        let write_error = |e| DuplexCatError::FailedToWrite {
            path: write_path.to_path_buf(),
            source: e,
        };

        let mut writer = tokio::io::BufWriter::with_capacity(self.options.buffer_size, file);
        writer.write_all(bytes).await.map_err(write_error)?;
        writer.flush().await.map_err(write_error)?;
        writer.into_inner().sync_all().await.map_err(write_error)?;

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    /// Remove an output file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn remove_if_exists(&self, path: &Path) -> Result<()> {
        if self.exists(path).await {
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| DuplexCatError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }
}

/// Temp file next to `path`, so the final rename stays on one filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
