//! Merge-and-pad operations.
//!
//! This module provides the core merge functionality:
//! - Document concatenation in input order
//! - Blank padding after documents with an odd page count
//! - Per-document outcomes, so one bad input never sinks the batch
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::merge::Processor;
//! use duplexcat::io::read_documents;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = read_documents(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]).await?;
//!
//! let result = Processor::new().process(documents, |_| {}).await?;
//! println!(
//!     "Merged {} documents into {} pages ({} blank)",
//!     result.report.merged_count(),
//!     result.report.total_pages,
//!     result.report.blank_pages_added()
//! );
//! # Ok(())
//! # }
//! ```

pub mod outcome;
pub mod pages;
pub mod processor;

pub use outcome::{DocumentOutcome, MergeReport};
pub use pages::PageSize;
pub use processor::{MergeOptions, MergeTiming, Processor, merge_documents};
