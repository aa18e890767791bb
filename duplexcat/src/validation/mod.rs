//! Dry-run inspection for duplexcat.
//!
//! This module looks at every input without merging anything and predicts
//! what a merge would produce:
//! - Page count and PDF version of each document
//! - First-page dimensions
//! - Whether a blank page would follow the document
//! - Which documents would be skipped, and why
//! - The page count of the merged output
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::validation::Validator;
//! use duplexcat::io::read_documents;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = read_documents(&[PathBuf::from("a.pdf")]).await?;
//! let summary = Validator::new().inspect(&documents).await;
//! println!("Output would have {} pages", summary.predicted_output_pages);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use serde::Serialize;
use tracing::debug;

use crate::config::{Config, OverwriteMode};
use crate::document::InputDocument;
use crate::error::{DuplexCatError, Result};
use crate::io::reader::parse_document;
use crate::merge::PageSize;
use crate::merge::pages::{Accumulator, PreparedPages};
use crate::utils::format_file_size;

/// What a merge would do with one parsable document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInspection {
    /// Document name.
    pub name: String,

    /// Number of pages in the document.
    pub page_count: usize,

    /// PDF version string, e.g. "1.7".
    pub version: String,

    /// Size of the document in bytes.
    pub file_size: u64,

    /// Number of objects in the document.
    pub object_count: usize,

    /// Dimensions of the first page, if readable.
    pub page_dimensions: Option<PageSize>,

    /// Whether a blank page would follow this document.
    pub blank_page_added: bool,
}

impl DocumentInspection {
    fn from_document(input: &InputDocument, doc: &Document) -> Self {
        let pages = doc.get_pages();
        let page_count = pages.len();

        let page_dimensions = pages
            .values()
            .next()
            .and_then(|&id| doc.get_dictionary(id).ok())
            .and_then(|page| PageSize::of_page(doc, page));

        Self {
            name: input.name.clone(),
            page_count,
            version: doc.version.clone(),
            file_size: input.len() as u64,
            object_count: doc.objects.len(),
            page_dimensions,
            blank_page_added: page_count % 2 == 1,
        }
    }

    /// Pages this document would contribute to the output, padding included.
    pub fn output_pages(&self) -> usize {
        self.page_count + usize::from(self.blank_page_added)
    }
}

/// A document a merge would skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDocument {
    /// Document name.
    pub name: String,

    /// Human-readable cause.
    pub reason: String,
}

/// Summary of a dry run over all inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Parsable documents, in input order.
    pub documents: Vec<DocumentInspection>,

    /// Documents that would be skipped, in input order.
    pub skipped: Vec<SkippedDocument>,

    /// Pages across all parsable documents, padding excluded.
    pub total_pages: usize,

    /// Blank pages the merge would insert.
    pub blank_pages: usize,

    /// Pages the merged output would have.
    pub predicted_output_pages: usize,

    /// Total input size in bytes.
    pub total_size: u64,
}

impl ValidationSummary {
    /// Create a summary from inspected and skipped documents.
    pub fn from_parts(
        documents: Vec<DocumentInspection>,
        skipped: Vec<SkippedDocument>,
    ) -> Self {
        let total_pages = documents.iter().map(|d| d.page_count).sum();
        let blank_pages = documents.iter().filter(|d| d.blank_page_added).count();
        let predicted_output_pages = documents
            .iter()
            .map(DocumentInspection::output_pages)
            .sum();
        let total_size = documents.iter().map(|d| d.file_size).sum();

        Self {
            documents,
            skipped,
            total_pages,
            blank_pages,
            predicted_output_pages,
            total_size,
        }
    }

    /// Whether any document would be skipped.
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Format the total input size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Inspects inputs and output settings before a merge.
#[derive(Debug, Clone, Default)]
pub struct Validator;

impl Validator {
    /// Create a validator.
    pub fn new() -> Self {
        Self
    }

    /// Inspect a single document.
    ///
    /// The document goes through the same page preparation as a merge, so
    /// a document that inspects cleanly is one the merge will copy.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The document cannot be parsed
    /// - The document is encrypted
    /// - Its pages cannot be prepared for copying
    pub async fn inspect_document(&self, input: &InputDocument) -> Result<DocumentInspection> {
        let doc = parse_document(&input.name, input.bytes.clone()).await?;
        let inspection = DocumentInspection::from_document(input, &doc);
        PreparedPages::prepare(&input.name, doc, &Accumulator::new())?;

        debug!(
            document = %inspection.name,
            pages = inspection.page_count,
            blank = inspection.blank_page_added,
            "Inspected document"
        );
        Ok(inspection)
    }

    /// Inspect every document and predict the merge outcome.
    ///
    /// Never fails: documents that cannot be inspected are listed in
    /// [`ValidationSummary::skipped`].
    pub async fn inspect(&self, documents: &[InputDocument]) -> ValidationSummary {
        let mut inspected = Vec::with_capacity(documents.len());
        let mut skipped = Vec::new();

        for input in documents {
            match self.inspect_document(input).await {
                Ok(inspection) => inspected.push(inspection),
                Err(e) => skipped.push(SkippedDocument {
                    name: input.name.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        ValidationSummary::from_parts(inspected, skipped)
    }

    /// Validate the output path against the overwrite policy.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output path is an existing directory
    /// - The output file exists and no-clobber is set
    pub async fn validate_output(&self, config: &Config) -> Result<()> {
        let Ok(metadata) = tokio::fs::metadata(&config.output).await else {
            return Ok(());
        };

        if metadata.is_dir() {
            return Err(DuplexCatError::not_a_file(config.output.clone()));
        }

        match config.overwrite_mode {
            OverwriteMode::NoClobber => Err(DuplexCatError::output_exists(config.output.clone())),
            // Prompting is the caller's job.
            OverwriteMode::Prompt | OverwriteMode::Force => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_pdf, sized_pdf};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_inspect_document() {
        let input = InputDocument::new("a4.pdf", sized_pdf(3, 595, 842));
        let inspection = Validator::new().inspect_document(&input).await.unwrap();

        assert_eq!(inspection.page_count, 3);
        assert_eq!(inspection.version, "1.5");
        assert!(inspection.blank_page_added);
        assert_eq!(inspection.output_pages(), 4);
        assert_eq!(inspection.page_dimensions, Some(PageSize::new(595.0, 842.0)));
    }

    #[tokio::test]
    async fn test_inspect_predicts_output() {
        let documents = vec![
            InputDocument::new("a.pdf", sample_pdf(3)),
            InputDocument::new("broken.pdf", b"nope".to_vec()),
            InputDocument::new("b.pdf", sample_pdf(4)),
        ];

        let summary = Validator::new().inspect(&documents).await;

        assert_eq!(summary.documents.len(), 2);
        assert_eq!(summary.total_pages, 7);
        assert_eq!(summary.blank_pages, 1);
        assert_eq!(summary.predicted_output_pages, 8);
        assert!(summary.has_skipped());
        assert_eq!(summary.skipped[0].name, "broken.pdf");
    }

    #[tokio::test]
    async fn test_inspect_empty_input() {
        let summary = Validator::new().inspect(&[]).await;

        assert_eq!(summary, ValidationSummary::default());
        assert!(!summary.has_skipped());
    }

    #[tokio::test]
    async fn test_summary_json_is_camel_case() {
        let documents = vec![InputDocument::new("a.pdf", sample_pdf(1))];
        let summary = Validator::new().inspect(&documents).await;

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["predictedOutputPages"], 2);
        assert_eq!(json["documents"][0]["blankPageAdded"], true);
    }

    #[tokio::test]
    async fn test_validate_output_no_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("output.pdf");
        std::fs::File::create(&output).unwrap();

        let mut config = Config::new(vec![PathBuf::from("a.pdf")]);
        config.output = output;
        config.overwrite_mode = OverwriteMode::NoClobber;

        let result = Validator::new().validate_output(&config).await;
        assert!(matches!(result, Err(DuplexCatError::OutputExists { .. })));

        config.overwrite_mode = OverwriteMode::Force;
        assert!(Validator::new().validate_output(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new(vec![PathBuf::from("a.pdf")]);
        config.output = temp_dir.path().to_path_buf();
        config.overwrite_mode = OverwriteMode::Force;

        let result = Validator::new().validate_output(&config).await;
        assert!(matches!(result, Err(DuplexCatError::NotAFile { .. })));
    }

    #[test]
    fn test_validation_summary() {
        let inspection = |name: &str, page_count: usize, file_size: u64| DocumentInspection {
            name: name.to_string(),
            page_count,
            version: "1.4".to_string(),
            file_size,
            object_count: 10,
            page_dimensions: None,
            blank_page_added: page_count % 2 == 1,
        };

        let summary = ValidationSummary::from_parts(
            vec![inspection("a.pdf", 5, 1024), inspection("b.pdf", 3, 2048)],
            Vec::new(),
        );

        assert_eq!(summary.total_pages, 8);
        assert_eq!(summary.blank_pages, 2);
        assert_eq!(summary.predicted_output_pages, 10);
        assert_eq!(summary.format_total_size(), "3.00 KB");
    }
}
