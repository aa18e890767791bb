//! Per-document outcomes and the aggregate merge report.

use serde::Serialize;

use crate::error::DuplexCatError;

/// What happened to one input document during a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DocumentOutcome {
    /// All pages were copied into the output.
    #[serde(rename_all = "camelCase")]
    Merged {
        /// Document name.
        name: String,
        /// Pages copied from this document.
        page_count: usize,
        /// Whether a blank page follows this document's pages.
        blank_page_added: bool,
    },

    /// The document could not be parsed or copied and contributed nothing.
    #[serde(rename_all = "camelCase")]
    Skipped {
        /// Document name.
        name: String,
        /// Human-readable cause.
        reason: String,
    },
}

impl DocumentOutcome {
    /// Record a skipped document from the error that caused it.
    pub fn skipped(name: impl Into<String>, error: &DuplexCatError) -> Self {
        Self::Skipped {
            name: name.into(),
            reason: error.to_string(),
        }
    }

    /// Document name.
    pub fn name(&self) -> &str {
        match self {
            Self::Merged { name, .. } | Self::Skipped { name, .. } => name,
        }
    }

    /// Pages this document contributed to the output, padding included.
    pub fn output_pages(&self) -> usize {
        match self {
            Self::Merged {
                page_count,
                blank_page_added,
                ..
            } => page_count + usize::from(*blank_page_added),
            Self::Skipped { .. } => 0,
        }
    }

    /// Whether the document made it into the output.
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Summary of a whole merge, one outcome per input in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Outcomes in input order.
    pub outcomes: Vec<DocumentOutcome>,
    /// Pages in the merged output.
    pub total_pages: usize,
}

impl MergeReport {
    /// Build a report from outcomes, deriving the total page count.
    pub fn new(outcomes: Vec<DocumentOutcome>) -> Self {
        let total_pages = outcomes.iter().map(DocumentOutcome::output_pages).sum();
        Self {
            outcomes,
            total_pages,
        }
    }

    /// Number of documents that were merged.
    pub fn merged_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_merged()).count()
    }

    /// Number of documents that were skipped.
    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.merged_count()
    }

    /// Number of blank padding pages inserted.
    pub fn blank_pages_added(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    DocumentOutcome::Merged {
                        blank_page_added: true,
                        ..
                    }
                )
            })
            .count()
    }

    /// Outcomes of skipped documents only.
    pub fn skipped(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| !o.is_merged())
    }
}
