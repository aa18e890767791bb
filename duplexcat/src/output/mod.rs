//! Output formatting and display for duplexcat.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Progress indicators
//! - Dry-run and merge summaries
//! - Print advice
//!
//! # Examples
//!
//! ```no_run
//! use duplexcat::output::OutputFormatter;
//! use duplexcat::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Merging 3 document(s)");
//! formatter.success("Merge completed");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::merge::{DocumentOutcome, MergeReport, PageSize};
use crate::validation::ValidationSummary;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Display a dry-run summary to the user.
///
/// # Arguments
///
/// * `formatter` - Output formatter to use
/// * `summary` - Inspection results to display
pub fn display_validation_summary(formatter: &OutputFormatter, summary: &ValidationSummary) {
    for (index, doc) in summary.documents.iter().enumerate() {
        let padding = if doc.blank_page_added {
            " + 1 blank"
        } else {
            ""
        };
        formatter.list_item(
            index + 1,
            &format!("{}: {} page(s){padding}", doc.name, doc.page_count),
        );
        formatter.detail("PDF version", &doc.version);
        formatter.detail("Objects", &doc.object_count.to_string());
        if let Some(size) = doc.page_dimensions {
            formatter.detail("Page size", &describe_page_size(size));
        }
    }

    for skipped in &summary.skipped {
        formatter.warning(&format!("Would skip {}: {}", skipped.name, skipped.reason));
    }

    formatter.info(&format!(
        "Inspected {} file(s), {}: {} pages + {} blank = {} pages in output",
        summary.documents.len() + summary.skipped.len(),
        summary.format_total_size(),
        summary.total_pages,
        summary.blank_pages,
        summary.predicted_output_pages
    ));
}

/// Display the outcome of a merge.
///
/// Skipped documents are always reported, even in quiet mode.
pub fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport) {
    for outcome in &report.outcomes {
        match outcome {
            DocumentOutcome::Merged {
                name,
                page_count,
                blank_page_added,
            } => {
                let padding = if *blank_page_added { ", padded" } else { "" };
                formatter.debug(&format!("{name}: {page_count} page(s){padding}"));
            }
            DocumentOutcome::Skipped { name, reason } => {
                formatter.warning(&format!("Skipped {name}: {reason}"));
            }
        }
    }

    formatter.info(&format!(
        "Merged {} of {} document(s): {} pages ({} blank added)",
        report.merged_count(),
        report.outcomes.len(),
        report.total_pages,
        report.blank_pages_added()
    ));
}

/// Display print advice for one document.
pub fn display_advice(formatter: &OutputFormatter, name: &str, advice: &str) {
    formatter.section(&format!("Print advice for {name}:"));
    formatter.block(advice);
}

/// Describe a page size in points, naming A4 and US Letter.
pub fn describe_page_size(size: PageSize) -> String {
    let close = |a: f32, b: f32| (a - b).abs() < 1.0;
    let portrait = (size.width.min(size.height), size.width.max(size.height));

    let name = if close(portrait.0, 595.28) && close(portrait.1, 841.89) {
        " (A4)"
    } else if close(portrait.0, 612.0) && close(portrait.1, 792.0) {
        " (Letter)"
    } else {
        ""
    };

    format!("{:.0} x {:.0} pt{name}", size.width, size.height)
}
