//! Merge-and-pad processor.
//!
//! Concatenates input documents in order and pads every document with an
//! odd page count with one blank page, so each document starts on the
//! front of a fresh sheet when printed double-sided.

use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::config::CompressionLevel;
use crate::document::{InputDocument, MergeResult, ProgressEvent};
use crate::error::Result;
use crate::io::reader::parse_document;
use crate::io::writer::{PdfWriter, WriteOptions};
use crate::merge::outcome::{DocumentOutcome, MergeReport};
use crate::merge::pages::{Accumulator, PageSize, PreparedPages};

/// Options for a merge.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Compression applied before serialization.
    pub compression: CompressionLevel,
}

/// Timing of a merge.
#[derive(Debug, Clone, Copy)]
pub struct MergeTiming {
    /// Time spent parsing and copying documents.
    pub merge_time: Duration,

    /// Time spent serializing the output.
    pub serialize_time: Duration,
}

/// Merges documents and pads odd-length ones with a blank page.
///
/// A processor holds no state between calls; every call to
/// [`Processor::process`] builds its own output document.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    options: MergeOptions,
}

impl Processor {
    /// Create a processor with default options.
    pub fn new() -> Self {
        Self {
            options: MergeOptions::default(),
        }
    }

    /// Create a processor with custom options.
    pub fn with_options(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Merge `documents` in order.
    ///
    /// `on_progress` is called once before each document with the share of
    /// documents already handled, then once more at 100% before the output
    /// is serialized.
    ///
    /// A document that cannot be parsed or copied is logged, recorded as
    /// [`DocumentOutcome::Skipped`] and contributes no pages; the merge
    /// carries on with the next one. Empty input, or input where every
    /// document fails, still produces a valid zero-page PDF.
    ///
    /// # Errors
    ///
    /// Returns [`DuplexCatError::SerializationFailed`] if the merged
    /// document cannot be serialized. No bytes are returned in that case.
    ///
    /// [`DuplexCatError::SerializationFailed`]: crate::DuplexCatError::SerializationFailed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use duplexcat::merge::Processor;
    /// # use duplexcat::InputDocument;
    /// # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
    /// let documents = vec![
    ///     InputDocument::new("a.pdf", a),
    ///     InputDocument::new("b.pdf", b),
    /// ];
    ///
    /// let result = Processor::new()
    ///     .process(documents, |event| {
    ///         println!("{:>3.0}% {}", event.percent_complete, event.message);
    ///     })
    ///     .await?;
    /// println!("{} pages", result.report.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn process<F>(
        &self,
        documents: Vec<InputDocument>,
        on_progress: F,
    ) -> Result<MergeResult>
    where
        F: FnMut(ProgressEvent),
    {
        let (result, _timing) = self.process_timed(documents, on_progress).await?;
        Ok(result)
    }

    /// Like [`Processor::process`], also returning how long each phase took.
    ///
    /// # Errors
    ///
    /// Same as [`Processor::process`].
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub async fn process_timed<F>(
        &self,
        documents: Vec<InputDocument>,
        mut on_progress: F,
    ) -> Result<(MergeResult, MergeTiming)>
    where
        F: FnMut(ProgressEvent),
    {
        let start = Instant::now();
        let total = documents.len();
        let mut accumulator = Accumulator::new();
        let mut outcomes = Vec::with_capacity(total);

        for (index, input) in documents.into_iter().enumerate() {
            on_progress(ProgressEvent::processing(&input.name, index, total));

            let name = input.name.clone();
            let outcome = match self.append_document(&mut accumulator, input).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(document = %name, error = %err, "Skipping document");
                    DocumentOutcome::skipped(name, &err)
                }
            };
            outcomes.push(outcome);
        }

        on_progress(ProgressEvent::finalizing());
        let merge_time = start.elapsed();

        let serialize_start = Instant::now();
        let result = self.finish(accumulator, outcomes).await?;
        let serialize_time = serialize_start.elapsed();

        Ok((
            result,
            MergeTiming {
                merge_time,
                serialize_time,
            },
        ))
    }

    /// Serialize the accumulated document and pair it with the report.
    async fn finish(
        &self,
        accumulator: Accumulator,
        outcomes: Vec<DocumentOutcome>,
    ) -> Result<MergeResult> {
        let document = accumulator.finish()?;
        let writer =
            PdfWriter::with_options(WriteOptions::for_compression(self.options.compression));
        let bytes = writer.to_bytes(document).await?;

        let report = MergeReport::new(outcomes);
        info!(
            merged = report.merged_count(),
            skipped = report.skipped_count(),
            pages = report.total_pages,
            bytes = bytes.len(),
            "Merge complete"
        );

        Ok(MergeResult { bytes, report })
    }

    /// Parse one document and append its pages, plus padding if needed.
    ///
    /// The accumulator is only touched once every fallible step succeeded.
    async fn append_document(
        &self,
        accumulator: &mut Accumulator,
        input: InputDocument,
    ) -> Result<DocumentOutcome> {
        let InputDocument { name, bytes } = input;

        let source = parse_document(&name, bytes).await?;
        let prepared = PreparedPages::prepare(&name, source, accumulator)?;

        let page_count = prepared.page_count();
        let padding = PageSize::padding_for(prepared.last_page_size());
        accumulator.append(prepared);

        let blank_page_added = page_count % 2 == 1;
        if blank_page_added {
            accumulator.append_blank(padding);
        }

        debug!(document = %name, page_count, blank_page_added, "Appended document");
        Ok(DocumentOutcome::Merged {
            name,
            page_count,
            blank_page_added,
        })
    }
}

/// Merge documents with a default [`Processor`], ignoring progress.
///
/// # Errors
///
/// Same as [`Processor::process`].
pub async fn merge_documents(documents: Vec<InputDocument>) -> Result<MergeResult> {
    Processor::new().process(documents, |_| {}).await
}
