//! Integration tests for merging files from disk.

use duplexcat::config::CompressionLevel;
use duplexcat::io::{DocumentReader, PdfWriter, read_documents};
use duplexcat::merge::{DocumentOutcome, MergeOptions, Processor, merge_documents};

use crate::common::{FixtureDir, letter_pdf, output_pages};

#[tokio::test]
async fn test_merge_two_files_to_disk() {
    let fixtures = FixtureDir::new();
    let a = fixtures.write("a.pdf", &letter_pdf("A", 2));
    let b = fixtures.write("b.pdf", &letter_pdf("B", 2));
    let output = fixtures.path("nested/print-job-ready.pdf");

    let documents = read_documents(&[a, b]).await.unwrap();
    let result = merge_documents(documents).await.unwrap();
    let stats = PdfWriter::new()
        .write_bytes(&result.bytes, &output)
        .await
        .unwrap();

    assert!(output.exists(), "Output file was not created");
    assert_eq!(stats.file_size, result.bytes.len() as u64);
    assert_eq!(result.report.merged_count(), 2);
    assert_eq!(result.report.total_pages, 4);

    let written = std::fs::read(&output).unwrap();
    assert_eq!(output_pages(&written).len(), 4);
}

#[tokio::test]
async fn test_merge_preserves_input_order() {
    let fixtures = FixtureDir::new();
    let paths = vec![
        fixtures.write("second.pdf", &letter_pdf("Second", 2)),
        fixtures.write("first.pdf", &letter_pdf("First", 2)),
    ];

    let documents = read_documents(&paths).await.unwrap();
    let names: Vec<_> = documents.iter().map(|d| d.name.clone()).collect();
    assert_eq!(names, ["second.pdf", "first.pdf"]);

    let result = merge_documents(documents).await.unwrap();
    let pages = output_pages(&result.bytes);

    let texts: Vec<_> = pages.iter().map(|p| p.text.trim().to_string()).collect();
    assert!(texts[0].contains("Second page 1"), "got {texts:?}");
    assert!(texts[1].contains("Second page 2"), "got {texts:?}");
    assert!(texts[2].contains("First page 1"), "got {texts:?}");
    assert!(texts[3].contains("First page 2"), "got {texts:?}");
}

#[tokio::test]
async fn test_single_even_document_is_unchanged_in_length() {
    let fixtures = FixtureDir::new();
    let path = fixtures.write("even.pdf", &letter_pdf("Even", 4));

    let documents = read_documents(&[path]).await.unwrap();
    let result = merge_documents(documents).await.unwrap();

    assert_eq!(result.report.blank_pages_added(), 0);
    assert_eq!(
        result.report.outcomes,
        vec![DocumentOutcome::Merged {
            name: "even.pdf".to_string(),
            page_count: 4,
            blank_page_added: false,
        }]
    );
    assert!(output_pages(&result.bytes).iter().all(|p| !p.blank));
}

#[tokio::test]
async fn test_merge_without_compression() {
    let fixtures = FixtureDir::new();
    let path = fixtures.write("plain.pdf", &letter_pdf("Plain", 1));

    let (documents, stats) = DocumentReader::new().read_all(&[path]).await.unwrap();
    assert_eq!(stats.files_read, 1);

    let processor = Processor::with_options(MergeOptions {
        compression: CompressionLevel::None,
    });
    let result = processor.process(documents, |_| {}).await.unwrap();

    let pages = output_pages(&result.bytes);
    assert_eq!(pages.len(), 2);
    assert!(pages[0].text.contains("Plain page 1"));
    assert!(pages[1].blank);
}

#[tokio::test]
async fn test_atomic_write_leaves_no_temp_file() {
    let fixtures = FixtureDir::new();
    let path = fixtures.write("a.pdf", &letter_pdf("A", 1));
    let output = fixtures.path("out.pdf");

    let documents = read_documents(&[path]).await.unwrap();
    let result = merge_documents(documents).await.unwrap();
    PdfWriter::new()
        .write_bytes(&result.bytes, &output)
        .await
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(output.parent().unwrap())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
