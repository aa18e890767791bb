//! Integration tests for dry-run inspection.

use duplexcat::InputDocument;
use duplexcat::io::read_documents;
use duplexcat::merge::{PageSize, merge_documents};
use duplexcat::validation::Validator;

use crate::common::{
    FixtureDir, dangling_parent_pdf, labelled_pdf, letter_pdf, output_pages, same_size,
};

#[tokio::test]
async fn test_dry_run_does_not_create_output() {
    let fixtures = FixtureDir::new();
    let path = fixtures.write("simple.pdf", &letter_pdf("S", 1));
    let output = fixtures.path("print-job-ready.pdf");

    let documents = read_documents(&[path]).await.unwrap();
    let summary = Validator::new().inspect(&documents).await;

    assert_eq!(summary.predicted_output_pages, 2);
    assert!(!output.exists(), "Output file should not be created in dry run");
}

#[tokio::test]
async fn test_prediction_matches_merge() {
    let documents = vec![
        InputDocument::new("a.pdf", letter_pdf("A", 3)),
        InputDocument::new("b.pdf", letter_pdf("B", 4)),
        InputDocument::new("c.pdf", letter_pdf("C", 5)),
        InputDocument::new("broken.pdf", b"garbage".to_vec()),
    ];

    let summary = Validator::new().inspect(&documents).await;
    let result = merge_documents(documents).await.unwrap();

    assert_eq!(summary.predicted_output_pages, result.report.total_pages);
    assert_eq!(summary.blank_pages, result.report.blank_pages_added());
    assert_eq!(summary.skipped.len(), result.report.skipped_count());
}

#[tokio::test]
async fn test_inspection_details() {
    let documents = vec![InputDocument::new(
        "a5.pdf",
        labelled_pdf("A5", 2, 420, 595),
    )];

    let summary = Validator::new().inspect(&documents).await;
    let inspection = &summary.documents[0];

    assert_eq!(inspection.name, "a5.pdf");
    assert_eq!(inspection.page_count, 2);
    assert!(!inspection.blank_page_added);
    assert_eq!(inspection.page_dimensions, Some(PageSize::new(420.0, 595.0)));
    assert!(inspection.file_size > 0);
    assert_eq!(summary.total_size, inspection.file_size);
}

#[tokio::test]
async fn test_summary_serializes_for_json_output() {
    let documents = vec![
        InputDocument::new("a.pdf", letter_pdf("A", 1)),
        InputDocument::new("broken.pdf", b"garbage".to_vec()),
    ];

    let summary = Validator::new().inspect(&documents).await;
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["blankPages"], 1);
    assert_eq!(json["predictedOutputPages"], 2);
    assert_eq!(json["documents"][0]["pageCount"], 1);
    assert_eq!(json["skipped"][0]["name"], "broken.pdf");
}

#[tokio::test]
async fn test_empty_document_prediction_matches_merge() {
    let documents = vec![
        InputDocument::new("empty.pdf", letter_pdf("E", 0)),
        InputDocument::new("one.pdf", letter_pdf("O", 1)),
    ];

    let summary = Validator::new().inspect(&documents).await;
    let result = merge_documents(documents).await.unwrap();

    assert!(!summary.has_skipped());
    assert_eq!(summary.documents[0].page_count, 0);
    assert!(!summary.documents[0].blank_page_added);
    assert_eq!(summary.predicted_output_pages, 2);
    assert_eq!(result.report.total_pages, 2);
}

#[tokio::test]
async fn test_dangling_parent_is_merged_and_predicted() {
    let documents = vec![InputDocument::new(
        "dangling.pdf",
        dangling_parent_pdf("D", 300, 500),
    )];

    let summary = Validator::new().inspect(&documents).await;
    let result = merge_documents(documents).await.unwrap();

    assert!(!summary.has_skipped());
    assert_eq!(summary.predicted_output_pages, 2);

    assert_eq!(result.report.skipped_count(), 0);
    assert_eq!(result.report.total_pages, 2);

    let pages = output_pages(&result.bytes);
    assert_eq!(pages.len(), 2);
    assert!(pages[0].text.contains("D page 1"));
    assert!(pages[1].blank);
    assert!(same_size(pages[1].size.unwrap(), PageSize::A4));
}
