//! Integration tests for error handling and edge cases.

use duplexcat::config::{Config, OverwriteMode};
use duplexcat::error::DuplexCatError;
use duplexcat::io::{read_documents, read_input_list};
use duplexcat::merge::{DocumentOutcome, merge_documents};
use duplexcat::validation::Validator;
use duplexcat::InputDocument;
use std::path::PathBuf;

use crate::common::{FixtureDir, letter_pdf, output_pages};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let result = read_documents(&[PathBuf::from("/nonexistent/file.pdf")]).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DuplexCatError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_error_directory_input() {
    let fixtures = FixtureDir::new();
    let dir = fixtures.path("folder.pdf");
    std::fs::create_dir(&dir).unwrap();

    let result = read_documents(&[dir]).await;
    assert!(matches!(result, Err(DuplexCatError::NotAFile { .. })));
}

#[test]
fn test_error_empty_input_list() {
    let config = Config::new(vec![]);
    assert!(config.validate().is_err(), "Should fail with empty input list");
}

#[tokio::test]
async fn test_corrupted_document_is_skipped() {
    let fixtures = FixtureDir::new();
    let paths = vec![
        fixtures.write("good.pdf", &letter_pdf("Good", 2)),
        fixtures.write("corrupt.pdf", b"%PDF-1.4\nthis is not really a pdf"),
        fixtures.write("also-good.pdf", &letter_pdf("Also", 1)),
    ];

    let documents = read_documents(&paths).await.unwrap();
    let result = merge_documents(documents).await.unwrap();

    assert_eq!(result.report.merged_count(), 2);
    assert_eq!(result.report.skipped_count(), 1);
    assert!(matches!(
        &result.report.outcomes[1],
        DocumentOutcome::Skipped { name, .. } if name == "corrupt.pdf"
    ));

    let pages = output_pages(&result.bytes);
    assert_eq!(pages.len(), 4);
    assert!(pages[0].text.contains("Good page 1"));
    assert!(pages[2].text.contains("Also page 1"));
    assert!(pages[3].blank);
}

#[tokio::test]
async fn test_all_documents_failing_gives_empty_pdf() {
    let documents = vec![
        InputDocument::new("a.pdf", b"nope".to_vec()),
        InputDocument::new("b.pdf", Vec::new()),
    ];

    let result = merge_documents(documents).await.unwrap();

    assert_eq!(result.report.skipped_count(), 2);
    assert_eq!(result.report.total_pages, 0);
    assert!(output_pages(&result.bytes).is_empty());
}

#[tokio::test]
async fn test_empty_input_gives_empty_pdf() {
    let result = merge_documents(Vec::new()).await.unwrap();

    assert!(result.report.outcomes.is_empty());
    assert!(result.bytes.starts_with(b"%PDF-"));
    assert!(output_pages(&result.bytes).is_empty());
}

#[tokio::test]
async fn test_no_clobber_refuses_existing_output() {
    let fixtures = FixtureDir::new();
    let output = fixtures.write("existing.pdf", b"already here");

    let mut config = Config::new(vec![PathBuf::from("a.pdf")]);
    config.output = output;
    config.overwrite_mode = OverwriteMode::NoClobber;

    let err = Validator::new().validate_output(&config).await.unwrap_err();
    assert!(matches!(err, DuplexCatError::OutputExists { .. }));
    assert_eq!(err.exit_code(), 4);
}

#[tokio::test]
async fn test_input_list_file() {
    let fixtures = FixtureDir::new();
    let list = fixtures.write("files.txt", b"# cover first\ncover.pdf\n\n  body.pdf  \n");

    let paths = read_input_list(&list).await.unwrap();
    assert_eq!(paths, vec![PathBuf::from("cover.pdf"), PathBuf::from("body.pdf")]);

    let missing = read_input_list(&fixtures.path("missing.txt")).await;
    assert!(matches!(
        missing,
        Err(DuplexCatError::FailedToReadInputList { .. })
    ));
}
