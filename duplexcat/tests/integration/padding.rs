//! Integration tests for blank-page padding.

use duplexcat::InputDocument;
use duplexcat::merge::{PageSize, merge_documents};
use rstest::rstest;

use crate::common::{inherited_box_pdf, labelled_pdf, letter_pdf, output_pages, same_size};

#[tokio::test]
async fn test_odd_then_even_document() {
    let documents = vec![
        InputDocument::new("a.pdf", labelled_pdf("A", 3, 300, 500)),
        InputDocument::new("b.pdf", labelled_pdf("B", 4, 612, 792)),
    ];

    let result = merge_documents(documents).await.unwrap();
    let pages = output_pages(&result.bytes);

    assert_eq!(pages.len(), 8);
    assert_eq!(result.report.total_pages, 8);

    let blanks: Vec<_> = pages
        .iter()
        .enumerate()
        .filter(|(_, p)| p.blank)
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(blanks, [4]);

    let padding = pages[3].size.unwrap();
    assert!(same_size(padding, PageSize::new(300.0, 500.0)), "got {padding:?}");
    assert!(pages[4].text.contains("B page 1"));
}

#[rstest]
#[case::single_page(&[1], 2)]
#[case::single_even(&[2], 2)]
#[case::two_odd(&[1, 1], 4)]
#[case::mixed(&[2, 3, 5], 12)]
#[case::with_empty_document(&[3, 0, 2], 6)]
#[tokio::test]
async fn test_every_document_starts_on_a_front_page(
    #[case] counts: &[usize],
    #[case] expected_pages: usize,
) {
    let documents = counts
        .iter()
        .enumerate()
        .map(|(i, &n)| InputDocument::new(format!("doc{i}.pdf"), letter_pdf(&format!("D{i}"), n)))
        .collect();

    let result = merge_documents(documents).await.unwrap();
    let pages = output_pages(&result.bytes);
    assert_eq!(pages.len(), expected_pages);

    // The first page of every non-empty document lands on an odd page number.
    let mut position = 0;
    for (i, &n) in counts.iter().enumerate() {
        if n > 0 {
            assert_eq!(position % 2, 0, "document {i} starts on a back page");
            assert!(pages[position].text.contains(&format!("D{i} page 1")));
        }
        position += n + n % 2;
    }
}

#[tokio::test]
async fn test_zero_page_document_gets_no_blank() {
    let documents = vec![InputDocument::new("empty.pdf", letter_pdf("Empty", 0))];

    let result = merge_documents(documents).await.unwrap();

    assert!(result.report.outcomes[0].is_merged());
    assert_eq!(result.report.blank_pages_added(), 0);
    assert!(output_pages(&result.bytes).is_empty());
}

#[tokio::test]
async fn test_inherited_media_box_survives_merge() {
    let documents = vec![
        InputDocument::new("inherited.pdf", inherited_box_pdf("Inh", 1, 420, 595)),
        InputDocument::new("letter.pdf", letter_pdf("L", 1)),
    ];

    let result = merge_documents(documents).await.unwrap();
    let pages = output_pages(&result.bytes);

    assert_eq!(pages.len(), 4);
    assert!(same_size(pages[0].size.unwrap(), PageSize::new(420.0, 595.0)));
    assert!(same_size(pages[1].size.unwrap(), PageSize::new(420.0, 595.0)));
    assert!(same_size(pages[2].size.unwrap(), PageSize::new(612.0, 792.0)));
}

#[tokio::test]
async fn test_landscape_padding_matches_last_page() {
    let documents = vec![InputDocument::new(
        "landscape.pdf",
        labelled_pdf("Wide", 1, 842, 595),
    )];

    let result = merge_documents(documents).await.unwrap();
    let pages = output_pages(&result.bytes);

    assert!(pages[1].blank);
    assert!(same_size(pages[1].size.unwrap(), PageSize::new(842.0, 595.0)));
}
