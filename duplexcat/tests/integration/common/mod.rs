//! Shared fixtures for the integration tests.
//!
//! PDFs are generated in code with lopdf and written to a temporary
//! directory, so the tests need no binary fixtures.

#![allow(dead_code)]

use duplexcat::merge::PageSize;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::path::PathBuf;
use tempfile::TempDir;

/// A PDF with `pages` pages of `width` x `height` points.
///
/// Page N shows the text "`label` page N".
pub fn labelled_pdf(label: &str, pages: usize, width: i64, height: i64) -> Vec<u8> {
    build_pdf(label, pages, |page| {
        page.set(
            "MediaBox",
            vec![0.into(), 0.into(), width.into(), height.into()],
        );
    })
}

/// A US Letter PDF with `pages` pages.
pub fn letter_pdf(label: &str, pages: usize) -> Vec<u8> {
    labelled_pdf(label, pages, 612, 792)
}

/// A PDF whose pages carry no MediaBox of their own and inherit it from
/// the page tree root.
pub fn inherited_box_pdf(label: &str, pages: usize, width: i64, height: i64) -> Vec<u8> {
    let bytes = build_pdf(label, pages, |_| {});
    let mut doc = Document::load_mem(&bytes).unwrap();

    let pages_id = doc
        .catalog()
        .unwrap()
        .get(b"Pages")
        .unwrap()
        .as_reference()
        .unwrap();
    doc.get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set(
            "MediaBox",
            vec![0.into(), 0.into(), width.into(), height.into()],
        );

    save(&mut doc)
}

/// A one-page PDF whose page points at a `/Parent` object that does not
/// exist. The MediaBox sits on the real page tree root, out of reach.
pub fn dangling_parent_pdf(label: &str, width: i64, height: i64) -> Vec<u8> {
    let bytes = inherited_box_pdf(label, 1, width, height);
    let mut doc = Document::load_mem(&bytes).unwrap();

    let page_id = doc.page_iter().next().unwrap();
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("Parent", Object::Reference((999, 0)));

    save(&mut doc)
}

fn build_pdf(label: &str, pages: usize, mut decorate: impl FnMut(&mut Dictionary)) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(pages);
    for index in 0..pages {
        let content = format!("BT /F1 18 Tf 72 700 Td ({label} page {}) Tj ET", index + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        };
        decorate(&mut page);
        kids.push(Object::Reference(doc.add_object(page)));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    save(&mut doc)
}

fn save(doc: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A temporary directory holding input PDFs.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Write `bytes` to `name` and return its path.
    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).expect("Failed to write fixture");
        path
    }

    /// A path inside the directory that does not exist yet.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// One page of a merged output.
#[derive(Debug)]
pub struct OutputPage {
    pub size: Option<PageSize>,
    pub blank: bool,
    pub text: String,
}

/// Load merged output and describe each page in order.
pub fn output_pages(bytes: &[u8]) -> Vec<OutputPage> {
    let doc = Document::load_mem(bytes).expect("Merged output should parse");

    doc.get_pages()
        .into_iter()
        .map(|(number, id)| {
            let page = doc.get_dictionary(id).unwrap();
            let blank = !page.has(b"Contents");
            let text = if blank {
                String::new()
            } else {
                doc.extract_text(&[number]).unwrap_or_default()
            };
            OutputPage {
                size: PageSize::of_page(&doc, page),
                blank,
                text,
            }
        })
        .collect()
}

/// Whether two sizes agree to within a hundredth of a point.
pub fn same_size(a: PageSize, b: PageSize) -> bool {
    (a.width - b.width).abs() < 0.01 && (a.height - b.height).abs() < 0.01
}
