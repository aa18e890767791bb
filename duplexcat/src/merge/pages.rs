//! Page-tree plumbing for the merge.
//!
//! This module handles page-level operations including:
//! - The empty accumulator document that collects merged pages
//! - Preparing a source document's pages for transplanting
//! - Blank padding pages
//! - Page size measurement

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use serde::Serialize;

use crate::error::{DuplexCatError, Result};

/// Page attributes a page may inherit from its ancestors in the page tree.
///
/// They are copied onto each page before it is re-parented, otherwise the
/// page would lose them once it hangs off the accumulator's root node.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Upper bound on page-tree depth while resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Page dimensions in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl PageSize {
    /// ISO A4, used for padding when no page size can be measured.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// Create a page size from width and height in points.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size of the blank page that pads a document whose last copied page
    /// measured `last_copied`.
    pub fn padding_for(last_copied: Option<PageSize>) -> PageSize {
        last_copied.unwrap_or(Self::A4)
    }

    /// Read a size from a `MediaBox` style rectangle `[llx lly urx ury]`.
    ///
    /// Returns `None` unless the array holds four numbers describing a
    /// rectangle with non-zero area.
    pub fn from_rectangle(rect: &Object) -> Option<Self> {
        let Object::Array(values) = rect else {
            return None;
        };
        if values.len() != 4 {
            return None;
        }

        let llx = number(&values[0])?;
        let lly = number(&values[1])?;
        let urx = number(&values[2])?;
        let ury = number(&values[3])?;

        let width = (urx - llx).abs();
        let height = (ury - lly).abs();
        if width == 0.0 || height == 0.0 {
            return None;
        }

        Some(Self { width, height })
    }

    /// Measure a page's `MediaBox`, following an indirect reference if needed.
    pub fn of_page(doc: &Document, page: &Dictionary) -> Option<Self> {
        let media_box = page.get(b"MediaBox").ok()?;
        let media_box = match media_box {
            Object::Reference(id) => doc.get_object(*id).ok()?,
            direct => direct,
        };
        Self::from_rectangle(media_box)
    }

    fn to_rectangle(self) -> Object {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(self.width),
            Object::Real(self.height),
        ])
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}

/// Pages of one source document, renumbered and ready to be committed to
/// an [`Accumulator`].
///
/// All fallible work happens while building this value. Committing it is
/// infallible, so a document that fails half-way never leaves partial
/// state in the accumulator.
#[derive(Debug)]
pub struct PreparedPages {
    objects: Vec<(ObjectId, Object)>,
    page_ids: Vec<ObjectId>,
    max_id: u32,
    last_page_size: Option<PageSize>,
}

impl PreparedPages {
    /// Prepare `source` for appending to `accumulator`.
    ///
    /// Object ids are shifted past the accumulator's highest id, inherited
    /// page attributes are made explicit and every page is re-parented to
    /// the accumulator's page-tree root.
    ///
    /// # Errors
    ///
    /// Returns [`DuplexCatError::CorruptedPdf`] when a page is not a
    /// dictionary.
    pub fn prepare(
        name: &str,
        mut source: Document,
        accumulator: &Accumulator,
    ) -> Result<Self> {
        source.renumber_objects_with(accumulator.next_object_id());

        // get_pages is keyed by page number, so values come out in order.
        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

        let corrupted = |err: lopdf::Error| DuplexCatError::corrupted_pdf(name, err.to_string());

        let mut last_page_size = None;
        for &page_id in &page_ids {
            let inherited = inherited_attributes(&source, page_id).map_err(corrupted)?;

            let page = source
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(corrupted)?;
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(accumulator.pages_id));

            let page = source.get_dictionary(page_id).map_err(corrupted)?;
            last_page_size = PageSize::of_page(&source, page);
        }

        let max_id = source.max_id;
        Ok(Self {
            objects: source.objects.into_iter().collect(),
            page_ids,
            max_id,
            last_page_size,
        })
    }

    /// Number of pages that will be appended.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Size of the last page, if there is one and it could be measured.
    pub fn last_page_size(&self) -> Option<PageSize> {
        self.last_page_size
    }
}

/// Collect attributes `page_id` inherits from its ancestors.
///
/// Only keys missing on the page itself are returned; the nearest ancestor
/// wins. A `/Parent` that does not resolve to a dictionary ends the walk.
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
) -> lopdf::Result<Vec<(&'static [u8], Object)>> {
    let page = doc.get_dictionary(page_id)?;

    let mut missing: Vec<&'static [u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut found = Vec::new();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }

        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(found)
}

/// The in-progress merged document.
///
/// Starts as a valid zero-page PDF and grows one document at a time. Each
/// merge call owns its own accumulator.
#[derive(Debug)]
pub struct Accumulator {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl Accumulator {
    /// Create an empty accumulator: a catalog and a page-tree root with no kids.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");

        let pages_id = document.new_object_id();
        let catalog_id = document.new_object_id();

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        };
        let catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        document.objects.insert(pages_id, pages.into());
        document.objects.insert(catalog_id, catalog.into());
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages accumulated so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// First object number that is free for transplanted objects.
    pub fn next_object_id(&self) -> u32 {
        self.document.max_id + 1
    }

    /// Append prepared pages after everything accumulated so far.
    pub fn append(&mut self, prepared: PreparedPages) {
        self.document.objects.extend(prepared.objects);
        self.document.max_id = self.document.max_id.max(prepared.max_id);
        self.kids.extend(prepared.page_ids);
    }

    /// Append one blank page of the given size.
    pub fn append_blank(&mut self, size: PageSize) -> ObjectId {
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => size.to_rectangle(),
            "Resources" => Dictionary::new(),
        };

        let page_id = self.document.add_object(page);
        self.kids.push(page_id);
        page_id
    }

    /// Finalize the page tree and hand out the document.
    ///
    /// Objects that are no longer reachable from the catalog (source
    /// catalogs and page-tree nodes) are dropped.
    ///
    /// # Errors
    ///
    /// Fails only if the page-tree root was replaced by something that is
    /// not a dictionary.
    pub fn finish(self) -> Result<Document> {
        let Self {
            mut document,
            pages_id,
            kids,
        } = self;

        let count = kids.len() as i64;
        let pages = document
            .get_object_mut(pages_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| {
                DuplexCatError::serialization_failed(format!("Invalid page tree: {e}"))
            })?;
        pages.set(
            "Kids",
            kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
        );
        pages.set("Count", Object::Integer(count));

        document.prune_objects();
        Ok(document)
    }
}

#[cfg(test)]
impl Accumulator {
    /// Replace the page-tree root with a non-dictionary object.
    pub(crate) fn break_page_tree(&mut self) {
        self.document.objects.insert(self.pages_id, Object::Null);
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}
