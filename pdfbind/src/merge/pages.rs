//! Page extraction.
//!
//! A merge step never appends a source document as-is. It first cuts out the
//! pages the step needs into a standalone document:
//!
//! - inheritable page attributes are copied onto each kept page
//! - link annotations pointing at pages outside the range are removed
//! - the page tree is flattened to a single root node
//! - the catalog is reduced to its page tree, dropping outlines, named
//!   destinations and document info of the source
//! - everything no longer reachable is pruned
//!
//! The result can be spliced into another document without dragging unused
//! pages along. The source outline is carried separately, see
//! [`read_outline_tree`](super::read_outline_tree).

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeSet;

use crate::error::{PdfBindError, Result};
use crate::io::LoadedPdf;
use crate::merge::bookmarks::destination_page;
use crate::plan::PageRange;

/// Page attributes a page may inherit from its ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `Parent` chains.
const MAX_TREE_DEPTH: usize = 64;

/// Page extractor for cutting page ranges out of documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageExtractor;

impl PageExtractor {
    /// Create a new page extractor.
    pub fn new() -> Self {
        Self
    }

    /// Get the number of pages in a document.
    pub fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    /// Cut the pages of `range` out of a loaded document.
    ///
    /// # Errors
    ///
    /// - `PageRangeError` if `range` is inverted or exceeds the document
    /// - `MergeFailed` if the page tree is malformed
    pub fn extract(&self, source: &LoadedPdf, range: PageRange) -> Result<Document> {
        let doc = &source.document;
        let pages = doc.get_pages();

        if !range.fits(pages.len()) {
            return Err(PdfBindError::PageRangeError {
                role: source.role,
                path: source.source.path.clone(),
                range,
                total_pages: pages.len(),
            });
        }

        let selected: Vec<ObjectId> = pages
            .values()
            .skip(range.start)
            .take(range.len())
            .copied()
            .collect();

        let mut part = doc.clone();
        for &page_id in &selected {
            self.flatten_inherited(&mut part, page_id)?;
        }
        let stripped = self.strip_dangling_links(&mut part, &selected)?;
        self.rebuild_tree(&mut part, &selected)?;

        let pruned = part.prune_objects();
        log::debug!(
            "extracted {} of {} page(s) from {}, removed {} link(s), pruned {} object(s)",
            selected.len(),
            pages.len(),
            source.source,
            stripped,
            pruned.len()
        );

        Ok(part)
    }

    /// Copy inherited attributes onto the page itself.
    pub fn flatten_inherited(&self, doc: &mut Document, page_id: ObjectId) -> Result<()> {
        let page = doc
            .get_dictionary(page_id)
            .map_err(|e| PdfBindError::merge_failed(format!("Failed to get page: {e}")))?;

        let mut missing: Vec<&[u8]> = INHERITABLE
            .into_iter()
            .filter(|key| !page.has(key))
            .collect();
        let mut inherited: Vec<(&[u8], Object)> = Vec::new();
        let mut parent = parent_of(page);

        for _ in 0..MAX_TREE_DEPTH {
            let Some(node_id) = parent else { break };
            if missing.is_empty() {
                break;
            }
            let Ok(node) = doc.get_dictionary(node_id) else {
                break;
            };

            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = parent_of(node);
        }

        if inherited.is_empty() {
            return Ok(());
        }

        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|e| PdfBindError::merge_failed(format!("Failed to get page: {e}")))?;
        for (key, value) in inherited {
            page.set(key.to_vec(), value);
        }

        Ok(())
    }

    /// Remove annotations on `page_ids` whose destination is a page outside
    /// `page_ids`.
    ///
    /// Such a link would keep the dropped page reachable. Returns the number
    /// of annotations removed.
    pub fn strip_dangling_links(&self, doc: &mut Document, page_ids: &[ObjectId]) -> Result<usize> {
        let all_pages: BTreeSet<ObjectId> = doc.get_pages().into_values().collect();
        let kept: BTreeSet<ObjectId> = page_ids.iter().copied().collect();
        let mut removed = 0;

        for &page_id in page_ids {
            let page = doc
                .get_dictionary(page_id)
                .map_err(|e| PdfBindError::merge_failed(format!("Failed to get page: {e}")))?;
            let Ok(annots) = page.get(b"Annots") else {
                continue;
            };
            let annots = match annots {
                Object::Reference(id) => doc.get_object(*id).and_then(Object::as_array),
                other => other.as_array(),
            };
            let Ok(annots) = annots else {
                continue;
            };

            let retained: Vec<Object> = annots
                .iter()
                .filter(|annot| {
                    let dict = match annot {
                        Object::Reference(id) => doc.get_dictionary(*id),
                        other => other.as_dict(),
                    };
                    let target = dict.ok().and_then(|dict| destination_page(doc, dict));
                    !target.is_some_and(|id| all_pages.contains(&id) && !kept.contains(&id))
                })
                .cloned()
                .collect();

            let dropped = annots.len() - retained.len();
            if dropped == 0 {
                continue;
            }
            removed += dropped;

            let page = doc
                .get_dictionary_mut(page_id)
                .map_err(|e| PdfBindError::merge_failed(format!("Failed to get page: {e}")))?;
            if retained.is_empty() {
                page.remove(b"Annots");
            } else {
                page.set("Annots", retained);
            }
        }

        Ok(removed)
    }

    /// Replace the catalog and page tree with ones holding only `page_ids`.
    fn rebuild_tree(&self, doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
        let catalog_id = doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|e| PdfBindError::merge_failed(format!("Failed to get catalog: {e}")))?;

        let pages_id = doc
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|e| {
                PdfBindError::merge_failed(format!("Failed to get pages reference: {e}"))
            })?;

        let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_ids.len() as i64,
            }),
        );
        doc.objects.insert(
            catalog_id,
            Object::Dictionary(dictionary! {
                "Type" => "Catalog",
                "Pages" => pages_id,
            }),
        );
        doc.trailer.remove(b"Info");

        for &page_id in page_ids {
            let page = doc
                .get_dictionary_mut(page_id)
                .map_err(|e| PdfBindError::merge_failed(format!("Failed to get page: {e}")))?;
            page.set("Parent", pages_id);
        }

        Ok(())
    }
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").and_then(Object::as_reference).ok()
}
