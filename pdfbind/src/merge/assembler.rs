//! Plan execution.
//!
//! The output starts as an empty document (catalog plus an empty page tree)
//! and every merge step appends its pages in order. Steps only ever add
//! pages, so the output index of a page is fixed once its step completes.
//!
//! Outline items of each section follow their pages. An item whose page was
//! replaced by the title page moves to the page that replaced it. An item
//! whose page was cut is dropped and its children take its place.

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::config::CompressionLevel;
use crate::error::{PdfBindError, Result};
use crate::events::{AssemblyEvent, EventSink};
use crate::io::LoadedSources;
use crate::merge::bookmarks::{BookmarkInjector, OutlineNode, read_outline_tree};
use crate::merge::pages::PageExtractor;
use crate::plan::{MergePlan, MergeStep, PageRange};

const DEFAULT_PDF_VERSION: &str = "1.7";

/// Executes merge plans.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    extractor: PageExtractor,
    outlines: BookmarkInjector,
}

impl Assembler {
    /// Create a new assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the output document by running every step of `plan`.
    ///
    /// The returned document is not yet finalized; see [`Assembler::finalize`].
    ///
    /// # Errors
    ///
    /// Fails on the first step whose pages cannot be extracted or spliced.
    pub fn assemble(
        &self,
        plan: &MergePlan,
        sources: &LoadedSources,
        sink: &mut dyn EventSink,
    ) -> Result<Document> {
        let version = plan
            .steps
            .first()
            .and_then(|step| sources.get(&step.role()))
            .map(|loaded| loaded.document.version.clone())
            .unwrap_or_else(|| DEFAULT_PDF_VERSION.to_string());

        let mut output = empty_document(version);
        let mut outline = Vec::new();
        let total = plan.steps.len();

        for (idx, step) in plan.steps.iter().enumerate() {
            let role = step.role();
            let loaded = sources.get(&role).ok_or_else(|| {
                PdfBindError::merge_failed(format!("{role} was planned but not loaded"))
            })?;

            let range = match step {
                MergeStep::Whole { .. } => PageRange::all(loaded.page_count),
                MergeStep::Range { range, .. } => *range,
            };

            let offset = output.get_pages().len();
            outline.extend(remap_outline(
                read_outline_tree(&loaded.document),
                range,
                offset,
            ));

            let part = self.extractor.extract(loaded, range)?;
            let appended = self.append(&mut output, part)?;

            sink.emit(&AssemblyEvent::StepCompleted {
                index: idx + 1,
                total,
                role,
                pages: appended,
            });
        }

        let pages = output.get_pages().len();
        if pages != plan.output_pages {
            return Err(PdfBindError::merge_failed(format!(
                "expected {} output page(s), assembled {pages}",
                plan.output_pages
            )));
        }

        self.outlines.append_outline(&mut output, &outline)?;

        Ok(output)
    }

    /// Apply compression and renumber objects.
    ///
    /// Renumbering always runs so identical inputs give identical bytes.
    pub fn finalize(&self, doc: &mut Document, compression: CompressionLevel) {
        match compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => {
                doc.compress();
            }
            CompressionLevel::Maximum => {
                doc.prune_objects();
                doc.compress();
            }
        }

        doc.renumber_objects();
    }

    /// Splice the pages of `part` onto the end of `output`.
    fn append(&self, output: &mut Document, mut part: Document) -> Result<usize> {
        part.renumber_objects_with(output.max_id + 1);
        output.max_id = part.max_id;

        let page_ids: Vec<ObjectId> = part.get_pages().into_values().collect();

        // The part's own catalog and page tree are replaced by the output's.
        let (catalog_id, pages_id) = tree_root(&part)?;
        part.objects.remove(&catalog_id);
        part.objects.remove(&pages_id);

        output.objects.extend(part.objects);
        self.add_pages_to_tree(output, &page_ids)?;

        Ok(page_ids.len())
    }

    /// Add pages to the output document's page tree.
    fn add_pages_to_tree(&self, output: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
        let (_, pages_id) = tree_root(output)?;

        let dict = output
            .get_dictionary_mut(pages_id)
            .map_err(|e| PdfBindError::merge_failed(format!("Failed to get pages object: {e}")))?;

        let kids = dict
            .get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .map_err(|_| PdfBindError::merge_failed("Pages dictionary missing Kids array"))?;
        kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));

        let count = dict.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        dict.set("Count", count + page_ids.len() as i64);

        for &page_id in page_ids {
            output
                .get_dictionary_mut(page_id)
                .map_err(|e| PdfBindError::merge_failed(format!("Failed to get page: {e}")))?
                .set("Parent", pages_id);
        }

        Ok(())
    }
}

/// Move outline targets from source page indices to output page indices.
fn remap_outline(nodes: Vec<OutlineNode>, range: PageRange, offset: usize) -> Vec<OutlineNode> {
    nodes
        .into_iter()
        .map(|node| OutlineNode {
            page: node.page.and_then(|idx| output_index(idx, range, offset)),
            children: remap_outline(node.children, range, offset),
            title: node.title,
        })
        .collect()
}

/// Output index of source page `idx` for a step cutting `range`, appended
/// after `offset` pages.
///
/// Pages before the range map onto the pages preceding the step one to one.
fn output_index(idx: usize, range: PageRange, offset: usize) -> Option<usize> {
    (idx < range.end && idx + offset >= range.start).then(|| idx + offset - range.start)
}

/// A document with a catalog and an empty page tree.
fn empty_document(version: String) -> Document {
    let mut doc = Document::with_version(version);
    let pages_id = doc.new_object_id();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Catalog and root page-tree node of a document.
fn tree_root(doc: &Document) -> Result<(ObjectId, ObjectId)> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| PdfBindError::merge_failed(format!("Failed to get catalog: {e}")))?;

    let pages_id = doc
        .get_dictionary(catalog_id)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| PdfBindError::merge_failed(format!("Failed to get pages reference: {e}")))?;

    Ok((catalog_id, pages_id))
}
