//! Outline (bookmark) handling.
//!
//! Outline items of every merged section are carried into the assembled
//! document in step order. The change registration table entry is then
//! appended as the last top-level item. Added titles outside ASCII are
//! stored as UTF-16BE with a byte-order mark, which every conforming reader
//! decodes.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{PdfBindError, Result};
use crate::plan::Bookmark;

const UTF16_BOM: [u8; 2] = [0xFE, 0xFF];

/// Bounds outline nesting and named-destination indirection.
const MAX_DEPTH: usize = 32;

/// A top-level outline entry as read back from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Decoded title.
    pub title: String,
    /// Zero-based index of the destination page, if it resolves.
    pub page: Option<usize>,
}

/// An outline item with its destination resolved to a page index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    /// Title as stored, a PDF text string.
    pub title: Vec<u8>,
    /// Zero-based index of the destination page, if it resolves.
    pub page: Option<usize>,
    /// Nested items, in order.
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a node with a plain-text title.
    pub fn new(title: &str, page: usize) -> Self {
        Self {
            title: encode_title(title),
            page: Some(page),
            children: Vec::new(),
        }
    }

    /// Add a nested item.
    pub fn with_child(mut self, child: OutlineNode) -> Self {
        self.children.push(child);
        self
    }

    /// Decoded title.
    pub fn title_text(&self) -> String {
        decode_text(&self.title)
    }
}

/// Attaches outline entries to documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookmarkInjector;

impl BookmarkInjector {
    /// Create a new injector.
    pub fn new() -> Self {
        Self
    }

    /// Append `bookmark` as the last top-level outline entry.
    ///
    /// Creates the outline root when the document has none.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkFailed` if the target page does not exist or the
    /// outline tree cannot be updated.
    pub fn inject(&self, doc: &mut Document, bookmark: &Bookmark) -> Result<()> {
        let pages = doc.get_pages();
        let page_id = pages
            .values()
            .nth(bookmark.target_page)
            .copied()
            .ok_or_else(|| {
                failed(
                    &bookmark.label,
                    format!(
                        "target page {} is outside the document ({} page(s))",
                        bookmark.target_page + 1,
                        pages.len()
                    ),
                )
            })?;

        let root_id = outline_root(doc, &bookmark.label)?;
        append_item(doc, root_id, &encode_title(&bookmark.label), page_id)?;
        add_to_count(doc, root_id, 1, &bookmark.label)?;

        log::debug!(
            "outline entry '{}' -> page {}",
            bookmark.label,
            bookmark.target_page + 1
        );
        Ok(())
    }

    /// Append `nodes` as top-level outline items, after any existing ones.
    ///
    /// Node pages index into `doc`. A node whose page does not exist is
    /// left out and its children take its place. Nested items are added
    /// closed. Returns the number of top-level items added.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkFailed` if the outline tree cannot be updated.
    pub fn append_outline(&self, doc: &mut Document, nodes: &[OutlineNode]) -> Result<usize> {
        if nodes.is_empty() {
            return Ok(0);
        }

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let label = nodes[0].title_text();
        let root_id = outline_root(doc, &label)?;

        let added = append_children(doc, root_id, nodes, &pages)?;
        add_to_count(doc, root_id, added, &label)?;

        log::debug!("carried {added} top-level outline item(s)");
        Ok(added)
    }
}

fn failed(label: &str, reason: String) -> PdfBindError {
    PdfBindError::BookmarkFailed {
        label: label.to_string(),
        reason,
    }
}

fn append_children(
    doc: &mut Document,
    parent_id: ObjectId,
    nodes: &[OutlineNode],
    pages: &[ObjectId],
) -> Result<usize> {
    let mut added = 0;

    for node in nodes {
        match node.page.and_then(|idx| pages.get(idx)) {
            Some(&page_id) => {
                let item_id = append_item(doc, parent_id, &node.title, page_id)?;
                let children = append_children(doc, item_id, &node.children, pages)?;
                if children > 0 {
                    doc.get_dictionary_mut(item_id)
                        .map_err(|e| failed(&node.title_text(), e.to_string()))?
                        .set("Count", -(children as i64));
                }
                added += 1;
            }
            None => added += append_children(doc, parent_id, &node.children, pages)?,
        }
    }

    Ok(added)
}

/// The outline root, created when missing.
fn outline_root(doc: &mut Document, label: &str) -> Result<ObjectId> {
    if let Some(id) = existing_outline_root(doc) {
        return Ok(id);
    }

    let id = doc.add_object(dictionary! {
        "Type" => "Outlines",
        "Count" => 0,
    });
    doc.catalog_mut()
        .map_err(|e| failed(label, format!("failed to get catalog: {e}")))?
        .set("Outlines", id);
    Ok(id)
}

/// Link a new item as the last child of `parent_id`.
fn append_item(
    doc: &mut Document,
    parent_id: ObjectId,
    title: &[u8],
    page_id: ObjectId,
) -> Result<ObjectId> {
    let label = decode_text(title);
    let last = doc
        .get_dictionary(parent_id)
        .ok()
        .and_then(|parent| parent.get(b"Last").and_then(Object::as_reference).ok());

    let mut item = dictionary! {
        "Title" => title_object(title),
        "Parent" => parent_id,
        "Dest" => vec![Object::Reference(page_id), "Fit".into()],
    };
    if let Some(last) = last {
        item.set("Prev", last);
    }
    let item_id = doc.add_object(item);

    if let Some(last) = last {
        doc.get_dictionary_mut(last)
            .map_err(|e| failed(&label, format!("failed to get last outline item: {e}")))?
            .set("Next", item_id);
    }

    let parent = doc
        .get_dictionary_mut(parent_id)
        .map_err(|e| failed(&label, format!("failed to get outline parent: {e}")))?;
    if last.is_none() {
        parent.set("First", item_id);
    }
    parent.set("Last", item_id);

    Ok(item_id)
}

fn add_to_count(doc: &mut Document, root_id: ObjectId, added: usize, label: &str) -> Result<()> {
    let root = doc
        .get_dictionary_mut(root_id)
        .map_err(|e| failed(label, format!("failed to get outline root: {e}")))?;
    let count = root.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    root.set("Count", count.abs() + added as i64);
    Ok(())
}

fn existing_outline_root(doc: &Document) -> Option<ObjectId> {
    doc.catalog()
        .ok()?
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .ok()
        .filter(|id| doc.get_dictionary(*id).is_ok())
}

/// Encode a title as PDF text string bytes.
pub fn encode_title(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        text.as_bytes().to_vec()
    } else {
        let mut bytes = UTF16_BOM.to_vec();
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        bytes
    }
}

/// Encode a title as a PDF text string object.
pub fn encode_text(text: &str) -> Object {
    title_object(&encode_title(text))
}

fn title_object(bytes: &[u8]) -> Object {
    let format = if bytes.is_ascii() {
        StringFormat::Literal
    } else {
        StringFormat::Hexadecimal
    };
    Object::String(bytes.to_vec(), format)
}

/// Decode a PDF text string.
pub fn decode_text(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&UTF16_BOM) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Read the top-level outline entries of a document.
pub fn read_outline(doc: &Document) -> Vec<OutlineEntry> {
    read_outline_tree(doc)
        .into_iter()
        .map(|node| OutlineEntry {
            title: node.title_text(),
            page: node.page,
        })
        .collect()
}

/// Read the whole outline of a document.
///
/// Destinations are resolved through explicit arrays, `GoTo` actions and
/// named destinations. Cycles in the item chain are cut.
pub fn read_outline_tree(doc: &Document) -> Vec<OutlineNode> {
    let Some(root_id) = existing_outline_root(doc) else {
        return Vec::new();
    };

    let page_index: BTreeMap<ObjectId, usize> = doc
        .get_pages()
        .into_values()
        .enumerate()
        .map(|(idx, id)| (id, idx))
        .collect();

    let mut visited = BTreeSet::new();
    read_items(doc, root_id, &page_index, &mut visited, 0)
}

fn read_items(
    doc: &Document,
    parent_id: ObjectId,
    page_index: &BTreeMap<ObjectId, usize>,
    visited: &mut BTreeSet<ObjectId>,
    depth: usize,
) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    if depth > MAX_DEPTH {
        return nodes;
    }

    let mut next = doc.get_dictionary(parent_id).ok().and_then(first_child);
    while let Some(item_id) = next {
        if !visited.insert(item_id) {
            break;
        }
        let Ok(item) = doc.get_dictionary(item_id) else {
            break;
        };

        let title = item
            .get(b"Title")
            .map(|title| resolve(doc, title))
            .and_then(Object::as_str)
            .map(<[u8]>::to_vec)
            .unwrap_or_default();
        let page = destination_page(doc, item).and_then(|id| page_index.get(&id).copied());
        let children = read_items(doc, item_id, page_index, visited, depth + 1);

        nodes.push(OutlineNode {
            title,
            page,
            children,
        });
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }

    nodes
}

fn first_child(root: &Dictionary) -> Option<ObjectId> {
    root.get(b"First").and_then(Object::as_reference).ok()
}

/// Page object a destination-bearing dictionary points at.
///
/// Works for outline items and link annotations alike: `/Dest` is checked
/// first, then a `/GoTo` action in `/A`.
pub(crate) fn destination_page(doc: &Document, dict: &Dictionary) -> Option<ObjectId> {
    if let Ok(dest) = dict.get(b"Dest") {
        return dest_target(doc, dest, 0);
    }

    let action = resolve(doc, dict.get(b"A").ok()?).as_dict().ok()?;
    if action.get(b"S").and_then(Object::as_name).ok()? != b"GoTo" {
        return None;
    }
    dest_target(doc, action.get(b"D").ok()?, 0)
}

fn dest_target(doc: &Document, dest: &Object, depth: usize) -> Option<ObjectId> {
    if depth > MAX_DEPTH {
        return None;
    }

    match resolve(doc, dest) {
        Object::Array(items) => items.first()?.as_reference().ok(),
        Object::Dictionary(dict) => dest_target(doc, dict.get(b"D").ok()?, depth + 1),
        Object::Name(name) | Object::String(name, _) => {
            dest_target(doc, named_destination(doc, name)?, depth + 1)
        }
        _ => None,
    }
}

/// Look a name up in the catalog's `/Dests` dictionary or name tree.
fn named_destination<'a>(doc: &'a Document, name: &[u8]) -> Option<&'a Object> {
    let catalog = doc.catalog().ok()?;

    if let Ok(dests) = catalog.get(b"Dests")
        && let Ok(dests) = resolve(doc, dests).as_dict()
        && let Ok(dest) = dests.get(name)
    {
        return Some(dest);
    }

    let names = resolve(doc, catalog.get(b"Names").ok()?).as_dict().ok()?;
    let tree = resolve(doc, names.get(b"Dests").ok()?).as_dict().ok()?;
    lookup_name_tree(doc, tree, name, 0)
}

fn lookup_name_tree<'a>(
    doc: &'a Document,
    node: &'a Dictionary,
    name: &[u8],
    depth: usize,
) -> Option<&'a Object> {
    if depth > MAX_DEPTH {
        return None;
    }

    if let Ok(names) = node.get(b"Names").and_then(Object::as_array) {
        return names
            .chunks_exact(2)
            .find(|pair| resolve(doc, &pair[0]).as_str().is_ok_and(|key| key == name))
            .map(|pair| &pair[1]);
    }

    node.get(b"Kids")
        .and_then(Object::as_array)
        .ok()?
        .iter()
        .filter_map(|kid| resolve(doc, kid).as_dict().ok())
        .find_map(|kid| lookup_name_tree(doc, kid, name, depth + 1))
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}
