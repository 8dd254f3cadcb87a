//! In-memory PDF fixtures for unit tests.
//!
//! Every generated page carries a `Marker` string (`"<tag>-<n>"`, one-based)
//! so tests can tell where an output page came from.

use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::path::{Path, PathBuf};

use crate::merge::encode_text;

/// Build a document with `pages` marked pages.
///
/// Resources and MediaBox live on the Pages node so extraction has to
/// resolve inherited attributes.
pub fn marked_document(tag: &str, pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let text = format!("BT /F1 24 Tf 72 720 Td ({tag} {n}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Marker" => Object::string_literal(format!("{tag}-{n}")),
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Give a document a flat outline of `(title, page index)` items.
pub fn add_outline(doc: &mut Document, items: &[(&str, usize)]) {
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let root_id = doc.new_object_id();

    let ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();
    for (n, (&(title, page), &id)) in items.iter().zip(&ids).enumerate() {
        let mut item = dictionary! {
            "Title" => encode_text(title),
            "Parent" => root_id,
            "Dest" => vec![Object::Reference(pages[page]), "XYZ".into(), Object::Null, Object::Null, Object::Null],
        };
        if n > 0 {
            item.set("Prev", ids[n - 1]);
        }
        if let Some(&next) = ids.get(n + 1) {
            item.set("Next", next);
        }
        doc.objects.insert(id, Object::Dictionary(item));
    }

    let mut root = dictionary! {
        "Type" => "Outlines",
        "Count" => items.len() as i64,
    };
    if let (Some(&first), Some(&last)) = (ids.first(), ids.last()) {
        root.set("First", first);
        root.set("Last", last);
    }
    doc.objects.insert(root_id, Object::Dictionary(root));
    doc.catalog_mut().unwrap().set("Outlines", root_id);
}

/// Put a link on page `from` that jumps to page `to` (page indices).
pub fn add_link(doc: &mut Document, from: usize, to: usize) {
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let link_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![72.into(), 700.into(), 200.into(), 720.into()],
        "Dest" => vec![Object::Reference(pages[to]), "Fit".into()],
    });

    let page = doc.get_dictionary_mut(pages[from]).unwrap();
    let mut annots = page
        .get(b"Annots")
        .and_then(Object::as_array)
        .cloned()
        .unwrap_or_default();
    annots.push(Object::Reference(link_id));
    page.set("Annots", annots);
}

/// Write a marked document to `dir/name` and return its path.
pub fn write_marked(dir: &Path, name: &str, tag: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    let mut doc = marked_document(tag, pages);
    doc.save(&path).unwrap();
    path
}

/// Marker of every page, in page order.
pub fn page_markers(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_values()
        .map(|id| marker(doc, id))
        .collect()
}

fn marker(doc: &Document, page_id: ObjectId) -> String {
    doc.get_dictionary(page_id)
        .and_then(|page| page.get(b"Marker"))
        .and_then(Object::as_str)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}
