//! Shared helpers for the pdfbind integration tests.
//!
//! Section PDFs are generated on the fly. Every page carries a `Marker`
//! string (`"<tag>-<n>"`, one-based) so the provenance of each output page
//! can be checked after assembly.

use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use pdfbind::merge::encode_text;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch project folder named `Раздел 1` inside a temp directory.
pub struct Project {
    _dir: TempDir,
    pub folder: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let folder = dir.path().join("Раздел 1");
        std::fs::create_dir(&folder).expect("Failed to create project folder");
        Self { _dir: dir, folder }
    }

    /// Add a section PDF with `pages` marked pages.
    pub fn add(&self, name: &str, tag: &str, pages: usize) -> PathBuf {
        let path = self.folder.join(name);
        marked_document(tag, pages)
            .save(&path)
            .expect("Failed to write fixture");
        path
    }

    /// Add a prepared document.
    pub fn add_document(&self, name: &str, mut doc: Document) -> PathBuf {
        let path = self.folder.join(name);
        doc.save(&path).expect("Failed to write fixture");
        path
    }

    /// Add a file with arbitrary bytes.
    pub fn add_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.folder.join(name);
        std::fs::write(&path, bytes).expect("Failed to write fixture");
        path
    }

    /// The default output path, `<folder>/<folder name>.pdf`.
    pub fn default_output(&self) -> PathBuf {
        self.folder.join("Раздел 1.pdf")
    }
}

/// Build a document whose pages are marked `tag-1`, `tag-2`, ...
pub fn marked_document(tag: &str, pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = format!("BT 72 720 Td ({tag} {n}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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
pub fn with_outline(mut doc: Document, items: &[(&str, usize)]) -> Document {
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let root_id = doc.new_object_id();
    let ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();

    for (n, (&(title, page), &id)) in items.iter().zip(&ids).enumerate() {
        let mut item = dictionary! {
            "Title" => encode_text(title),
            "Parent" => root_id,
            "Dest" => vec![Object::Reference(pages[page]), "Fit".into()],
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
    doc.catalog_mut()
        .expect("fixture has a catalog")
        .set("Outlines", root_id);
    doc
}

/// Put a link on page `from` jumping to page `to` (page indices).
pub fn with_link(mut doc: Document, from: usize, to: usize) -> Document {
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let link_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![72.into(), 700.into(), 200.into(), 720.into()],
        "Dest" => vec![Object::Reference(pages[to]), "Fit".into()],
    });
    doc.get_dictionary_mut(pages[from])
        .expect("fixture page exists")
        .set("Annots", vec![Object::Reference(link_id)]);
    doc
}

/// Markers of every page of the PDF at `path`, in page order.
pub fn markers_of(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .into_values()
        .map(|id| {
            doc.get_dictionary(id)
                .and_then(|page| page.get(b"Marker"))
                .and_then(Object::as_str)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default()
        })
        .collect()
}

/// Expected markers `tag-from ..= tag-to`.
pub fn tagged(tag: &str, from: usize, to: usize) -> Vec<String> {
    (from..=to).map(|n| format!("{tag}-{n}")).collect()
}
