//! Outlines and links of the sections in the assembled document.

use lopdf::{Document, Object, ObjectId};
use pdfbind::assemble::assemble_folder;
use pdfbind::config::Config;
use pdfbind::events::NullSink;
use pdfbind::merge::read_outline;
use pdfbind::plan::CHANGES_TABLE_LABEL;

use crate::common::{Project, marked_document, markers_of, with_link, with_outline};

fn entries(doc: &Document) -> Vec<(String, Option<usize>)> {
    read_outline(doc)
        .into_iter()
        .map(|entry| (entry.title, entry.page))
        .collect()
}

fn pages_root(doc: &Document) -> ObjectId {
    doc.catalog()
        .unwrap()
        .get(b"Pages")
        .unwrap()
        .as_reference()
        .unwrap()
}

fn page_objects(doc: &Document) -> Vec<ObjectId> {
    doc.objects
        .iter()
        .filter(|(_, obj)| {
            obj.as_dict()
                .and_then(|d| d.get(b"Type"))
                .and_then(Object::as_name)
                .is_ok_and(|name| name == b"Page")
        })
        .map(|(&id, _)| id)
        .collect()
}

#[test]
fn test_main_body_outline_is_kept_before_changes_entry() {
    let project = Project::new();
    project.add_document(
        "ПЗ.pdf",
        with_outline(
            marked_document("main", 5),
            &[("1 Общие данные", 0), ("2 Решения", 3)],
        ),
    );
    project.add("Таблица регистрации изменений.pdf", "changes", 1);

    assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap();

    let doc = Document::load(project.default_output()).unwrap();
    assert_eq!(
        entries(&doc),
        vec![
            ("1 Общие данные".to_string(), Some(0)),
            ("2 Решения".to_string(), Some(3)),
            (CHANGES_TABLE_LABEL.to_string(), Some(5)),
        ]
    );

    let root_id = doc
        .catalog()
        .unwrap()
        .get(b"Outlines")
        .unwrap()
        .as_reference()
        .unwrap();
    let root = doc.get_dictionary(root_id).unwrap();
    assert_eq!(root.get(b"Count").unwrap().as_i64().unwrap(), 3);
}

#[test]
fn test_outline_on_title_duplicate_moves_to_title_page() {
    let project = Project::new();
    project.add("Титульный лист.pdf", "title", 2);
    project.add_document(
        "ПЗ.pdf",
        with_outline(
            marked_document("main", 6),
            &[("Титульный лист", 0), ("1 Общие данные", 2)],
        ),
    );
    project.add("Таблица регистрации изменений.pdf", "changes", 1);

    assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap();

    let output = project.default_output();
    let markers = markers_of(&output);
    assert_eq!(markers[0], "title-1");
    assert_eq!(markers[2], "main-3");

    let doc = Document::load(&output).unwrap();
    assert_eq!(
        entries(&doc),
        vec![
            ("Титульный лист".to_string(), Some(0)),
            ("1 Общие данные".to_string(), Some(2)),
            (CHANGES_TABLE_LABEL.to_string(), Some(6)),
        ]
    );
}

#[test]
fn test_link_to_title_duplicate_is_removed() {
    let project = Project::new();
    project.add("Титульный лист.pdf", "title", 2);
    project.add_document("ПЗ.pdf", with_link(marked_document("main", 4), 2, 0));

    assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap();

    let doc = Document::load(project.default_output()).unwrap();
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    assert_eq!(pages.len(), 4);

    let linked_page = doc.get_dictionary(pages[2]).unwrap();
    assert!(!linked_page.has(b"Annots"));

    // The replaced source page must not survive as an orphan.
    let root = pages_root(&doc);
    let page_ids = page_objects(&doc);
    assert_eq!(page_ids.len(), 4);
    for id in page_ids {
        let parent = doc
            .get_dictionary(id)
            .unwrap()
            .get(b"Parent")
            .unwrap()
            .as_reference()
            .unwrap();
        assert_eq!(parent, root);
    }
}

#[test]
fn test_link_inside_main_body_is_kept() {
    let project = Project::new();
    project.add("Титульный лист.pdf", "title", 1);
    project.add_document("ПЗ.pdf", with_link(marked_document("main", 4), 1, 3));

    assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap();

    let doc = Document::load(project.default_output()).unwrap();
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let annots = doc
        .get_dictionary(pages[1])
        .unwrap()
        .get(b"Annots")
        .unwrap()
        .as_array()
        .unwrap();
    assert_eq!(annots.len(), 1);

    let link = doc.get_dictionary(annots[0].as_reference().unwrap()).unwrap();
    let target = link.get(b"Dest").unwrap().as_array().unwrap()[0]
        .as_reference()
        .unwrap();
    assert_eq!(target, pages[3]);
}
