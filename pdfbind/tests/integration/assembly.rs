//! End-to-end assembly of project folders.

use lopdf::Document;
use pdfbind::assemble::assemble_folder;
use pdfbind::classify::{CasePolicy, Role};
use pdfbind::config::{CompressionLevel, Config, OverwriteMode};
use pdfbind::events::{AssemblyEvent, NullSink, RecordingSink};
use pdfbind::merge::read_outline;
use pdfbind::plan::CHANGES_TABLE_LABEL;
use rstest::rstest;

use crate::common::{Project, markers_of, tagged};

#[test]
fn test_reference_layout() {
    let project = Project::new();
    project.add("Обложка.pdf", "title", 2);
    project.add("ПЗ.pdf", "main", 10);
    project.add("Таблица регистрации изменений.pdf", "changes", 1);

    let report = assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap();
    let output = project.default_output();
    assert_eq!(report.output.as_deref(), Some(output.as_path()));
    assert_eq!(report.output_pages(), 11);

    let mut expected = tagged("title", 1, 2);
    expected.extend(tagged("main", 3, 10));
    expected.extend(tagged("changes", 1, 1));
    assert_eq!(markers_of(&output), expected);

    let outline = read_outline(&Document::load(&output).unwrap());
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0].title, CHANGES_TABLE_LABEL);
    assert_eq!(outline[0].page, Some(10));
}

#[test]
fn test_main_body_only() {
    let project = Project::new();
    project.add("Пояснительная записка.pdf", "main", 5);

    let report = assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap();
    assert_eq!(report.output_pages(), 5);
    assert!(report.bookmark().is_none());

    let output = project.default_output();
    assert_eq!(markers_of(&output), tagged("main", 1, 5));
    assert!(read_outline(&Document::load(&output).unwrap()).is_empty());
}

#[rstest]
#[case(1, 4)]
#[case(3, 3)]
#[case(2, 7)]
fn test_title_replaces_leading_pages(#[case] title_pages: usize, #[case] main_pages: usize) {
    let project = Project::new();
    project.add("Титульный лист.pdf", "title", title_pages);
    project.add("ПЗ.pdf", "main", main_pages);

    let report = assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap();
    assert_eq!(report.output_pages(), main_pages);

    let mut expected = tagged("title", 1, title_pages);
    expected.extend(tagged("main", title_pages + 1, main_pages));
    assert_eq!(markers_of(&project.default_output()), expected);
}

#[test]
fn test_changes_table_bookmark_follows_main_body() {
    let project = Project::new();
    project.add("ПЗ.pdf", "main", 6);
    project.add("таблица регистрации изменений.pdf", "changes", 3);

    let report = assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap();
    assert_eq!(report.output_pages(), 9);

    let output = project.default_output();
    let markers = markers_of(&output);
    let outline = read_outline(&Document::load(&output).unwrap());
    let target = outline[0].page.unwrap();

    assert_eq!(target, 6);
    assert_eq!(markers[target], "changes-1");
}

#[test]
fn test_info_sheet_left_out_by_default() {
    let project = Project::new();
    project.add("ИУЛ.pdf", "info", 1);
    project.add("ПЗ.pdf", "main", 4);

    let mut sink = RecordingSink::new();
    let report = assemble_folder(&Config::new(&project.folder), &mut sink).unwrap();

    assert!(report.assignment.is_present(Role::InfoCertificationSheet));
    assert_eq!(report.merged_roles(), vec![Role::MainBody]);
    assert_eq!(markers_of(&project.default_output()), tagged("main", 1, 4));
    assert!(!sink.events.iter().any(|e| matches!(
        e,
        AssemblyEvent::SourceLoaded {
            role: Role::InfoCertificationSheet,
            ..
        }
    )));
}

#[test]
fn test_info_sheet_included_after_changes_table() {
    let project = Project::new();
    project.add("ИУЛ.pdf", "info", 1);
    project.add("ПЗ.pdf", "main", 4);
    project.add("Таблица регистрации изменений.pdf", "changes", 2);

    let mut config = Config::new(&project.folder);
    config.plan.include_info_sheet = true;
    assemble_folder(&config, &mut NullSink).unwrap();

    let output = project.default_output();
    let mut expected = tagged("main", 1, 4);
    expected.extend(tagged("changes", 1, 2));
    expected.extend(tagged("info", 1, 1));
    assert_eq!(markers_of(&output), expected);

    let outline = read_outline(&Document::load(&output).unwrap());
    assert_eq!(outline[0].page, Some(4));
}

#[test]
fn test_rerun_is_byte_identical() {
    let project = Project::new();
    project.add("Обложка.pdf", "title", 1);
    project.add("ПЗ.pdf", "main", 3);
    project.add("Таблица регистрации изменений.pdf", "changes", 1);

    let mut config = Config::new(&project.folder);
    config.overwrite_mode = OverwriteMode::Force;

    assemble_folder(&config, &mut NullSink).unwrap();
    let first = std::fs::read(&config.output).unwrap();

    // The previous output now sits in the folder and must be ignored.
    let report = assemble_folder(&config, &mut NullSink).unwrap();
    let second = std::fs::read(&config.output).unwrap();

    assert_eq!(report.output_pages(), 3);
    assert_eq!(first, second);
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
fn test_compression_levels_keep_pages(#[case] level: CompressionLevel) {
    let project = Project::new();
    project.add("ПЗ.pdf", "main", 3);
    project.add("Таблица регистрации изменений.pdf", "changes", 1);

    let mut config = Config::new(&project.folder);
    config.compression = level;
    assemble_folder(&config, &mut NullSink).unwrap();

    let mut expected = tagged("main", 1, 3);
    expected.extend(tagged("changes", 1, 1));
    assert_eq!(markers_of(&config.output), expected);
}

#[test]
fn test_explicit_output_outside_folder() {
    let project = Project::new();
    project.add("ПЗ.pdf", "main", 2);
    let out_dir = tempfile::TempDir::new().unwrap();

    let mut config = Config::new(&project.folder);
    config.output = out_dir.path().join("bound.pdf");
    assemble_folder(&config, &mut NullSink).unwrap();

    assert!(config.output.exists());
    assert!(!project.default_output().exists());
}

#[test]
fn test_ignore_case_policy() {
    let project = Project::new();
    project.add("пз.pdf", "main", 2);

    let err = assemble_folder(&Config::new(&project.folder), &mut NullSink).unwrap_err();
    assert_eq!(err.role(), Some(Role::MainBody));

    let mut config = Config::new(&project.folder);
    config.case_policy = CasePolicy::Insensitive;
    let report = assemble_folder(&config, &mut NullSink).unwrap();
    assert_eq!(report.output_pages(), 2);
}

#[test]
fn test_ambiguous_role_uses_first_name() {
    let project = Project::new();
    project.add("ПЗ изм1.pdf", "first", 2);
    project.add("ПЗ изм2.pdf", "second", 2);

    let mut sink = RecordingSink::new();
    assemble_folder(&Config::new(&project.folder), &mut sink).unwrap();

    assert!(sink.events.iter().any(|e| matches!(
        e,
        AssemblyEvent::AmbiguousRole {
            role: Role::MainBody,
            ..
        }
    )));
    assert_eq!(markers_of(&project.default_output()), tagged("first", 1, 2));
}

#[test]
fn test_events_in_pipeline_order() {
    let project = Project::new();
    project.add("ПЗ.pdf", "main", 2);
    project.add("Таблица регистрации изменений.pdf", "changes", 1);

    let mut sink = RecordingSink::new();
    assemble_folder(&Config::new(&project.folder), &mut sink).unwrap();

    let position = |pred: fn(&AssemblyEvent) -> bool| {
        sink.events.iter().position(pred).expect("event missing")
    };
    let scanned = position(|e| matches!(e, AssemblyEvent::FolderScanned { .. }));
    let planned = position(|e| matches!(e, AssemblyEvent::PlanReady { .. }));
    let bookmarked = position(|e| matches!(e, AssemblyEvent::BookmarkAdded { .. }));
    let written = position(|e| matches!(e, AssemblyEvent::OutputWritten { .. }));

    assert!(scanned < planned);
    assert!(planned < bookmarked);
    assert!(bookmarked < written);
}
