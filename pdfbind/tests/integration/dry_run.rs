//! Dry runs classify and plan but never write.

use pdfbind::assemble::assemble_folder;
use pdfbind::classify::Role;
use pdfbind::config::Config;
use pdfbind::events::NullSink;
use pdfbind::plan::MergeStep;

use crate::common::Project;

fn dry_config(project: &Project) -> Config {
    let mut config = Config::new(&project.folder);
    config.dry_run = true;
    config
}

#[test]
fn test_dry_run_reports_plan() {
    let project = Project::new();
    project.add("Обложка.pdf", "title", 2);
    project.add("ПЗ.pdf", "main", 10);
    project.add("Таблица регистрации изменений.pdf", "changes", 1);

    let report = assemble_folder(&dry_config(&project), &mut NullSink).unwrap();

    assert!(report.dry_run);
    assert!(report.output.is_none());
    assert!(report.bytes_written.is_none());
    assert_eq!(report.output_pages(), 11);
    assert_eq!(
        report.merged_roles(),
        vec![Role::TitlePage, Role::MainBody, Role::ChangesTable]
    );
    assert_eq!(report.bookmark().map(|b| b.target_page), Some(10));

    match &report.plan.steps[1] {
        MergeStep::Range { range, .. } => {
            assert_eq!((range.start, range.end), (2, 10));
        }
        other => panic!("expected a range step, got {other:?}"),
    }

    assert!(!project.default_output().exists());
}

#[test]
fn test_dry_run_leaves_existing_output_alone() {
    let project = Project::new();
    project.add("ПЗ.pdf", "main", 2);
    project.add_raw("Раздел 1.pdf", b"previous");

    let report = assemble_folder(&dry_config(&project), &mut NullSink).unwrap();

    assert_eq!(report.output_pages(), 2);
    assert_eq!(
        std::fs::read(project.default_output()).unwrap(),
        b"previous"
    );
}

#[test]
fn test_dry_run_still_requires_main_body() {
    let project = Project::new();
    project.add("Обложка.pdf", "title", 1);

    let err = assemble_folder(&dry_config(&project), &mut NullSink).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_dry_run_json() {
    let project = Project::new();
    project.add("ПЗ.pdf", "main", 3);

    let report = assemble_folder(&dry_config(&project), &mut NullSink).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["dry_run"], true);
    assert_eq!(json["plan"]["output_pages"], 3);
    assert!(json["plan"]["bookmark"].is_null());
    assert_eq!(json["plan"]["steps"][0]["kind"], "whole");
}
