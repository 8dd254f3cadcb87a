//! The end-to-end assembly pipeline.
//!
//! scan folder → classify → resolve roles → load sections → plan →
//! assemble → add bookmark → finalize → write
//!
//! Every stage runs sequentially and any failure aborts the run before the
//! output path is touched.

use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::classify::{Classifier, Role, RoleAssignment, RoleResolver};
use crate::config::{Config, OverwriteMode};
use crate::error::{PdfBindError, Result};
use crate::events::{AssemblyEvent, EventSink};
use crate::io::{FolderScanner, PdfReader, PdfWriter, page_counts};
use crate::merge::{Assembler, BookmarkInjector};
use crate::plan::{Bookmark, MergePlan, Planner};

/// Outcome of an assembly run.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    /// Project folder.
    pub folder: PathBuf,

    /// Resolved file of every role.
    pub assignment: RoleAssignment,

    /// The executed (or, for dry runs, computed) plan.
    pub plan: MergePlan,

    /// Written output, `None` for dry runs.
    pub output: Option<PathBuf>,

    /// Size of the written output in bytes.
    pub bytes_written: Option<u64>,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Time spent loading section documents.
    pub load_time: Duration,

    /// Time spent assembling, including the bookmark and finalizing.
    pub merge_time: Duration,

    /// Time spent writing the output.
    pub write_time: Duration,

    /// Wall time of the whole run.
    pub total_time: Duration,
}

impl AssemblyReport {
    /// Pages in the output.
    pub fn output_pages(&self) -> usize {
        self.plan.output_pages
    }

    /// The bookmark that was (or would be) added.
    pub fn bookmark(&self) -> Option<&Bookmark> {
        self.plan.bookmark.as_ref()
    }

    /// Roles that were merged, in output order.
    pub fn merged_roles(&self) -> Vec<Role> {
        self.plan.steps.iter().map(|step| step.role()).collect()
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PdfBindError::from(std::io::Error::from(e)))
    }
}

/// Assemble the project folder described by `config`.
///
/// Interactive overwrite prompting is left to the caller: only
/// [`OverwriteMode::NoClobber`] is enforced here, any other mode replaces an
/// existing output.
///
/// # Errors
///
/// Any stage failure is returned unchanged; nothing is written in that case.
///
/// # Examples
///
/// ```no_run
/// use pdfbind::assemble::assemble_folder;
/// use pdfbind::config::Config;
/// use pdfbind::events::LogSink;
///
/// # fn example() -> pdfbind::Result<()> {
/// let report = assemble_folder(&Config::new("projects/Раздел 1"), &mut LogSink)?;
/// println!("{} pages", report.output_pages());
/// # Ok(())
/// # }
/// ```
pub fn assemble_folder(config: &Config, sink: &mut dyn EventSink) -> Result<AssemblyReport> {
    let start = Instant::now();
    config.validate()?;

    let files = FolderScanner::excluding(&config.output).scan(&config.folder)?;
    sink.emit(&AssemblyEvent::FolderScanned {
        folder: config.folder.clone(),
        pdf_count: files.len(),
    });

    let classification =
        Classifier::new(config.patterns.clone(), config.case_policy).classify(&files);
    let assignment = RoleResolver::new().resolve(&classification, sink);
    assignment.require(Role::MainBody)?;

    let load_start = Instant::now();
    let sources =
        PdfReader::new().load_roles(&assignment, &config.plan.merged_roles(), sink)?;
    let load_time = load_start.elapsed();

    let plan = Planner::new(config.plan.clone()).plan(&assignment, &page_counts(&sources))?;
    sink.emit(&AssemblyEvent::PlanReady {
        steps: plan.steps.len(),
        output_pages: plan.output_pages,
    });

    let mut report = AssemblyReport {
        folder: config.folder.clone(),
        assignment,
        plan,
        output: None,
        bytes_written: None,
        dry_run: config.dry_run,
        load_time,
        merge_time: Duration::ZERO,
        write_time: Duration::ZERO,
        total_time: Duration::ZERO,
    };

    if config.dry_run {
        report.total_time = start.elapsed();
        return Ok(report);
    }

    if config.overwrite_mode == OverwriteMode::NoClobber && config.output.exists() {
        return Err(PdfBindError::output_exists(config.output.clone()));
    }
    let writer = PdfWriter::new();
    writer.can_write(&config.output)?;

    let merge_start = Instant::now();
    let assembler = Assembler::new();
    let mut doc = assembler.assemble(&report.plan, &sources, sink)?;
    drop(sources);

    if let Some(bookmark) = &report.plan.bookmark {
        BookmarkInjector::new().inject(&mut doc, bookmark)?;
        sink.emit(&AssemblyEvent::BookmarkAdded {
            label: bookmark.label.clone(),
            page: bookmark.target_page,
        });
    }
    assembler.finalize(&mut doc, config.compression);
    report.merge_time = merge_start.elapsed();

    let stats = writer.save(&mut doc, &config.output)?;
    sink.emit(&AssemblyEvent::OutputWritten {
        path: stats.output_path.clone(),
        bytes: stats.file_size,
    });

    report.output = Some(stats.output_path);
    report.bytes_written = Some(stats.file_size);
    report.write_time = stats.write_time;
    report.total_time = start.elapsed();

    Ok(report)
}
