//! User-facing output.
//!
//! [`FormatterSink`] renders assembly events as they happen;
//! [`display_report`] prints the final summary.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::assemble::assemble_folder;
//! use pdfbind::config::Config;
//! use pdfbind::output::{FormatterSink, OutputFormatter, display_report};
//!
//! # fn example(config: Config) -> pdfbind::Result<()> {
//! let formatter = OutputFormatter::from_config(&config);
//! let report = assemble_folder(&config, &mut FormatterSink::new(&formatter))?;
//! display_report(&formatter, &report);
//! # Ok(())
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::assemble::AssemblyReport;
use crate::events::{AssemblyEvent, EventSink};
use crate::io::format_file_size;
use crate::plan::MergeStep;

/// Level an event is displayed at.
pub fn event_level(event: &AssemblyEvent) -> MessageLevel {
    match event {
        AssemblyEvent::AmbiguousRole { .. } | AssemblyEvent::SharedSource { .. } => {
            MessageLevel::Warning
        }
        AssemblyEvent::RoleResolved { file: None, role, .. } if role.is_required() => {
            MessageLevel::Warning
        }
        AssemblyEvent::RoleResolved { .. } | AssemblyEvent::FolderScanned { .. } => {
            MessageLevel::Info
        }
        AssemblyEvent::BookmarkAdded { .. } | AssemblyEvent::OutputWritten { .. } => {
            MessageLevel::Success
        }
        AssemblyEvent::SourceLoaded { .. }
        | AssemblyEvent::PlanReady { .. }
        | AssemblyEvent::StepCompleted { .. } => MessageLevel::Debug,
    }
}

/// Event sink printing through an [`OutputFormatter`].
pub struct FormatterSink<'a> {
    formatter: &'a OutputFormatter,
}

impl<'a> FormatterSink<'a> {
    /// Wrap a formatter.
    pub fn new(formatter: &'a OutputFormatter) -> Self {
        Self { formatter }
    }
}

impl EventSink for FormatterSink<'_> {
    fn emit(&mut self, event: &AssemblyEvent) {
        log::debug!("{event}");

        let message = event.to_string();
        match event_level(event) {
            MessageLevel::Info => self.formatter.info(&message),
            MessageLevel::Success => self.formatter.success(&message),
            MessageLevel::Warning => self.formatter.warning(&message),
            MessageLevel::Error => self.formatter.error(&message),
            MessageLevel::Debug => self.formatter.debug(&message),
        }
    }
}

/// One line per merge step, e.g. `ПЗ.pdf: pages 3-10 (explanatory note)`.
pub fn describe_step(step: &MergeStep) -> String {
    match step {
        MergeStep::Whole {
            role,
            source,
            pages,
        } => format!("{source}: all {pages} page(s) ({role})"),
        MergeStep::Range {
            role,
            source,
            range,
        } if range.is_empty() => format!("{source}: no pages ({role})"),
        MergeStep::Range {
            role,
            source,
            range,
        } => format!(
            "{source}: pages {}-{} ({role})",
            range.start + 1,
            range.end
        ),
    }
}

/// Display the summary of a finished run.
pub fn display_report(formatter: &OutputFormatter, report: &AssemblyReport) {
    formatter.section(if report.dry_run {
        "Merge plan (dry run):"
    } else {
        "Merge plan:"
    });
    for (idx, step) in report.plan.steps.iter().enumerate() {
        formatter.list_item(idx + 1, &describe_step(step));
    }

    match report.bookmark() {
        Some(bookmark) => formatter.info(&format!(
            "Bookmark '{}' at page {}",
            bookmark.label,
            bookmark.target_page + 1
        )),
        None => formatter.debug("No change registration table, no bookmark"),
    }

    formatter.detail("Load time", &format!("{:.2?}", report.load_time));
    formatter.detail("Merge time", &format!("{:.2?}", report.merge_time));
    formatter.detail("Write time", &format!("{:.2?}", report.write_time));

    match (&report.output, report.bytes_written) {
        (Some(path), Some(bytes)) => formatter.success(&format!(
            "Assembled {} page(s) into {} ({})",
            report.output_pages(),
            path.display(),
            format_file_size(bytes)
        )),
        _ => formatter.info(&format!(
            "Dry run: {} page(s) would be written",
            report.output_pages()
        )),
    }
}
