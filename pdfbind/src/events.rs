//! Structured progress events.
//!
//! Components that report progress take an `&mut dyn EventSink` instead of
//! printing. The CLI renders events through the output formatter, library
//! users can log them, collect them, or pass a closure.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::classify::Role;
use crate::source::SourceFile;

/// Something noteworthy that happened during an assembly run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum AssemblyEvent {
    /// The project folder was listed.
    FolderScanned {
        /// Folder that was scanned.
        folder: PathBuf,
        /// Number of PDF files found.
        pdf_count: usize,
    },

    /// A role was resolved to a file, or found absent.
    RoleResolved {
        /// The role.
        role: Role,
        /// Chosen file, `None` when absent.
        file: Option<SourceFile>,
        /// Number of files that matched the role.
        candidates: usize,
    },

    /// More than one file matched a role; the first one was chosen.
    AmbiguousRole {
        /// The role.
        role: Role,
        /// File that was chosen.
        chosen: SourceFile,
        /// Matching files that were ignored.
        ignored: Vec<SourceFile>,
    },

    /// One file was chosen for several roles; its pages appear once per role.
    SharedSource {
        /// The shared file.
        file: SourceFile,
        /// Roles the file was chosen for, in canonical order.
        roles: Vec<Role>,
    },

    /// A source document was loaded.
    SourceLoaded {
        /// Role of the document.
        role: Role,
        /// The file.
        file: SourceFile,
        /// Page count.
        pages: usize,
    },

    /// The merge plan was computed.
    PlanReady {
        /// Number of merge steps.
        steps: usize,
        /// Expected number of output pages.
        output_pages: usize,
    },

    /// A merge step was applied to the output document.
    StepCompleted {
        /// One-based step number.
        index: usize,
        /// Total number of steps.
        total: usize,
        /// Role of the appended document.
        role: Role,
        /// Pages appended by this step.
        pages: usize,
    },

    /// The navigation bookmark was attached.
    BookmarkAdded {
        /// Bookmark title.
        label: String,
        /// Zero-based target page.
        page: usize,
    },

    /// The output file was written.
    OutputWritten {
        /// Destination path.
        path: PathBuf,
        /// Size in bytes.
        bytes: u64,
    },
}

impl fmt::Display for AssemblyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FolderScanned { folder, pdf_count } => {
                write!(f, "Found {pdf_count} PDF file(s) in {}", folder.display())
            }
            Self::RoleResolved {
                role,
                file: Some(file),
                ..
            } => write!(f, "{role} found: {file}"),
            Self::RoleResolved {
                role, file: None, ..
            } => write!(f, "{role} not found"),
            Self::AmbiguousRole {
                role,
                chosen,
                ignored,
            } => {
                let ignored: Vec<&str> = ignored.iter().map(|s| s.name.as_str()).collect();
                write!(
                    f,
                    "{} file(s) match the {role}; using {chosen}, ignoring {}",
                    ignored.len() + 1,
                    ignored.join(", ")
                )
            }
            Self::SharedSource { file, roles } => {
                let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
                write!(f, "{file} was chosen for several roles: {}", roles.join(", "))
            }
            Self::SourceLoaded { role, file, pages } => {
                write!(f, "Loaded {role} {file} ({pages} pages)")
            }
            Self::PlanReady {
                steps,
                output_pages,
            } => write!(f, "Merge plan: {steps} step(s), {output_pages} pages"),
            Self::StepCompleted {
                index,
                total,
                role,
                pages,
            } => write!(f, "[{index}/{total}] Appended {role} ({pages} pages)"),
            Self::BookmarkAdded { label, page } => {
                write!(f, "Bookmark '{label}' added at page {}", page + 1)
            }
            Self::OutputWritten { path, bytes } => {
                write!(f, "Wrote {} ({bytes} bytes)", path.display())
            }
        }
    }
}

/// Receiver of assembly events.
pub trait EventSink {
    /// Handle one event.
    fn emit(&mut self, event: &AssemblyEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&AssemblyEvent),
{
    fn emit(&mut self, event: &AssemblyEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AssemblyEvent) {}
}

/// Forwards events to the `log` facade.
///
/// Ambiguous roles and shared files are logged as warnings, everything else
/// at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &AssemblyEvent) {
        match event {
            AssemblyEvent::AmbiguousRole { .. } | AssemblyEvent::SharedSource { .. } => {
                log::warn!("{event}")
            }
            _ => log::info!("{event}"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Events in emission order.
    pub events: Vec<AssemblyEvent>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AssemblyEvent) {
        self.events.push(event.clone());
    }
}
