//! PDF loading.
//!
//! Every resolved section is loaded in full with `lopdf`, which reads the
//! file and releases the handle before returning. Loading is sequential.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::classify::Role;
//! use pdfbind::io::PdfReader;
//! use pdfbind::source::SourceFile;
//!
//! # fn example() -> pdfbind::Result<()> {
//! let file = SourceFile::from_path("project/ПЗ.pdf");
//! let loaded = PdfReader::new().load(Role::MainBody, &file)?;
//! println!("{} has {} pages", loaded.source, loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::classify::{Role, RoleAssignment};
use crate::error::{PdfBindError, Result};
use crate::events::{AssemblyEvent, EventSink};
use crate::plan::PageCounts;
use crate::source::SourceFile;

/// A loaded section document.
#[derive(Debug, Clone)]
pub struct LoadedPdf {
    /// Role the document was loaded for.
    pub role: Role,

    /// The source file.
    pub source: SourceFile,

    /// The PDF document.
    pub document: Document,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// Loaded documents keyed by role.
pub type LoadedSources = BTreeMap<Role, LoadedPdf>;

/// PDF reader.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load the document resolved for `role`.
    ///
    /// # Errors
    ///
    /// Returns `SourceReadError` if the file cannot be read or parsed, or
    /// has no pages.
    pub fn load(&self, role: Role, source: &SourceFile) -> Result<LoadedPdf> {
        let start = Instant::now();

        let document = Document::load(&source.path).map_err(|e| {
            PdfBindError::source_read(role, source.path.clone(), e.to_string())
        })?;

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfBindError::source_read(
                role,
                source.path.clone(),
                "PDF has no pages",
            ));
        }

        let file_size = std::fs::metadata(&source.path)
            .map(|m| m.len())
            .unwrap_or(0);

        log::debug!(
            "loaded {} ({} pages, {} bytes)",
            source.path.display(),
            page_count,
            file_size
        );

        Ok(LoadedPdf {
            role,
            source: source.clone(),
            document,
            page_count,
            load_time: start.elapsed(),
            file_size,
        })
    }

    /// Load the documents of `roles` that are present in `assignment`.
    ///
    /// Stops at the first failure; roles absent from the assignment are
    /// skipped.
    pub fn load_roles(
        &self,
        assignment: &RoleAssignment,
        roles: &[Role],
        sink: &mut dyn EventSink,
    ) -> Result<LoadedSources> {
        let mut loaded = LoadedSources::new();

        for &role in roles {
            let Some(source) = assignment.get(role) else {
                continue;
            };

            let pdf = self.load(role, source)?;
            sink.emit(&AssemblyEvent::SourceLoaded {
                role,
                file: pdf.source.clone(),
                pages: pdf.page_count,
            });
            loaded.insert(role, pdf);
        }

        Ok(loaded)
    }
}

/// Page count of every loaded document.
pub fn page_counts(sources: &LoadedSources) -> PageCounts {
    sources
        .iter()
        .map(|(role, pdf)| (*role, pdf.page_count))
        .collect()
}
