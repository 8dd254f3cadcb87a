//! pdfbind - Assemble a project explanatory note from its section PDFs.
//!
//! A project folder holds the separately produced parts of one document: a
//! title page, the explanatory note body, an optional change registration
//! table and an optional information-certification sheet. pdfbind recognises
//! each part by its file name and binds them into a single PDF:
//!
//! - title page pages replace the leading pages of the body
//! - the change registration table is appended at the end
//! - the sections keep their own bookmarks, and one more is added for the
//!   first page of the change registration table
//!
//! # Examples
//!
//! ## Assembling a folder
//!
//! ```no_run
//! use pdfbind::assemble::assemble_folder;
//! use pdfbind::config::Config;
//! use pdfbind::events::LogSink;
//!
//! # fn example() -> pdfbind::Result<()> {
//! let report = assemble_folder(&Config::new("projects/Раздел 1"), &mut LogSink)?;
//! println!("Wrote {} pages", report.output_pages());
//! # Ok(())
//! # }
//! ```
//!
//! ## Planning without writing
//!
//! ```no_run
//! use pdfbind::classify::{Classifier, RoleResolver};
//! use pdfbind::events::NullSink;
//! use pdfbind::io::{FolderScanner, PdfReader, page_counts};
//! use pdfbind::plan::{PlanOptions, Planner};
//!
//! # fn example() -> pdfbind::Result<()> {
//! let files = FolderScanner::new().scan(std::path::Path::new("projects/Раздел 1"))?;
//! let classification = Classifier::default().classify(&files);
//! let assignment = RoleResolver::new().resolve(&classification, &mut NullSink);
//!
//! let options = PlanOptions::default();
//! let sources = PdfReader::new().load_roles(&assignment, &options.merged_roles(), &mut NullSink)?;
//! let plan = Planner::new(options).plan(&assignment, &page_counts(&sources))?;
//! println!("{} steps, {} pages", plan.steps.len(), plan.output_pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod classify;
pub mod config;
pub mod error;
pub mod events;
pub mod io;
pub mod merge;
pub mod output;
pub mod plan;
pub mod source;

#[cfg(test)]
mod testing;

pub use assemble::{AssemblyReport, assemble_folder};
pub use config::Config;
pub use error::{PdfBindError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
