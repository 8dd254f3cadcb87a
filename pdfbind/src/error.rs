//! Error types for pdfbind.
//!
//! Every failure of an assembly run is fatal to that run: there is no
//! degraded output and nothing is written to the destination path.
//! Errors carry enough context (role, file, range, path) for the user to
//! see which part of the document could not be assembled.
//!
//! # Error Categories
//!
//! - **Role Errors**: a required section is missing from the folder
//! - **Source Errors**: a section PDF cannot be opened or parsed
//! - **Plan Errors**: a computed page range does not fit a document
//! - **Output Errors**: the assembled document cannot be written

use std::io;
use std::path::PathBuf;

use crate::classify::Role;
use crate::plan::PageRange;

/// Result type alias for pdfbind operations.
pub type Result<T> = std::result::Result<T, PdfBindError>;

/// Main error type for pdfbind operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfBindError {
    /// A role required for assembly did not resolve to any file.
    #[error(
        "Missing required document: {role}\n  \
         Hint: the folder must contain a PDF whose name marks it as the {role}"
    )]
    MissingRequiredDocument {
        /// The role that could not be resolved.
        role: Role,
    },

    /// A resolved source file could not be opened or parsed as a PDF.
    #[error("Failed to read {role} from {}\n  Reason: {reason}", path.display())]
    SourceReadError {
        /// Role the file was resolved for.
        role: Role,
        /// Path to the source file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// A computed page range falls outside the document's pages.
    #[error(
        "Invalid page range {range} for {role}: {}\n  \
         Document has {total_pages} page(s)",
        path.display()
    )]
    PageRangeError {
        /// Role of the document the range applies to.
        role: Role,
        /// Path to the document.
        path: PathBuf,
        /// The offending range.
        range: PageRange,
        /// Pages actually present in the document.
        total_pages: usize,
    },

    /// The assembled document could not be written to its destination.
    #[error("Failed to write output file: {}\n  Reason: {source}", path.display())]
    OutputWriteError {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The project folder does not exist.
    #[error("Folder not found: {}", path.display())]
    FolderNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The project path exists but is not a folder.
    #[error("Not a folder: {}", path.display())]
    NotAFolder {
        /// Offending path.
        path: PathBuf,
    },

    /// Listing the project folder failed.
    #[error("Failed to scan folder: {}\n  Reason: {reason}", path.display())]
    FolderScanFailed {
        /// Folder being scanned.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Outline entry could not be attached.
    #[error("Failed to add bookmark '{label}': {reason}")]
    BookmarkFailed {
        /// Bookmark label.
        label: String,
        /// Details about the failure.
        reason: String,
    },

    /// The page tree of the output document could not be updated.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl PdfBindError {
    /// Create a MissingRequiredDocument error.
    pub fn missing(role: Role) -> Self {
        Self::MissingRequiredDocument { role }
    }

    /// Create a SourceReadError error.
    pub fn source_read(role: Role, path: PathBuf, reason: impl Into<String>) -> Self {
        Self::SourceReadError {
            role,
            path,
            reason: reason.into(),
        }
    }

    /// Create an OutputWriteError error.
    pub fn output_write(path: PathBuf, source: io::Error) -> Self {
        Self::OutputWriteError { path, source }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Role the error is about, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::MissingRequiredDocument { role }
            | Self::SourceReadError { role, .. }
            | Self::PageRangeError { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig { .. } => 1,
            Self::MissingRequiredDocument { .. } => 2,
            Self::FolderNotFound { .. } => 2,
            Self::NotAFolder { .. } => 2,
            Self::FolderScanFailed { .. } => 2,
            Self::SourceReadError { .. } => 3,
            Self::PageRangeError { .. } => 4,
            Self::OutputWriteError { .. } => 5,
            Self::Io { .. } => 5,
            Self::OutputExists { .. } => 6,
            Self::BookmarkFailed { .. } => 7,
            Self::MergeFailed { .. } => 7,
            Self::Cancelled => 130, // Standard exit code for SIGINT
        }
    }
}

impl From<anyhow::Error> for PdfBindError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}
