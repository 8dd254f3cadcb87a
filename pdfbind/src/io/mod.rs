//! I/O operations for pdfbind.
//!
//! - [`scanner`]: lists the candidate PDFs of a project folder
//! - [`reader`]: loads the resolved section documents
//! - [`writer`]: saves the assembled document atomically

pub mod reader;
pub mod scanner;
pub mod writer;

pub use reader::{LoadedPdf, LoadedSources, PdfReader, page_counts};
pub use scanner::FolderScanner;
pub use writer::{PdfWriter, WriteStatistics, format_file_size};
