//! PDF writing.
//!
//! Output is written atomically: the document is saved to a hidden temp file
//! next to the destination and renamed over it once complete. On any failure
//! the temp file is removed and the destination is left untouched.
//!
//! Compression and renumbering are applied by the assembler, so the writer
//! saves the document exactly as given.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::io::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(mut doc: Document) -> pdfbind::Result<()> {
//! let stats = PdfWriter::new().save(&mut doc, Path::new("Раздел 1.pdf"))?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PdfBindError, Result};

const BUFFER_SIZE: usize = 64 * 1024;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Atomic PDF writer.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new PDF writer.
    pub fn new() -> Self {
        Self
    }

    /// Save `doc` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `OutputWriteError` if the temp file cannot be created or
    /// written, or the final rename fails.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let temp_path = temp_path_for(path);

        if let Err(err) = write_file(doc, &temp_path).and_then(|()| {
            std::fs::rename(&temp_path, path)
                .map_err(|e| PdfBindError::output_write(path.to_path_buf(), e))
        }) {
            // Best effort; the original error is what matters.
            let _ = std::fs::remove_file(&temp_path);
            return Err(err);
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        log::debug!("wrote {} ({} bytes)", path.display(), file_size);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
        })
    }

    /// Check that the destination directory exists and is writable.
    ///
    /// # Errors
    ///
    /// Returns `OutputWriteError` describing the first problem found.
    pub fn can_write(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let metadata = std::fs::metadata(parent)
            .map_err(|e| PdfBindError::output_write(path.to_path_buf(), e))?;

        if !metadata.is_dir() {
            return Err(PdfBindError::output_write(
                path.to_path_buf(),
                std::io::Error::other(format!("{} is not a directory", parent.display())),
            ));
        }

        if metadata.permissions().readonly() {
            return Err(PdfBindError::output_write(
                path.to_path_buf(),
                std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("output directory is not writable: {}", parent.display()),
                ),
            ));
        }

        Ok(())
    }
}

fn write_file(doc: &mut Document, temp_path: &Path) -> Result<()> {
    let file =
        File::create(temp_path).map_err(|e| PdfBindError::output_write(temp_path.into(), e))?;
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);

    doc.save_to(&mut writer)
        .map_err(|e| PdfBindError::output_write(temp_path.into(), std::io::Error::other(e)))?;

    writer
        .flush()
        .map_err(|e| PdfBindError::output_write(temp_path.into(), e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| PdfBindError::output_write(temp_path.into(), e))
}

/// Hidden sibling of `path` used while writing.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.pdf".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
