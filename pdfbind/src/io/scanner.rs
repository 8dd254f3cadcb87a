//! Project folder listing.
//!
//! Only the top level of the folder is considered. A file is a candidate
//! when its extension is `pdf` in any case; subfolders are never entered.

use glob::MatchOptions;
use std::path::{Path, PathBuf};

use crate::error::{PdfBindError, Result};
use crate::source::SourceFile;

/// Lists candidate PDFs in a project folder.
#[derive(Debug, Clone, Default)]
pub struct FolderScanner {
    exclude: Option<PathBuf>,
}

impl FolderScanner {
    /// Create a scanner that keeps every PDF.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip `path` while scanning; used to keep a previous output out of
    /// the candidates.
    pub fn excluding(path: impl Into<PathBuf>) -> Self {
        Self {
            exclude: Some(path.into()),
        }
    }

    /// List the PDF files of `folder`, sorted by name.
    ///
    /// # Errors
    ///
    /// - `FolderNotFound` if `folder` does not exist
    /// - `NotAFolder` if it is not a directory
    /// - `FolderScanFailed` if the path is not UTF-8 or listing fails
    ///   part-way
    pub fn scan(&self, folder: &Path) -> Result<Vec<SourceFile>> {
        let metadata = std::fs::metadata(folder).map_err(|_| PdfBindError::FolderNotFound {
            path: folder.to_path_buf(),
        })?;
        if !metadata.is_dir() {
            return Err(PdfBindError::NotAFolder {
                path: folder.to_path_buf(),
            });
        }

        let folder_str = folder
            .to_str()
            .ok_or_else(|| scan_failed(folder, "folder path is not valid UTF-8"))?;
        let pattern = format!("{}/*.pdf", glob::Pattern::escape(folder_str));
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };

        let entries = glob::glob_with(&pattern, options).map_err(|err| scan_failed(folder, err))?;

        let exclude = self.exclude.as_deref().map(normalize);
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| scan_failed(folder, err))?;
            if !path.is_file() {
                continue;
            }
            if exclude.as_deref() == Some(normalize(&path).as_path()) {
                log::debug!("skipping output file {}", path.display());
                continue;
            }
            files.push(SourceFile::from_path(path));
        }

        files.sort();
        log::debug!("{} PDF file(s) in {}", files.len(), folder.display());
        Ok(files)
    }
}

fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn scan_failed(folder: &Path, err: impl ToString) -> PdfBindError {
    PdfBindError::FolderScanFailed {
        path: folder.to_path_buf(),
        reason: err.to_string(),
    }
}
