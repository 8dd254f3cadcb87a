//! Source files discovered in a project folder.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A PDF found directly inside the project folder.
///
/// `name` is the file name (stem plus extension) and is what classification
/// matches against. Ordering is by name, then by path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceFile {
    /// File name including extension.
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
}

impl SourceFile {
    /// Create a source file from a path, deriving the name from it.
    ///
    /// Non UTF-8 names are converted lossily; they can still be merged but
    /// will only match patterns through their replacement characters.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    /// Path to the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
