//! Configuration module for pdfbind.
//!
//! A [`Config`] describes one assembly run: which folder to read, where to
//! write, how to recognise the document sections and how to post-process the
//! output. The CLI builds it from its arguments; library users can start from
//! [`Config::new`] and adjust fields.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::PdfBindError;
use crate::classify::{CasePolicy, RolePatterns};
use crate::plan::PlanOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - preserves exact structure.
    None,
    /// Compress content streams.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfBindError;

    /// Parse "none", "standard" or "maximum" (any case).
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfBindError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for one assembly run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project folder holding the section PDFs.
    pub folder: PathBuf,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Dry run mode - classify and plan without writing.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// File-name patterns recognising each section.
    pub patterns: RolePatterns,

    /// How pattern case sensitivity is applied.
    pub case_policy: CasePolicy,

    /// Options that alter the merge plan.
    pub plan: PlanOptions,
}

impl Config {
    /// Create a configuration with defaults for `folder`.
    ///
    /// The output goes to `<folder>/<folder name>.pdf`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfbind::config::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::new("projects/Раздел 1");
    /// assert_eq!(config.output, Path::new("projects/Раздел 1/Раздел 1.pdf"));
    /// ```
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        let folder = folder.into();
        let output = default_output(&folder);
        Self {
            folder,
            output,
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            patterns: RolePatterns::default(),
            case_policy: CasePolicy::default(),
            plan: PlanOptions::default(),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - The bookmark label is blank
    /// - A role has no synonyms, or a blank one
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.plan.bookmark_label.trim().is_empty() {
            bail!("Bookmark label cannot be empty");
        }

        for (role, pattern) in self.patterns.iter() {
            if pattern.synonyms.is_empty() {
                bail!("No file-name synonyms configured for the {role}");
            }
            if pattern.synonyms.iter().any(|s| s.trim().is_empty()) {
                bail!("Empty file-name synonym configured for the {role}");
            }
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

/// Default output path for a project folder: `<folder>/<folder name>.pdf`.
///
/// Falls back to `output.pdf` when the folder has no usable name (e.g. `/`).
pub fn default_output(folder: &Path) -> PathBuf {
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "output".to_string());
    folder.join(format!("{name}.pdf"))
}
