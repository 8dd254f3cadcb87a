//! CLI argument parsing for pdfbind.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let config = cli.to_config().expect("invalid arguments");
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfbind::classify::CasePolicy;
use pdfbind::config::{CompressionLevel, Config, OverwriteMode};
use pdfbind::error::Result;
use pdfbind::plan::CHANGES_TABLE_LABEL;

/// Assemble a project explanatory note from the section PDFs in a folder.
///
/// pdfbind recognises the title page, the explanatory note body, the change
/// registration table and the information-certification sheet by file name,
/// and binds them into one PDF with a bookmark on the change registration
/// table.
#[derive(Parser, Debug)]
#[command(name = "pdfbind")]
#[command(version)]
#[command(about = "Assemble a project explanatory note from its section PDFs", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Project folder containing the section PDFs
    ///
    /// Only PDF files directly inside the folder are considered.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Output PDF file path
    ///
    /// Defaults to <FOLDER>/<folder name>.pdf. The output file is never
    /// treated as a section, so the command can be rerun in place.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Dry run - classify the folder and show the merge plan without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show page counts, merge steps and timings
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    ///
    /// If the output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression (preserves exact structure)
    /// - standard: Compress content streams (default)
    /// - maximum: Also drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Append the information-certification sheet after the change
    /// registration table
    ///
    /// By default the sheet is recognised but left out of the output.
    #[arg(long)]
    pub include_info_sheet: bool,

    /// Match every section file name case-insensitively
    #[arg(long)]
    pub ignore_case: bool,

    /// Title of the bookmark pointing at the change registration table
    #[arg(long, value_name = "TEXT", default_value = CHANGES_TABLE_LABEL)]
    pub bookmark_label: String,

    /// Print the assembly report as JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the compression level is unknown or the
    /// resulting configuration does not validate.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::new(&self.folder);

        if let Some(output) = &self.output {
            config.output = output.clone();
        }

        config.dry_run = self.dry_run;
        // JSON goes to stdout alone.
        config.verbose = self.verbose && !self.json;
        config.quiet = self.quiet || self.json;
        config.compression = CompressionLevel::from_str(&self.compression)?;

        config.overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        if self.ignore_case {
            config.case_policy = CasePolicy::Insensitive;
        }
        config.plan.include_info_sheet = self.include_info_sheet;
        config.plan.bookmark_label = self.bookmark_label.clone();

        config.validate()?;
        Ok(config)
    }
}
