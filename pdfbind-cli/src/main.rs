//! pdfbind - Assemble a project explanatory note from its section PDFs.

mod cli;

use clap::Parser;
use std::process;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::cli::Cli;
use pdfbind::assemble::assemble_folder;
use pdfbind::config::{Config, OverwriteMode};
use pdfbind::error::PdfBindError;
use pdfbind::output::{FormatterSink, OutputFormatter, display_report};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfBindError> {
    let mut config = cli.to_config()?;
    log::debug!("configuration: {config:?}");

    let formatter = if cli.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    if formatter.is_verbose() {
        formatter.section(&format!("{} v{}", pdfbind::NAME, pdfbind::VERSION));
    }

    if !config.dry_run {
        handle_output_overwrite(&mut config, &formatter).await?;
    }

    let report = assemble_folder(&config, &mut FormatterSink::new(&formatter))?;
    log::info!(
        "{} page(s) from {} section(s) in {:.2?}",
        report.output_pages(),
        report.merged_roles().len(),
        report.total_time
    );

    if cli.json {
        formatter.raw(&report.to_json()?);
    } else {
        display_report(&formatter, &report);
        if report.dry_run {
            formatter.info(&format!("  Output would be: {}", config.output.display()));
            formatter.info("  Run without --dry-run to create the document");
        }
    }

    Ok(())
}

/// Handle output file overwrite scenarios.
///
/// A confirmed prompt turns into [`OverwriteMode::Force`] so the library
/// replaces the file.
async fn handle_output_overwrite(
    config: &mut Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfBindError> {
    if !tokio::fs::try_exists(&config.output).await.unwrap_or(false) {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfBindError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // Nobody to ask.
            if formatter.is_quiet() {
                return Err(PdfBindError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            let mut stdout = tokio::io::stdout();
            stdout.write_all(b"Overwrite? [y/N]: ").await?;
            stdout.flush().await?;

            let mut response = String::new();
            BufReader::new(tokio::io::stdin())
                .read_line(&mut response)
                .await?;

            if confirms(&response) {
                log::debug!("overwrite of {} confirmed", config.output.display());
                config.overwrite_mode = OverwriteMode::Force;
                Ok(())
            } else {
                Err(PdfBindError::Cancelled)
            }
        }
    }
}

fn confirms(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}
