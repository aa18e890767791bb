//! duplexcat - Merge PDF files into one print job for double-sided printing.
//!
//! Reads the input files, pads every odd-length document with a blank
//! page, writes the merged PDF and optionally asks a hosted model for
//! print advice on each input.

mod cli;

use clap::Parser;
use serde_json::json;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use duplexcat::advisory::{self, Advisor};
use duplexcat::config::{Config, OverwriteMode};
use duplexcat::error::DuplexCatError;
use duplexcat::io::{DocumentReader, PdfWriter};
use duplexcat::merge::{MergeOptions, MergeReport, Processor};
use duplexcat::output::{
    OutputFormatter, ProgressBar, ProgressStyle, display_advice, display_merge_report,
    display_validation_summary,
};
use duplexcat::InputDocument;
use duplexcat::validation::Validator;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(&cli);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install the log subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(cli: &Cli) {
    let default_directive = if cli.verbose {
        "duplexcat=debug"
    } else {
        "error"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(mut cli: Cli) -> Result<(), DuplexCatError> {
    // Validate CLI arguments
    cli.validate()?;

    // Expand globs and append the input list before building the config
    cli.inputs = cli.get_all_inputs().await?;
    let config = cli.to_config()?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", duplexcat::NAME, duplexcat::VERSION));
        formatter.blank_line();
    }

    formatter.info(&format!("Reading {} file(s)...", config.inputs.len()));
    let (documents, read_stats) = DocumentReader::new().read_all(&config.inputs).await?;
    formatter.debug(&format!(
        "Read {} file(s), {} in {:.2}s",
        read_stats.files_read,
        read_stats.format_total_size(),
        read_stats.read_time.as_secs_f64()
    ));

    // Dry run mode - inspect and stop here
    if config.dry_run {
        return dry_run(&config, &formatter, &documents).await;
    }

    // Validate output before spending time on the merge
    Validator::new().validate_output(&config).await?;
    handle_output_overwrite(&config, &formatter)?;

    let advice_inputs = config.advisory.is_some().then(|| documents.clone());

    formatter.info("Merging documents...");
    let mut progress = if formatter.should_print() {
        ProgressBar::new(ProgressStyle::Bar)
    } else {
        ProgressBar::disabled()
    };

    let processor = Processor::with_options(MergeOptions {
        compression: config.compression,
    });
    let (result, timing) = processor
        .process_timed(documents, |event| progress.observe(&event))
        .await?;
    progress.finish();

    let report = result.report;
    if config.strict && report.skipped_count() > 0 {
        if config.json {
            print_json(&json!({ "report": &report }))?;
        } else {
            display_merge_report(&formatter, &report);
        }
        return Err(DuplexCatError::DocumentsSkipped {
            skipped: report.skipped_count(),
            total: report.outcomes.len(),
        });
    }

    // Write the output
    formatter.info(&format!("Writing to: {}", config.output.display()));
    let write_stats = PdfWriter::new()
        .write_bytes(&result.bytes, &config.output)
        .await?;

    let advice = match (&config.advisory, advice_inputs) {
        (Some(advisory_config), Some(inputs)) => {
            let advisor = Advisor::new(advisory_config.clone())
                .map_err(|e| DuplexCatError::other(e.to_string()))?;
            collect_advice(&advisor, &formatter, &inputs, &report).await
        }
        _ => Vec::new(),
    };

    if config.json {
        let advice: Vec<_> = advice
            .iter()
            .map(|(name, text)| json!({ "name": name, "advice": text }))
            .collect();
        return print_json(&json!({
            "output": config.output.display().to_string(),
            "fileSize": write_stats.file_size,
            "report": &report,
            "advice": advice,
        }));
    }

    display_merge_report(&formatter, &report);
    for (name, text) in &advice {
        display_advice(&formatter, name, text);
    }

    if formatter.should_print() {
        formatter.blank_line();
        formatter.success(&format!(
            "Successfully created {} ({})",
            config.output.display(),
            write_stats.format_file_size()
        ));

        if formatter.is_verbose() {
            formatter.blank_line();
            formatter.section("Statistics");
            formatter.detail("Input files", &read_stats.files_read.to_string());
            formatter.detail("Input size", &read_stats.format_total_size());
            formatter.detail("Output pages", &report.total_pages.to_string());
            formatter.detail("Blank pages", &report.blank_pages_added().to_string());
            formatter.detail("Output size", &write_stats.format_file_size());
            formatter.detail(
                "Merge time",
                &format!("{:.2}s", timing.merge_time.as_secs_f64()),
            );
            formatter.detail(
                "Serialize time",
                &format!("{:.2}s", timing.serialize_time.as_secs_f64()),
            );
            formatter.detail(
                "Write time",
                &format!("{:.2}s", write_stats.write_time.as_secs_f64()),
            );
            formatter.detail("Compression", config.compression.as_str());
        }
    }

    Ok(())
}

/// Inspect the inputs, report the predicted output and write nothing.
async fn dry_run(
    config: &Config,
    formatter: &OutputFormatter,
    documents: &[InputDocument],
) -> Result<(), DuplexCatError> {
    let summary = Validator::new().inspect(documents).await;

    if config.json {
        print_json(&summary)?;
    } else {
        display_validation_summary(formatter, &summary);
        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!("  Output would be: {}", config.output.display()));
        formatter.info("  Run without --dry-run to create the merged PDF");
    }

    if config.strict && summary.has_skipped() {
        return Err(DuplexCatError::DocumentsSkipped {
            skipped: summary.skipped.len(),
            total: documents.len(),
        });
    }

    Ok(())
}

/// Ask for print advice on every merged input, in input order.
///
/// Advice never fails the run; documents whose text cannot be extracted
/// are left out with a warning.
async fn collect_advice(
    advisor: &Advisor,
    formatter: &OutputFormatter,
    inputs: &[InputDocument],
    report: &MergeReport,
) -> Vec<(String, String)> {
    let mut advice = Vec::new();

    for (input, outcome) in inputs.iter().zip(&report.outcomes) {
        if !outcome.is_merged() {
            continue;
        }

        match advisory::input_text(input).await {
            Ok(text) => advice.push((input.name.clone(), advisor.analyze(&text).await)),
            Err(err) => formatter.warning(&format!("No print advice for {}: {err}", input.name)),
        }
    }

    advice
}

fn print_json(value: &impl serde::Serialize) -> Result<(), DuplexCatError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| DuplexCatError::other(format!("Failed to encode JSON: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), DuplexCatError> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(DuplexCatError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet or JSON mode
            if formatter.is_quiet() {
                return Err(DuplexCatError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| DuplexCatError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(DuplexCatError::Cancelled)
            }
        }
    }
}
