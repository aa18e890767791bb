//! CLI argument parsing for duplexcat.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled by `build.rs` to render the man page, so it only
//! depends on the library crate and `clap`.

use clap::Parser;
use secrecy::SecretString;
use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use duplexcat::advisory::{AdvisoryConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use duplexcat::config::{CompressionLevel, Config, DEFAULT_OUTPUT, OverwriteMode};
use duplexcat::error::{DuplexCatError, Result};
use duplexcat::io::read_input_list;
use duplexcat::utils::collect_paths_for_patterns;

/// Merge PDF files into one print job for double-sided printing.
///
/// Every document with an odd number of pages is followed by a blank page,
/// so each document starts on the front of a new sheet when the output is
/// printed duplex.
#[derive(Parser, Debug)]
#[command(name = "duplexcat")]
#[command(version)]
#[command(
    about = "Merge PDF files for duplex printing, padding odd-length documents with a blank page",
    long_about = None
)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to merge (in order)
    ///
    /// Specify multiple files or use glob patterns.
    /// Files are merged in the order provided.
    ///
    /// Examples:
    ///   duplexcat cover.pdf report.pdf appendix.pdf
    ///   duplexcat 'handouts/*.pdf' -o handouts.pdf
    #[arg(value_name = "FILE", required_unless_present = "input_list")]
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path
    ///
    /// The merged PDF will be written to this location.
    /// Use --force to overwrite existing files without confirmation.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Dry run - inspect inputs and predict the output without writing it
    ///
    /// Parses every input, then shows its page count, whether a blank
    /// page would follow it, and the page count of the merged output.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show detailed information about each PDF
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    ///
    /// If the output file already exists, exit with an error
    /// instead of prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Compression level for output PDF
    ///
    /// - none: Streams are written as they were read
    /// - standard: Compress uncompressed streams (default)
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard"])]
    pub compression: String,

    /// Read input file list from a file (one path per line)
    ///
    /// Lines starting with '#' and blank lines are ignored.
    /// Paths from the list are merged after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Fail without writing output if any document cannot be merged
    ///
    /// By default unreadable documents are skipped with a warning.
    #[arg(long)]
    pub strict: bool,

    /// Print the merge report or dry-run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Request print advice for each input after merging
    ///
    /// Sends the text of each document to a hosted language model.
    #[arg(long)]
    pub advise: bool,

    /// API key for the print advice service
    #[arg(
        long,
        value_name = "KEY",
        env = "DUPLEXCAT_API_KEY",
        hide_env_values = true,
        value_parser = parse_secret
    )]
    pub api_key: Option<SecretString>,

    /// Model used for print advice
    #[arg(long, value_name = "NAME", default_value = DEFAULT_MODEL)]
    pub advisory_model: String,

    /// Base URL of the print advice service
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    pub advisory_endpoint: String,

    /// Timeout for each print advice request, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub advisory_timeout: u64,
}

fn parse_secret(value: &str) -> std::result::Result<SecretString, Infallible> {
    Ok(SecretString::from(value))
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is invalid
    /// - Configuration validation fails
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let advisory = self.advise.then(|| AdvisoryConfig {
            api_key: self.api_key.clone(),
            model: self.advisory_model.clone(),
            endpoint: self.advisory_endpoint.clone(),
            timeout: Duration::from_secs(self.advisory_timeout),
        });

        let config = Config {
            inputs: self.inputs.clone(),
            output: self.output.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            compression,
            strict: self.strict,
            json: self.json,
            advisory,
        };

        config.validate().map_err(|e| {
            DuplexCatError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(DuplexCatError::invalid_config("No input files specified"));
        }

        CompressionLevel::from_str(&self.compression)?;

        if self.advise && self.advisory_timeout == 0 {
            return Err(DuplexCatError::invalid_config(
                "Advisory timeout must be at least 1 second",
            ));
        }

        Ok(())
    }

    /// Get all input paths, expanding globs and reading the input list.
    ///
    /// Direct inputs come first, in argument order, followed by the paths
    /// from `--input-list`.
    ///
    /// # Errors
    ///
    /// Returns an error if a glob pattern is invalid, the input list file
    /// cannot be read, or no paths remain.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let patterns = self.inputs.iter().map(|p| p.to_string_lossy().into_owned());
        let mut all_inputs = collect_paths_for_patterns(patterns)?;

        if let Some(list) = &self.input_list {
            all_inputs.extend(read_input_list(list).await?);
        }

        if all_inputs.is_empty() {
            return Err(DuplexCatError::NoFilesToMerge);
        }

        Ok(all_inputs)
    }
}
