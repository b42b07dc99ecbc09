//! Command-line argument definitions for the fleet telemetry parser
//!
//! This module defines the CLI interface using the clap derive API. Flags
//! override values loaded from an optional JSON configuration file.

use crate::config::{InputFormat, ParserConfig};
use crate::constants::{DEFAULT_BENCHMARK_ITERATIONS, DEFAULT_SAMPLE_SIZE};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// CLI arguments for the fleet telemetry parser
///
/// Parses vehicle telemetry from delimited text, log lines, JSON or the
/// compact binary format, validates it and optionally converts it.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fleet-telemetry",
    version,
    about = "Parse, validate and convert vehicle telemetry files",
    long_about = "A high-throughput parser for vehicle telemetry. Reads delimited text, \
                  pipe-delimited logs, JSON arrays or newline-delimited JSON and a compact \
                  binary format, validates every record, reports throughput statistics and \
                  can re-encode the accepted records as JSON or binary."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a telemetry file, print a summary and optionally convert it
    Parse(ParseArgs),
    /// Parse a file repeatedly and report average throughput
    Benchmark(BenchmarkArgs),
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Telemetry file to parse
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format (csv, log, json, binary)
    ///
    /// Inferred from the file extension when omitted.
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    pub format: Option<InputFormat>,

    /// Write accepted records as a JSON array to this file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Write accepted records in the binary format to this file
    #[arg(short = 'b', long = "binary-output", value_name = "FILE")]
    pub binary_output: Option<PathBuf>,

    /// Enforce field-range validation (default)
    #[arg(long = "validate", conflicts_with = "no_validate")]
    pub validate: bool,

    /// Accept records that fail field-range validation
    #[arg(long = "no-validate")]
    pub no_validate: bool,

    /// Delimited input has no header row
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Field delimiter for delimited input
    #[arg(short = 'd', long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Reject records whose timestamp cannot be parsed
    #[arg(long = "strict-timestamps")]
    pub strict_timestamps: bool,

    /// Print detailed parse statistics
    #[arg(short = 's', long = "stats")]
    pub stats: bool,

    /// Number of sample records to print
    #[arg(long = "sample", value_name = "N", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample: usize,

    /// JSON parser configuration file
    ///
    /// Command-line flags override values from the file.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for results
    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Arguments for the benchmark command
#[derive(Debug, Clone, Parser)]
pub struct BenchmarkArgs {
    /// Telemetry file to parse
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format (csv, log, json, binary)
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    pub format: Option<InputFormat>,

    /// Number of timed iterations
    #[arg(
        short = 'n',
        long = "iterations",
        value_name = "COUNT",
        default_value_t = DEFAULT_BENCHMARK_ITERATIONS
    )]
    pub iterations: usize,

    /// Delimited input has no header row
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Field delimiter for delimited input
    #[arg(short = 'd', long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// JSON parser configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Output format for results
    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Output format options for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Human,
    /// JSON report for scripting
    Json,
    /// Accepted records as delimited text on stdout
    Csv,
}

impl ParseArgs {
    /// Validate the parse command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_input(&self.input)?;

        for output in [&self.json_output, &self.binary_output].into_iter().flatten() {
            if output == &self.input {
                return Err(Error::configuration(format!(
                    "Output file would overwrite the input: {}",
                    output.display()
                )));
            }
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Explicit format, or the one implied by the input extension
    pub fn resolve_format(&self) -> Result<InputFormat> {
        resolve_format(self.format, &self.input)
    }

    /// Build the parser configuration: file values first, then flags
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let mut config = load_config(self.config_file.as_deref())?;

        if self.validate {
            config.validate = true;
        }
        if self.no_validate {
            config.validate = false;
        }
        if self.no_header {
            config.has_header = false;
        }
        config.delimiter = resolve_delimiter(
            self.delimiter,
            &self.input,
            self.config_file.is_some(),
            config.delimiter,
        );
        if self.strict_timestamps {
            config.strict_timestamps = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }

    /// Check if we should show progress spinners
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl BenchmarkArgs {
    /// Validate the benchmark command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_input(&self.input)?;
        if self.iterations == 0 {
            return Err(Error::configuration(
                "Number of iterations must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn resolve_format(&self) -> Result<InputFormat> {
        resolve_format(self.format, &self.input)
    }

    /// Build the parser configuration: file values first, then flags
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let mut config = load_config(self.config_file.as_deref())?;
        if self.no_header {
            config.has_header = false;
        }
        config.delimiter = resolve_delimiter(
            self.delimiter,
            &self.input,
            self.config_file.is_some(),
            config.delimiter,
        );
        config.validate()?;
        Ok(config)
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, false)
    }
}

fn validate_input(input: &Path) -> Result<()> {
    if !input.exists() {
        return Err(Error::configuration(format!(
            "Input file does not exist: {}",
            input.display()
        )));
    }
    if !input.is_file() {
        return Err(Error::configuration(format!(
            "Input path is not a file: {}",
            input.display()
        )));
    }
    Ok(())
}

fn resolve_format(explicit: Option<InputFormat>, input: &Path) -> Result<InputFormat> {
    explicit
        .or_else(|| InputFormat::from_path(input))
        .ok_or_else(|| {
            Error::configuration(format!(
                "Cannot infer the format of {}; pass --format",
                input.display()
            ))
        })
}

/// `-d` wins, then a config file, then the input extension
fn resolve_delimiter(
    explicit: Option<char>,
    input: &Path,
    from_config_file: bool,
    current: char,
) -> char {
    match explicit {
        Some(delimiter) => delimiter,
        None if from_config_file => current,
        None => InputFormat::implied_delimiter(input).unwrap_or(current),
    }
}

fn load_config(config_file: Option<&Path>) -> Result<ParserConfig> {
    match config_file {
        Some(path) => ParserConfig::from_file(path),
        None => Ok(ParserConfig::default()),
    }
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
