//! Parse command implementation
//!
//! Streams a telemetry file through the parser, fanning accepted records out
//! to the requested outputs (JSON array file, binary file, delimited text on
//! stdout) while keeping a small sample for the summary.

use anyhow::{Context, Result};
use colored::*;
use indicatif::HumanDuration;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, StdoutLock, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::shared::{create_spinner, format_count, format_size, setup_logging};
use crate::cli::args::{OutputFormat, ParseArgs};
use crate::config::InputFormat;
use crate::constants::FIELD_NAMES;
use crate::{BinaryWriter, ParseStatistics, TelemetryParser, TelemetryRecord};

/// Records between spinner message updates
const PROGRESS_INTERVAL: usize = 10_000;

/// Diagnostics printed with `--stats`
const DIAGNOSTICS_SHOWN: usize = 10;

/// An output file written by the command
#[derive(Debug, Clone, Serialize)]
pub struct OutputFile {
    pub path: PathBuf,
    pub kind: &'static str,
    pub bytes: u64,
}

/// Machine-readable report for `--output-format json`
#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    input: &'a Path,
    format: InputFormat,
    stats: &'a ParseStatistics,
    success_rate: f64,
    outputs: &'a [OutputFile],
    sample: &'a [TelemetryRecord],
}

/// Run the parse command
pub fn run_parse(args: ParseArgs) -> Result<ParseStatistics> {
    setup_logging(args.get_log_level(), args.quiet);
    args.validate()?;

    let format = args.resolve_format()?;
    let config = args.parser_config()?;
    info!(
        "Parsing {} as {} (validate={}, header={}, delimiter={:?})",
        args.input.display(),
        format,
        config.validate,
        config.has_header,
        config.delimiter
    );

    let mut parser = TelemetryParser::new(config)?;
    let mut sink = RecordSink::open(&args)?;
    let spinner = args
        .show_progress()
        .then(|| create_spinner(&format!("Parsing {}...", args.input.display())));

    let started = Instant::now();
    let outcome = parser.parse_file_streaming(&args.input, format, |record| {
        sink.accept(record);
        if let Some(spinner) = &spinner {
            if sink.accepted % PROGRESS_INTERVAL == 0 {
                spinner.set_message(format!("Parsed {} records", format_count(sink.accepted)));
            }
        }
    });
    let elapsed = started.elapsed();

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let stats = match outcome {
        Ok(stats) => stats,
        Err(e) => {
            sink.discard();
            return Err(
                anyhow::Error::new(e).context(format!("Failed to parse {}", args.input.display()))
            );
        }
    };
    let (sample, outputs) = sink.finish()?;

    match args.output_format {
        OutputFormat::Human => {
            print_human_summary(&args, format, &stats, &outputs, &sample, elapsed);
        }
        OutputFormat::Json => {
            let report = ParseReport {
                input: &args.input,
                format,
                stats: &stats,
                success_rate: stats.success_rate(),
                outputs: &outputs,
                sample: &sample,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to encode parse report")?
            );
        }
        OutputFormat::Csv => {
            // Records already went to stdout
            if args.stats {
                eprintln!("{}", stats);
            }
        }
    }

    if !stats.is_successful() && stats.records_examined() > 0 {
        warn!(
            "Only {:.1}% of records were accepted from {}",
            stats.success_rate(),
            args.input.display()
        );
    }

    Ok(stats)
}

/// Fan-out of accepted records to every requested output
struct RecordSink {
    accepted: usize,
    sample_size: usize,
    sample: Vec<TelemetryRecord>,
    json: Option<JsonArrayWriter>,
    binary: Option<(PathBuf, BinaryWriter<BufWriter<File>>)>,
    stdout: Option<BufWriter<StdoutLock<'static>>>,
    error: Option<anyhow::Error>,
}

impl RecordSink {
    fn open(args: &ParseArgs) -> Result<Self> {
        let json = args
            .json_output
            .as_deref()
            .map(JsonArrayWriter::create)
            .transpose()?;

        let binary = match &args.binary_output {
            Some(path) => Some((path.clone(), BinaryWriter::create(path)?)),
            None => None,
        };

        let stdout = match args.output_format {
            OutputFormat::Csv => {
                let mut out = BufWriter::new(std::io::stdout().lock());
                writeln!(out, "{}", FIELD_NAMES.join(",")).context("Failed to write to stdout")?;
                Some(out)
            }
            _ => None,
        };

        Ok(Self {
            accepted: 0,
            sample_size: args.sample,
            sample: Vec::with_capacity(args.sample),
            json,
            binary,
            stdout,
            error: None,
        })
    }

    fn accept(&mut self, record: TelemetryRecord) {
        self.accepted += 1;

        // Keep counting after a write failure; the error is reported at the end
        if self.error.is_none() {
            if let Err(e) = self.write(&record) {
                self.error = Some(e);
            }
        }

        if self.sample.len() < self.sample_size {
            self.sample.push(record);
        }
    }

    fn write(&mut self, record: &TelemetryRecord) -> Result<()> {
        if let Some(json) = &mut self.json {
            json.write(record)?;
        }
        if let Some((path, binary)) = &mut self.binary {
            binary
                .write(record)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        if let Some(out) = &mut self.stdout {
            writeln!(out, "{}", record.to_csv()).context("Failed to write to stdout")?;
        }
        Ok(())
    }

    /// Close and delete every output file after a failed parse
    fn discard(self) {
        let json = self.json.map(|json| json.path);
        let binary = self.binary.map(|(path, _)| path);

        for path in [json, binary].into_iter().flatten() {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed partial output {}", path.display()),
                Err(e) => warn!("Failed to remove partial output {}: {}", path.display(), e),
            }
        }
    }

    fn finish(self) -> Result<(Vec<TelemetryRecord>, Vec<OutputFile>)> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut outputs = Vec::new();
        if let Some(json) = self.json {
            outputs.push(json.finish()?);
        }
        if let Some((path, binary)) = self.binary {
            let records = binary.records_written();
            binary
                .into_inner()
                .with_context(|| format!("Failed to finish {}", path.display()))?;
            info!("Wrote {} binary records to {}", records, path.display());
            outputs.push(output_file(path, "binary")?);
        }
        if let Some(mut out) = self.stdout {
            out.flush().context("Failed to flush stdout")?;
        }

        Ok((self.sample, outputs))
    }
}

/// Streams records into a JSON array file without holding them in memory
struct JsonArrayWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl JsonArrayWriter {
    fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON output {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    fn write(&mut self, record: &TelemetryRecord) -> Result<()> {
        let separator = if self.written == 0 { "[\n  " } else { ",\n  " };
        let json = record.to_json()?;
        self.writer
            .write_all(separator.as_bytes())
            .and_then(|_| self.writer.write_all(json.as_bytes()))
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.written += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<OutputFile> {
        let closing = if self.written == 0 { "[]\n" } else { "\n]\n" };
        self.writer
            .write_all(closing.as_bytes())
            .and_then(|_| self.writer.flush())
            .with_context(|| format!("Failed to finish {}", self.path.display()))?;
        info!("Wrote {} JSON records to {}", self.written, self.path.display());
        output_file(self.path, "json")
    }
}

fn output_file(path: PathBuf, kind: &'static str) -> Result<OutputFile> {
    let bytes = std::fs::metadata(&path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    Ok(OutputFile { path, kind, bytes })
}

fn print_human_summary(
    args: &ParseArgs,
    format: InputFormat,
    stats: &ParseStatistics,
    outputs: &[OutputFile],
    sample: &[TelemetryRecord],
    elapsed: Duration,
) {
    println!(
        "\n{} {} ({})",
        "Parsed".bright_green().bold(),
        args.input.display().to_string().bright_white().bold(),
        format.to_string().bright_cyan()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Parse Summary:");
    println!(
        "   • Records accepted: {}",
        format_count(stats.valid_records).bright_green()
    );
    if stats.invalid_records > 0 {
        println!(
            "   • Records rejected: {}",
            format_count(stats.invalid_records).bright_red()
        );
    } else {
        println!("   • Records rejected: 0");
    }
    if stats.unparsed_timestamps > 0 {
        println!(
            "   • Unparsed timestamps: {}",
            format_count(stats.unparsed_timestamps).bright_yellow()
        );
    }
    println!("   • Success rate: {:.1}%", stats.success_rate());
    println!(
        "   • Input size: {}",
        format_size(stats.bytes_processed)
    );
    println!(
        "   • Throughput: {} records/s ({:.2} MB/s)",
        format_count(stats.records_per_second as usize),
        stats.megabytes_per_second()
    );
    println!("   • Processing time: {}", HumanDuration(elapsed));

    if !outputs.is_empty() {
        println!("\n📁 Output Files:");
        for output in outputs {
            println!(
                "   • {} ({}): {}",
                output.path.display(),
                output.kind,
                format_size(output.bytes)
            );
        }
    }

    if !sample.is_empty() {
        println!(
            "\n🔎 First {} records:",
            sample.len().to_string().bright_white().bold()
        );
        for record in sample {
            let line = record.to_csv();
            if record.has_diagnostic() {
                println!("   {}", line.bright_yellow());
            } else {
                println!("   {}", line);
            }
        }
    }

    if args.stats {
        println!("\n{}", stats);
        if !stats.diagnostics.is_empty() {
            println!("\n⚠️  Rejected lines:");
            for diagnostic in stats.diagnostics.iter().take(DIAGNOSTICS_SHOWN) {
                println!("   • {}", diagnostic);
            }
            if stats.invalid_records > DIAGNOSTICS_SHOWN {
                println!(
                    "   … and {} more",
                    stats.invalid_records - DIAGNOSTICS_SHOWN
                );
            }
        }
    }
    println!();
}
