//! Benchmark command implementation

use anyhow::{Context, Result};
use colored::*;
use tracing::info;

use super::shared::{create_spinner, format_count, setup_logging};
use crate::TelemetryParser;
use crate::app::services::telemetry_parser::BenchmarkReport;
use crate::cli::args::{BenchmarkArgs, OutputFormat};

/// Run the benchmark command
pub fn run_benchmark(args: BenchmarkArgs) -> Result<BenchmarkReport> {
    setup_logging(args.get_log_level(), false);
    args.validate()?;

    let format = args.resolve_format()?;
    let mut parser = TelemetryParser::new(args.parser_config()?)?;
    info!(
        "Benchmarking {} ({}) over {} iterations",
        args.input.display(),
        format,
        args.iterations
    );

    let spinner = (args.output_format == OutputFormat::Human).then(|| {
        create_spinner(&format!(
            "Benchmarking {} ({} iterations)...",
            args.input.display(),
            args.iterations
        ))
    });
    let outcome = parser.benchmark(&args.input, format, args.iterations);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = outcome.with_context(|| format!("Benchmark of {} failed", args.input.display()))?;

    match args.output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode benchmark report")?
        ),
        OutputFormat::Csv => {
            println!("iteration,parse_time_ms");
            for (i, time) in report.iteration_times_ms.iter().enumerate() {
                println!("{},{:.3}", i + 1, time);
            }
        }
        OutputFormat::Human => {
            println!(
                "\n{} {} ({})",
                "Benchmark:".bright_green().bold(),
                args.input.display().to_string().bright_white().bold(),
                format.to_string().bright_cyan()
            );
            println!("Iterations: {}\n", report.iterations);
            for (i, time) in report.iteration_times_ms.iter().enumerate() {
                println!("  Iteration {}: {:.2} ms", i + 1, time);
            }
            println!("\nResults:");
            println!("  Records:          {}", format_count(report.records));
            println!("  Average time:     {:.2} ms", report.average_ms);
            println!(
                "  Fastest/slowest:  {:.2} ms / {:.2} ms",
                report.min_ms, report.max_ms
            );
            println!(
                "  Records/second:   {}",
                format_count(report.records_per_second as usize)
                    .bright_green()
                    .bold()
            );
            println!();
        }
    }

    Ok(report)
}
