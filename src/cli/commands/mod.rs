//! Command implementations for the fleet telemetry CLI
//!
//! Each command is implemented in its own module:
//! - `parse`: parse one file, summarize it and optionally convert it
//! - `benchmark`: repeated timed parses of one file

pub mod benchmark;
pub mod parse;
pub mod shared;

use anyhow::Result;

use crate::cli::args::{Args, Commands};

/// Main command runner
///
/// Dispatches to the subcommand handler. Returns `Ok(false)` when no
/// subcommand was given so the caller can print usage.
pub fn run(args: Args) -> Result<bool> {
    match args.command {
        Some(Commands::Parse(parse_args)) => parse::run_parse(parse_args).map(|_| true),
        Some(Commands::Benchmark(bench_args)) => {
            benchmark::run_benchmark(bench_args).map(|_| true)
        }
        None => Ok(false),
    }
}
