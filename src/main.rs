use clap::Parser;
use fleet_telemetry::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    match commands::run(args) {
        Ok(true) => process::exit(0),
        Ok(false) => {
            // No subcommand was provided
            show_help_and_commands();
            process::exit(0);
        }
        Err(error) => {
            // Print the full context chain to stderr
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Fleet Telemetry - Multi-format Vehicle Telemetry Parser");
    println!("=======================================================");
    println!();
    println!("Parse vehicle telemetry from delimited text, log lines, JSON or the");
    println!("compact binary format, validate it and convert it.");
    println!();
    println!("USAGE:");
    println!("    fleet-telemetry <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    parse       Parse a telemetry file, print a summary and optionally convert it");
    println!("    benchmark   Parse a file repeatedly and report average throughput");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Parse a CSV export and show statistics:");
    println!("    fleet-telemetry parse telemetry.csv --stats");
    println!();
    println!("    # Convert a log file to binary and JSON:");
    println!("    fleet-telemetry parse fleet.log -b fleet.fbin -o fleet.json");
    println!();
    println!("    # Benchmark the binary reader:");
    println!("    fleet-telemetry benchmark fleet.fbin -n 10");
    println!();
    println!("For detailed help on any command, use:");
    println!("    fleet-telemetry <COMMAND> --help");
}
