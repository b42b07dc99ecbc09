//! Tests for parse orchestration and record policy

use super::*;
use crate::Error;
use crate::app::services::binary_codec::encode_records;
use crate::app::services::telemetry_parser::TelemetryParser;
use crate::config::{InputFormat, ParserConfig};

fn new_parser(config: ParserConfig) -> TelemetryParser {
    TelemetryParser::new(config).unwrap()
}

#[test]
fn test_mixed_csv_counts() {
    let mut parser = new_parser(ParserConfig::default());
    let result = parser
        .parse(create_mixed_csv().as_bytes(), InputFormat::Csv)
        .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.stats.total_lines, 6);
    assert_eq!(result.stats.valid_records, 3);
    assert_eq!(result.stats.invalid_records, 2);
    assert_eq!(result.stats.unparsed_timestamps, 1);
    assert_eq!(
        result.stats.bytes_processed,
        create_mixed_csv().len() as u64
    );
    assert_eq!(result.stats.diagnostics.len(), 2);
    assert!(result.stats.diagnostics[0].starts_with("line 5:"));
    assert!(result.stats.diagnostics[1].contains("latitude"));

    let ids: Vec<&str> = result.records.iter().map(|r| r.vehicle_id.as_str()).collect();
    assert_eq!(ids, vec!["VEH-001", "VEH-002", "VEH-003"]);
}

#[test]
fn test_validation_disabled_passes_out_of_range() {
    let mut parser = new_parser(ParserConfig::default().with_validation(false));
    let result = parser
        .parse(create_mixed_csv().as_bytes(), InputFormat::Csv)
        .unwrap();

    assert_eq!(result.stats.valid_records, 4);
    assert_eq!(result.stats.invalid_records, 1);
    assert_eq!(result.records[3].latitude, 123.0);
}

#[test]
fn test_strict_timestamps_reject_sentinel() {
    let mut parser = new_parser(ParserConfig::default().with_strict_timestamps(true));
    let result = parser
        .parse(create_mixed_csv().as_bytes(), InputFormat::Csv)
        .unwrap();

    assert_eq!(result.stats.valid_records, 2);
    assert_eq!(result.stats.invalid_records, 3);
    assert_eq!(result.stats.unparsed_timestamps, 0);
    assert!(result.stats.diagnostics.iter().any(|d| d.contains("Timestamp")));
}

#[test]
fn test_header_plus_one_row() {
    let input = format!(
        "{}\nVEH-001,2024-01-15T08:00:00,28.5,-81.3,65.5,180,2800,72.5,52341.2,85.2,12.8,P0420\n",
        CSV_HEADER
    );
    let mut parser = new_parser(ParserConfig::default());
    let result = parser.parse(input.as_bytes(), InputFormat::Csv).unwrap();

    assert_eq!(result.stats.valid_records, 1);
    assert_eq!(result.records[0].diagnostic_code, "P0420");
}

#[test]
fn test_repeated_parses_are_idempotent() {
    let mut parser = new_parser(ParserConfig::default());
    let first = parser
        .parse(create_mixed_csv().as_bytes(), InputFormat::Csv)
        .unwrap();
    let second = parser
        .parse(create_mixed_csv().as_bytes(), InputFormat::Csv)
        .unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.stats.valid_records, second.stats.valid_records);
    assert_eq!(first.stats.invalid_records, second.stats.invalid_records);
    assert_eq!(parser.statistics().valid_records, 3);
}

#[test]
fn test_wrong_magic_is_fatal() {
    let mut bytes = encode_records(&[crate::TelemetryRecord::new("VEH-001", 1)]).unwrap();
    bytes[..4].copy_from_slice(b"NOPE");

    let mut parser = new_parser(ParserConfig::default());
    let result = parser.parse(bytes.as_slice(), InputFormat::Binary);

    assert!(matches!(result, Err(Error::Format { .. })));
    assert_eq!(parser.statistics().valid_records, 0);
}

#[test]
fn test_binary_source_is_validated() {
    let mut good = crate::TelemetryRecord::new("VEH-001", 1_705_305_600_000);
    good.fuel_level = 50.0;
    let mut bad = good.clone();
    bad.fuel_level = 101.0;
    let bytes = encode_records(&[good.clone(), bad, good.clone()]).unwrap();

    let mut parser = new_parser(ParserConfig::default());
    let result = parser.parse(bytes.as_slice(), InputFormat::Binary).unwrap();

    assert_eq!(result.records, vec![good.clone(), good]);
    assert_eq!(result.stats.total_lines, 3);
    assert_eq!(result.stats.invalid_records, 1);
    assert_eq!(result.stats.bytes_processed, bytes.len() as u64);
}

#[test]
fn test_log_and_json_sources() {
    let log = "# header comment\n\
               2024-01-15T08:00:00|VEH-001|28.5,-81.3|65.5|2800|72.5|52341.2|85.2|12.8|P0420\n\
               garbage line\n";
    let mut parser = new_parser(ParserConfig::default());
    let result = parser.parse(log.as_bytes(), InputFormat::Log).unwrap();
    assert_eq!(result.stats.valid_records, 1);
    assert_eq!(result.stats.invalid_records, 1);
    assert_eq!(result.stats.total_lines, 3);

    let result = parser.parse(b"[]".as_slice(), InputFormat::Json).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.stats.invalid_records, 0);
}

#[test]
fn test_parse_line_uses_positional_layout() {
    let parser = new_parser(ParserConfig::default());

    let record = parser
        .parse_line("VEH-001,1705305600,28.5,-81.3,65.5,180,2800,72.5,52341.2,85.2,12.8,P0420\r\n")
        .unwrap();
    assert_eq!(record.timestamp, 1_705_305_600_000);
    assert_eq!(record.diagnostic_code, "P0420");

    assert!(parser.parse_line("").is_none());
    assert!(parser.parse_line("VEH-001,1,2,3").is_none());
    assert!(parser.parse_line("VEH-001,1705305600,95,0,0,0,0,0,0,0,0").is_none());
}

#[test]
fn test_file_parsing_and_missing_file() {
    let file = create_temp_file(&create_mixed_csv());
    let mut parser = new_parser(ParserConfig::default());

    let result = parser.parse_file(file.path(), InputFormat::Csv).unwrap();
    assert_eq!(result.len(), 3);

    let missing = parser.parse_file(std::path::Path::new("/nonexistent/fleet.csv"), InputFormat::Csv);
    assert!(matches!(missing, Err(Error::Io { .. })));
}

#[test]
fn test_reset_statistics() {
    let mut parser = new_parser(ParserConfig::default());
    parser
        .parse(create_mixed_csv().as_bytes(), InputFormat::Csv)
        .unwrap();
    assert_eq!(parser.statistics().total_lines, 6);

    parser.reset_statistics();
    assert_eq!(parser.statistics(), &crate::ParseStatistics::default());
}

#[test]
fn test_invalid_config_rejected() {
    let config = ParserConfig::default().with_batch_size(0);
    assert!(matches!(
        TelemetryParser::new(config),
        Err(Error::Configuration { .. })
    ));
}

#[test]
fn test_benchmark_report() {
    let file = create_temp_file(&create_mixed_csv());
    let mut parser = new_parser(ParserConfig::default());

    let report = parser.benchmark(file.path(), InputFormat::Csv, 3).unwrap();
    assert_eq!(report.iterations, 3);
    assert_eq!(report.records, 3);
    assert_eq!(report.iteration_times_ms.len(), 3);
    assert!(report.min_ms <= report.average_ms && report.average_ms <= report.max_ms);

    assert!(matches!(
        parser.benchmark(file.path(), InputFormat::Csv, 0),
        Err(Error::Configuration { .. })
    ));
}
