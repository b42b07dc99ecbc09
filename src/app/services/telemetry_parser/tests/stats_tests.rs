//! Tests for parse statistics

use std::time::Duration;

use super::super::stats::ParseStatistics;

#[test]
fn test_success_rate() {
    let stats = ParseStatistics {
        valid_records: 95,
        invalid_records: 5,
        ..Default::default()
    };
    assert_eq!(stats.success_rate(), 95.0);
    assert!(stats.is_successful());

    let poor_stats = ParseStatistics {
        valid_records: 80,
        invalid_records: 20,
        ..Default::default()
    };
    assert_eq!(poor_stats.success_rate(), 80.0);
    assert!(!poor_stats.is_successful());
}

#[test]
fn test_empty_statistics() {
    let stats = ParseStatistics::new();

    assert_eq!(stats.total_lines, 0);
    assert_eq!(stats.success_rate(), 0.0);
    assert!(!stats.is_successful());
    assert!(stats.diagnostics.is_empty());
}

#[test]
fn test_finalize_throughput() {
    let mut stats = ParseStatistics {
        valid_records: 500,
        bytes_processed: 2 * 1024 * 1024,
        ..Default::default()
    };
    stats.finalize(Duration::from_millis(250));

    assert_eq!(stats.parse_time_ms, 250.0);
    assert_eq!(stats.records_per_second, 2000.0);
    assert_eq!(stats.megabytes_per_second(), 8.0);
}

#[test]
fn test_finalize_zero_elapsed() {
    let mut stats = ParseStatistics {
        valid_records: 10,
        ..Default::default()
    };
    stats.finalize(Duration::ZERO);

    assert_eq!(stats.parse_time_ms, 0.0);
    assert_eq!(stats.records_per_second, 0.0);
    assert_eq!(stats.megabytes_per_second(), 0.0);
}

#[test]
fn test_diagnostics_are_bounded() {
    let mut stats = ParseStatistics::new();
    for line in 1..=250 {
        stats.record_rejection(line, "too few fields");
    }

    assert_eq!(stats.invalid_records, 250);
    assert_eq!(stats.diagnostics.len(), crate::constants::MAX_DIAGNOSTICS);
    assert_eq!(stats.diagnostics[0], "line 1: too few fields");
}

#[test]
fn test_display_and_serialization() {
    let stats = ParseStatistics {
        total_lines: 6,
        valid_records: 4,
        invalid_records: 1,
        ..Default::default()
    };

    let rendered = stats.to_string();
    assert!(rendered.starts_with("Parse Statistics:"));
    assert!(rendered.contains("Valid records:    4"));

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total_lines"], 6);
    assert!(json.get("diagnostics").is_none());
}
