//! Tests for the delimited-text decoder

use super::*;
use crate::app::services::format_decoders::DelimitedDecoder;
use crate::app::services::format_decoders::delimited::decode_fields;
use crate::app::services::format_decoders::ColumnMapping;

#[test]
fn test_header_and_rows_decode() {
    let config = ParserConfig::default();
    let events = decode_events(create_test_csv().as_bytes(), InputFormat::Csv, &config);

    assert_eq!(events[0], DecodeEvent::Skipped);
    let decoded = records(&events);
    assert_eq!(decoded.len(), 2);

    let first = &decoded[0];
    assert_eq!(first.vehicle_id, "VEH-001");
    assert_eq!(first.timestamp, JAN_15_0800_MS);
    assert_eq!(first.latitude, 28.5);
    assert_eq!(first.longitude, -81.3);
    assert_eq!(first.speed, 65.5);
    assert_eq!(first.heading, 180.0);
    assert_eq!(first.engine_rpm, 2800);
    assert_eq!(first.fuel_level, 72.5);
    assert_eq!(first.odometer_km, 52341.2);
    assert_eq!(first.engine_temp, 85.2);
    assert_eq!(first.battery_volt, 12.8);
    assert_eq!(first.diagnostic_code, "P0420");

    let second = &decoded[1];
    assert_eq!(second.timestamp, JAN_15_0800_MS);
    assert!(!second.has_diagnostic());
}

#[test]
fn test_short_line_is_rejected() {
    let input = format!("{}\nVEH-001,2024-01-15T08:00:00,28.5,-81.3,65.5\n", CSV_HEADER);
    let events = decode_events(input.as_bytes(), InputFormat::Csv, &ParserConfig::default());

    assert!(records(&events).is_empty());
    assert_eq!(rejected_lines(&events), vec![2]);
}

#[test]
fn test_eleven_fields_without_diagnostic_column() {
    let config = ParserConfig::default().with_header(false);
    let input = "VEH-003,1705305600000,10,20,30,40,1000,50,60,70,12\n";
    let events = decode_events(input.as_bytes(), InputFormat::Csv, &config);

    let decoded = records(&events);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].timestamp, JAN_15_0800_MS);
    assert_eq!(decoded[0].battery_volt, 12.0);
    assert_eq!(decoded[0].diagnostic_code, "");
}

#[test]
fn test_header_reorders_columns() {
    let input = "timestamp,vehicle_id,latitude,longitude,speed,heading,engine_rpm,fuel_level,odometer_km,engine_temp,battery_volt,diagnostic_code\n\
                 1705305600,VEH-009,1,2,3,4,5,6,7,8,9,C1\n";
    let events = decode_events(input.as_bytes(), InputFormat::Csv, &ParserConfig::default());

    let decoded = records(&events);
    assert_eq!(decoded[0].vehicle_id, "VEH-009");
    assert_eq!(decoded[0].timestamp, JAN_15_0800_MS);
    assert_eq!(decoded[0].diagnostic_code, "C1");
}

#[test]
fn test_blank_lines_and_crlf() {
    let input = format!(
        "\r\n{}\r\n\r\nVEH-001,1705305600,1,2,3,4,5,6,7,8,9,P1  \r\n   \n",
        CSV_HEADER
    );
    let mut decoder = DelimitedDecoder::new(input.as_bytes(), ',', true);

    let mut decoded = Vec::new();
    let mut skipped = 0;
    while let Some(event) = decoder.next_event().unwrap() {
        match event {
            DecodeEvent::Record { line, record } => decoded.push((line, record)),
            DecodeEvent::Skipped => skipped += 1,
            DecodeEvent::Rejected { line, reason } => panic!("line {} rejected: {}", line, reason),
        }
    }

    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].0, 4);
    assert_eq!(decoded[0].1.diagnostic_code, "P1");
    // Leading blank, header, blank, trailing whitespace line
    assert_eq!(skipped, 4);
    assert_eq!(decoder.lines_read(), 5);
    assert_eq!(decoder.bytes_read(), input.len() as u64);
    assert_eq!(decoder.mapping().recognized_columns(), 12);
}

#[test]
fn test_malformed_numbers_become_zero() {
    let mapping = ColumnMapping::positional();
    let record = decode_fields("VEH-001,1705305600,12abc,,1e5,x,2.5x,50,0,0,0,", ',', &mapping).unwrap();

    assert_eq!(record.latitude, 0.0);
    assert_eq!(record.longitude, 0.0);
    assert_eq!(record.speed, 0.0);
    assert_eq!(record.heading, 0.0);
    assert_eq!(record.engine_rpm, 0);
    assert_eq!(record.fuel_level, 50.0);
}

#[test]
fn test_decimal_rpm_is_truncated() {
    let config = ParserConfig::default().with_header(false);
    let input = "VEH-001,1705305600,28.5,-81.3,65.5,180,2800.0,72.5,52341.2,85.2,12.8,\n";
    let events = decode_events(input.as_bytes(), InputFormat::Csv, &config);

    let decoded = records(&events);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].engine_rpm, 2800);
    assert!(rejected_lines(&events).is_empty());
}

#[test]
fn test_unparseable_timestamp_is_sentinel() {
    let mapping = ColumnMapping::positional();
    let record = decode_fields("VEH-001,yesterday,1,2,3,4,5,6,7,8,9,", ',', &mapping).unwrap();

    assert_eq!(record.timestamp, 0);
    assert!(!record.has_timestamp());
}

#[test]
fn test_custom_delimiter() {
    let config = ParserConfig::default().with_header(false).with_delimiter(';');
    let input = "VEH-001;1705305600;28.5;-81.3;65.5;180;2800;72.5;52341.2;85.2;12.8;P0420\n";
    let events = decode_events(input.as_bytes(), InputFormat::Csv, &config);

    let decoded = records(&events);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].longitude, -81.3);
}

#[test]
fn test_invalid_utf8_rejects_line() {
    let mut input = b"VEH-001,1705305600,1,2,3,4,5,6,7,8,9,\n".to_vec();
    input.extend_from_slice(b"VEH-\xFF\xFE,1705305600,1,2,3,4,5,6,7,8,9,\n");
    let config = ParserConfig::default().with_header(false);
    let events = decode_events(&input, InputFormat::Csv, &config);

    assert_eq!(records(&events).len(), 1);
    assert_eq!(rejected_lines(&events), vec![2]);
}
