//! Tests for encoding and decoding record streams

use super::*;
use crate::Error;
use crate::app::services::binary_codec::{
    BinaryReader, BinaryWriter, decode_records, encode_records, truncate_utf8,
};
use crate::constants::{BINARY_FIXED_FIELDS_SIZE, BINARY_HEADER_SIZE};

#[test]
fn test_round_trip_is_bit_exact() {
    let mut odd = create_test_record();
    odd.vehicle_id = "車両-42".to_string();
    odd.latitude = -0.0;
    odd.speed = f64::MIN_POSITIVE;
    odd.engine_temp = f64::NAN;
    odd.engine_rpm = i32::MIN;
    odd.timestamp = i64::MAX;
    odd.diagnostic_code.clear();

    let records = vec![create_test_record(), odd];
    let decoded = decode_records(&encode_records(&records).unwrap()).unwrap();

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0], records[0]);
    assert_eq!(decoded[1].vehicle_id, records[1].vehicle_id);
    assert_eq!(decoded[1].latitude.to_bits(), (-0.0f64).to_bits());
    assert_eq!(decoded[1].speed, f64::MIN_POSITIVE);
    assert!(decoded[1].engine_temp.is_nan());
    assert_eq!(decoded[1].engine_rpm, i32::MIN);
    assert_eq!(decoded[1].timestamp, i64::MAX);
    assert_eq!(decoded[1].diagnostic_code, "");
}

#[test]
fn test_encoded_size() {
    let record = create_test_record();
    let bytes = encode_records(std::slice::from_ref(&record)).unwrap();

    let expected = BINARY_HEADER_SIZE
        + 1
        + record.vehicle_id.len()
        + BINARY_FIXED_FIELDS_SIZE
        + 1
        + record.diagnostic_code.len();
    assert_eq!(bytes.len(), expected);
}

#[test]
fn test_empty_stream() {
    let bytes = encode_records(&[]).unwrap();
    assert_eq!(bytes.len(), BINARY_HEADER_SIZE);
    assert!(decode_records(&bytes).unwrap().is_empty());
}

#[test]
fn test_writer_counts_and_flushes() {
    let mut writer = BinaryWriter::new(Vec::new()).unwrap();
    writer.write(&create_test_record()).unwrap();
    writer
        .write_batch(&[create_test_record(), create_test_record()])
        .unwrap();
    assert_eq!(writer.records_written(), 3);

    let bytes = writer.into_inner().unwrap();
    let mut reader = BinaryReader::new(bytes.as_slice()).unwrap();
    let mut count = 0;
    while reader.next_record().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 3);
    assert_eq!(reader.records_seen(), 3);
    assert_eq!(reader.bytes_read(), bytes.len() as u64);
}

#[test]
fn test_long_strings_truncate_on_char_boundary() {
    let ascii = "A".repeat(300);
    assert_eq!(truncate_utf8(&ascii).len(), 255);

    // 'é' is two bytes: 127 of them end at byte 254, one short of the limit
    let accented = "é".repeat(200);
    let truncated = truncate_utf8(&accented);
    assert_eq!(truncated.len(), 254);
    assert_eq!(truncated.chars().count(), 127);

    let mut record = create_test_record();
    record.vehicle_id = accented.clone();
    let decoded = decode_records(&encode_records(&[record]).unwrap()).unwrap();
    assert_eq!(decoded[0].vehicle_id, truncated);
}

#[test]
fn test_truncated_record_ends_stream() {
    let bytes = encode_records(&[create_test_record(), create_test_record()]).unwrap();
    let mut reader = BinaryReader::new(&bytes[..bytes.len() - 10]).unwrap();

    assert!(reader.next_record().unwrap().is_some());
    match reader.next_record() {
        Err(Error::RecordDecode { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected truncated record error, got {:?}", other),
    }
    assert!(reader.next_record().unwrap().is_none());
}

#[test]
fn test_invalid_utf8_rejects_single_record() {
    let mut bytes = encode_records(&[create_test_record(), create_test_record()]).unwrap();
    // First byte of the first vehicle_id
    bytes[BINARY_HEADER_SIZE + 1] = 0xFF;

    let mut reader = BinaryReader::new(bytes.as_slice()).unwrap();
    assert!(matches!(
        reader.next_record(),
        Err(Error::RecordDecode { line: 1, .. })
    ));
    assert_eq!(reader.next_record().unwrap(), Some(create_test_record()));
    assert!(reader.next_record().unwrap().is_none());
}
