//! Tests for MacAddr and HostRecord
//!
//! These tests verify:
//! - MAC address parsing (separators, case, malformed input)
//! - Canonical MAC formatting
//! - Interface normalisation on HostRecord
//! - Key field naming used in duplicate errors

use std::net::Ipv4Addr;

use dhcphosts::record::{HostRecord, KeyField, MacAddr};
use dhcphosts::HostError;

// =============================================================================
// MacAddr Parsing Tests
// =============================================================================

#[test]
fn test_parse_colon_separated() {
    let mac: MacAddr = "0a:50:e2:e9:02:22".parse().unwrap();
    assert_eq!(mac.octets(), [0x0a, 0x50, 0xe2, 0xe9, 0x02, 0x22]);
}

#[test]
fn test_parse_is_case_insensitive() {
    let upper: MacAddr = "0A:50:E2:E9:02:22".parse().unwrap();
    let lower: MacAddr = "0a:50:e2:e9:02:22".parse().unwrap();
    let mixed: MacAddr = "0a:50:E2:e9:02:22".parse().unwrap();

    assert_eq!(upper, lower);
    assert_eq!(upper, mixed);
}

#[test]
fn test_parse_dash_separated() {
    let mac: MacAddr = "aa-bb-cc-dd-ee-ff".parse().unwrap();
    assert_eq!(mac, MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]));
}

#[test]
fn test_parse_rejects_mixed_separators() {
    assert!("aa:bb-cc:dd:ee:ff".parse::<MacAddr>().is_err());
}

#[test]
fn test_parse_rejects_wrong_lengths() {
    assert!("".parse::<MacAddr>().is_err());
    assert!("aa:bb:cc:dd:ee".parse::<MacAddr>().is_err());
    assert!("aa:bb:cc:dd:ee:ff:00".parse::<MacAddr>().is_err());
    assert!("a:bb:cc:dd:ee:fff".parse::<MacAddr>().is_err());
}

#[test]
fn test_parse_rejects_non_hex() {
    assert!("gg:bb:cc:dd:ee:ff".parse::<MacAddr>().is_err());
    assert!("+a:bb:cc:dd:ee:ff".parse::<MacAddr>().is_err());
    assert!("aa.bb.cc.dd.ee.ff".parse::<MacAddr>().is_err());
}

#[test]
fn test_parse_error_is_invalid_address() {
    let err = "not-a-mac".parse::<MacAddr>().unwrap_err();
    assert!(matches!(err, HostError::InvalidAddress(_)));
    assert!(err.is_client_error());
}

// =============================================================================
// MacAddr Formatting Tests
// =============================================================================

#[test]
fn test_display_is_lowercase_colon_separated() {
    let mac: MacAddr = "0A-50-E2-E9-02-22".parse().unwrap();
    assert_eq!(mac.to_string(), "0a:50:e2:e9:02:22");
}

#[test]
fn test_display_pads_octets() {
    let mac = MacAddr::new([0, 1, 2, 3, 4, 5]);
    assert_eq!(mac.to_string(), "00:01:02:03:04:05");
}

// =============================================================================
// HostRecord Tests
// =============================================================================

fn sample_record() -> HostRecord {
    HostRecord::new(
        "aa:aa:aa:aa:aa:aa".parse().unwrap(),
        Ipv4Addr::new(10, 0, 0, 1),
        "printer",
    )
}

#[test]
fn test_new_record_has_no_interface() {
    assert_eq!(sample_record().interface_name, None);
}

#[test]
fn test_with_interface_sets_name() {
    let record = sample_record().with_interface("eth1");
    assert_eq!(record.interface_name.as_deref(), Some("eth1"));
}

#[test]
fn test_with_empty_interface_clears_scope() {
    let record = sample_record().with_interface("eth1").with_interface("");
    assert_eq!(record.interface_name, None);
}

#[test]
fn test_record_key_values() {
    let record = sample_record();
    assert_eq!(record.key(KeyField::Mac), "aa:aa:aa:aa:aa:aa");
    assert_eq!(record.key(KeyField::Ip), "10.0.0.1");
}

#[test]
fn test_key_field_display() {
    assert_eq!(KeyField::Mac.to_string(), "MAC");
    assert_eq!(KeyField::Ip.to_string(), "IP");
}

#[test]
fn test_duplicate_key_message() {
    let err = HostError::DuplicateKey {
        field: KeyField::Ip,
        value: "10.0.0.1".to_string(),
    };
    assert_eq!(err.to_string(), "Duplicated IP address: 10.0.0.1");
    assert!(err.is_client_error());
}

// =============================================================================
// HostRecord Validation Tests
// =============================================================================

fn assert_invalid(record: &HostRecord) {
    match record.validate() {
        Err(e @ HostError::InvalidRecord(_)) => assert!(e.is_client_error()),
        other => panic!("Expected InvalidRecord for {:?}, got {:?}", record, other),
    }
}

#[test]
fn test_validate_accepts_plain_records() {
    sample_record().validate().unwrap();
    sample_record().with_interface("eth0.10").validate().unwrap();

    let mut record = sample_record();
    record.host_name = "nas-01.lan".to_string();
    record.validate().unwrap();
}

#[test]
fn test_validate_rejects_bad_host_names() {
    for name in ["", "a,b,c", "two words", " padded", "padded ", "line\nbreak", "tab\there", "bell\u{7}"] {
        let mut record = sample_record();
        record.host_name = name.to_string();
        assert_invalid(&record);
    }
}

#[test]
fn test_validate_rejects_bad_interface_names() {
    for interface in ["", "eth0,eth1", "eth 0", "eth0\n", "\r"] {
        let mut record = sample_record();
        record.interface_name = Some(interface.to_string());
        assert_invalid(&record);
    }
}

#[test]
fn test_invalid_record_message_names_field() {
    let mut record = sample_record();
    record.host_name = "a,b".to_string();

    let message = record.validate().unwrap_err().to_string();
    assert!(message.starts_with("Invalid record: host name"), "message: {}", message);
}
