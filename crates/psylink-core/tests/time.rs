use psylink_core::time::{from_excel_serial, parse_timestamp};

#[test]
fn accepts_rfc3339() {
    let ts = parse_timestamp("2024-03-01T09:30:00Z").unwrap();
    assert_eq!(ts.to_string(), "2024-03-01T09:30:00Z");
}

#[test]
fn civil_values_are_read_as_utc() {
    let spaced = parse_timestamp("2024-03-01 09:30:00").unwrap();
    assert_eq!(spaced.to_string(), "2024-03-01T09:30:00Z");

    let date_only = parse_timestamp("2024-03-01").unwrap();
    assert_eq!(date_only.to_string(), "2024-03-01T00:00:00Z");
}

#[test]
fn garbage_is_rejected_with_the_value_in_the_message() {
    let err = parse_timestamp("yesterday").unwrap_err();
    assert!(err.to_string().contains("yesterday"));
}

#[test]
fn excel_serial_dates_convert() {
    // 45352 is 2024-03-01 in the 1900 date system.
    let ts = from_excel_serial(45352.5).unwrap();
    assert_eq!(ts.to_string(), "2024-03-01T12:00:00Z");
    assert!(from_excel_serial(-1.0).is_err());
}
