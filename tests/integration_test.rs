//! Integration tests exercising the full facade: TNC2/AX.25 round-trips,
//! cross-form equivalence, and representative on-air scenarios.

use aprs_codec::{dispatch, APRSFrame, Callsign, InformationField, PositionReport};

fn test_cases() -> Vec<String> {
    const DATA: &str = include_str!("fixtures/tnc2_round_trip.csv");
    DATA.lines()
        .filter(|line| !line.trim().is_empty() && !line.trim().starts_with('#'))
        .map(|line| line.to_string())
        .collect()
}

#[test]
fn tnc2_round_trip_corpus() {
    for line in test_cases() {
        let frame = APRSFrame::decode_tnc2(&line)
            .unwrap_or_else(|e| panic!("decode failed for {line:?}: {e}"))
            .unwrap_or_else(|| panic!("expected a frame, got a server comment for {line:?}"));
        let encoded = frame.encode_tnc2().unwrap_or_else(|e| panic!("encode failed for {line:?}: {e}"));
        assert_eq!(encoded, line, "round-trip mismatch for {line:?}");
    }
}

#[test]
fn uncompressed_position_with_timestamp() {
    let line = "KF7HVM-2>APRS:/092345z4903.50N/07201.75W>Test";
    let frame = APRSFrame::decode_tnc2(line).unwrap().unwrap();
    match frame.information {
        InformationField::Position(report) => {
            assert!(!report.messaging_capable);
            assert_eq!(report.comment, b"Test");
            assert_eq!(report.position.symbol_table, '/');
            assert_eq!(report.position.symbol_code, '>');
            assert!((report.position.latitude - 49.0583).abs() < 1e-3);
            assert!((report.position.longitude - (-72.0292)).abs() < 1e-3);
        }
        other => panic!("expected PositionReport, got {other:?}"),
    }
}

#[test]
fn compressed_position() {
    let report = PositionReport::decode(false, false, b"/5L!!<*e7>{?!").unwrap();
    assert!(report.position.compressed);
    assert!((report.position.latitude - 49.5).abs() < 0.1);
    assert!((report.position.longitude - (-72.75)).abs() < 0.1);
}

#[test]
fn message_with_number() {
    let line = "KF7HVM-2>APRS::KF7HVM   :Hello{001";
    let frame = APRSFrame::decode_tnc2(line).unwrap().unwrap();
    match frame.information {
        InformationField::Message(msg) => {
            assert_eq!(msg.addressee, "KF7HVM   ");
            assert_eq!(msg.text, b"Hello");
            assert_eq!(msg.message_number, Some("001".to_string()));
        }
        other => panic!("expected Message, got {other:?}"),
    }
}

#[test]
fn object_report() {
    let line = "KF7HVM-2>APRS:;LEADER   *092345z4903.50N/07201.75W>Moving";
    let frame = APRSFrame::decode_tnc2(line).unwrap().unwrap();
    match frame.information {
        InformationField::Object(report) => {
            assert_eq!(report.name, "LEADER   ");
            assert!(report.live);
            assert_eq!(report.comment, b"Moving");
        }
        other => panic!("expected ObjectReport, got {other:?}"),
    }
}

#[test]
fn unrecognised_dti_falls_back_to_raw() {
    let line = "N0CALL>APRS:T#471,7.5,34.7,37.0,1.0,137.0,00000000";
    let frame = APRSFrame::decode_tnc2(line).unwrap().unwrap();
    assert_eq!(
        frame.information,
        InformationField::Raw(b"T#471,7.5,34.7,37.0,1.0,137.0,00000000".to_vec())
    );
}

#[test]
fn ax25_fcs_round_trip() {
    let destination = Callsign::new("APRS", 0, false).unwrap();
    let source = Callsign::new("KF7HVM", 2, false).unwrap();
    let frame = APRSFrame {
        source,
        destination,
        path: vec![],
        information: dispatch::decode(b">Test"),
    };
    let encoded = frame.encode_ax25().unwrap();
    let decoded = APRSFrame::decode_ax25(&encoded, true).unwrap();
    assert_eq!(decoded, frame);
}

#[test]
fn cross_form_equivalence() {
    let destination = Callsign::new("APRS", 0, false).unwrap();
    let source = Callsign::new("KF7HVM", 2, false).unwrap();
    let frame = APRSFrame {
        source,
        destination,
        path: vec![],
        information: dispatch::decode(b"!4903.50N/07201.75W>Test"),
    };
    let ax25_bytes = frame.encode_ax25().unwrap();
    let tnc2_text = frame.encode_tnc2().unwrap();

    let from_ax25 = APRSFrame::decode_ax25(&ax25_bytes, true).unwrap();
    let from_tnc2 = APRSFrame::decode_tnc2(&tnc2_text).unwrap().unwrap();
    assert_eq!(from_ax25.information, from_tnc2.information);
    assert_eq!(from_ax25.source, from_tnc2.source);
    assert_eq!(from_ax25.destination, from_tnc2.destination);
}
