//! Integration tests for the field parser.
//!
//! Each fixture mimics a layout seen in real extracted text: values on the
//! line after their label (text layer), labels and values sharing lines
//! (OCR), and reports that lost most of their labels.

use autoland_core::{parse_report, ParsedReport, ParserOptions, ReportOutcome, ReportParser};
use chrono::NaiveDate;
use serde_json::json;

const NEXT_LINE_LAYOUT: &str = "AUTOLAND REPORT
N° VN-A546-VJ123-05012026
A/C REG
VN-A546
FLT N°
VJ123
AIRPORT/RWY
SGN/25R
CAPT
PHAM VAN D
F/O
LE THI E
DATE(Z)
05 Jan 2026
TIME(Z)
13:45
W/V
240/12
T/D POINT
OK
QNH
1009
ALIGNMENT
OK
SPEED CONTROL
OKAY
TRACKING
GOOD
TEMP
LANDING
31
firm
A/C DROPOUT
OK
VIS/RVR
0750
OTHER
NIL
RESULT
UNSUCCESSFUL
REASONS FOR UNSUCCESSFUL AUTOLAND
Late flare, manual landing
CAPT'S SIGNATURE
PHAM VAN D";

const SAME_LINE_LAYOUT: &str = "AUTOLAND REPORT\r\n\r\n\r\n\r\n\
N°: VN-A690-VJ801-14022026\r\n\
A/C REG: VN-A690   FLT N°: VJ801\r\n\
AIRPORT: HAN   RWY: 11L\r\n\
DATE(Z): 14/02/2026   TIME(Z): 08:05:30\r\n\
QNH: 1021\r\n\
TEMP: -2   LANDING: smooth\r\n\
VIS/RVR: 6000\r\n\
RESULT: SUCCESSFUL\r\n";

fn parser() -> ReportParser {
    ReportParser::default().with_reference_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
}

fn parsed(text: &str) -> ParsedReport {
    let result = parser().parse(text);
    assert!(result.success, "errors: {:?}", result.errors);
    result.data.unwrap()
}

#[test]
fn test_next_line_layout() {
    let report = parsed(NEXT_LINE_LAYOUT);

    assert_eq!(report.report_number, "VN-A546-VJ123-05012026");
    assert_eq!(report.aircraft_reg, "VN-A546");
    assert_eq!(report.flight_number, "VJ123");
    assert_eq!(report.airport, "SGN");
    assert_eq!(report.runway, "25R");
    assert_eq!(report.captain.as_deref(), Some("PHAM VAN D"));
    assert_eq!(report.first_officer.as_deref(), Some("LE THI E"));
    assert_eq!(report.date_utc, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    assert_eq!(report.time_utc, "13:45");
    assert_eq!(report.wind_velocity.as_deref(), Some("240/12"));
    assert_eq!(report.td_point.as_deref(), Some("ok"));
    assert_eq!(report.qnh, Some(1009));
    assert_eq!(report.alignment.as_deref(), Some("ok"));
    assert_eq!(report.speed_control.as_deref(), Some("ok"));
    assert_eq!(report.tracking.as_deref(), Some("ok"));
    assert_eq!(report.temperature, Some(31));
    assert_eq!(report.landing.as_deref(), Some("firm"));
    assert_eq!(report.aircraft_dropout.as_deref(), Some("ok"));
    assert_eq!(report.visibility_rvr.as_deref(), Some("0750"));
    assert_eq!(report.other.as_deref(), Some("NIL"));
    assert_eq!(report.result, ReportOutcome::Unsuccessful);
    assert_eq!(report.reasons.as_deref(), Some("Late flare, manual landing"));
    assert_eq!(report.captain_signature.as_deref(), Some("PHAM VAN D"));
}

#[test]
fn test_same_line_layout_with_crlf() {
    let report = parsed(SAME_LINE_LAYOUT);

    assert_eq!(report.report_number, "VN-A690-VJ801-14022026");
    assert_eq!(report.aircraft_reg, "VN-A690");
    assert_eq!(report.flight_number, "VJ801");
    assert_eq!(report.airport, "HAN");
    assert_eq!(report.runway, "11L");
    assert_eq!(report.date_utc, NaiveDate::from_ymd_opt(2026, 2, 14).unwrap());
    assert_eq!(report.time_utc, "08:05:30");
    assert_eq!(
        report.datetime_utc,
        NaiveDate::from_ymd_opt(2026, 2, 14)
            .unwrap()
            .and_hms_opt(8, 5, 30)
            .unwrap()
    );
    assert_eq!(report.qnh, Some(1021));
    assert_eq!(report.temperature, Some(-2));
    assert_eq!(report.landing.as_deref(), Some("smooth"));
    assert_eq!(report.visibility_rvr.as_deref(), Some("6000"));
    assert_eq!(report.result, ReportOutcome::Successful);
    assert_eq!(report.captain, None);
    assert_eq!(report.captain_signature, None);
}

#[test]
fn test_airport_from_whitelist() {
    let text = "Autoland report VN-A525-VJ442-23122025\nVN-A525 VJ442 landed DAD\nRWY 35";
    let report = parsed(text);
    assert_eq!(report.airport, "DAD");
    assert_eq!(report.runway, "35");

    let options = ParserOptions {
        known_airports: vec!["HAN".to_string()],
        ..ParserOptions::default()
    };
    let result = ReportParser::new(options).parse(text);
    assert!(!result.success);
    assert_eq!(result.errors, vec!["Missing airport"]);
}

#[test]
fn test_success_iff_required_fields_present() {
    let required = [
        ("N° VN-A525-VJ442-23122025", "report_number"),
        ("A/C REG: VN-A525", "aircraft_reg"),
        ("FLT N°: VJ442", "flight_number"),
    ];
    let location = "AIRPORT/RWY: HGH/06";

    let complete = format!(
        "{}\n{}\n{}\n{}",
        required[0].0, required[1].0, required[2].0, location
    );
    assert!(parse_report(&complete).success);

    let without_number = format!("{}\n{}\n{}", required[1].0, required[2].0, location);
    let result = parse_report(&without_number);
    assert!(!result.success);
    assert!(result.data.is_none());
    assert_eq!(result.errors, vec!["Missing report_number"]);
}

#[test]
fn test_record_follows_column_order() {
    let report = parsed(NEXT_LINE_LAYOUT);
    let record = report.to_record();

    assert_eq!(record.len(), ParsedReport::COLUMNS.len());
    assert_eq!(record[0], ("report_number", json!("VN-A546-VJ123-05012026")));
    assert_eq!(record[7], ("date_utc", json!("2026-01-05")));
    assert_eq!(record[12], ("qnh", json!(1009)));
    assert_eq!(record[20], ("result", json!("UNSUCCESSFUL")));
}

#[test]
fn test_repeated_parse_is_stable() {
    let first = parser().parse(SAME_LINE_LAYOUT);
    let second = parser().parse(SAME_LINE_LAYOUT);
    assert_eq!(first, second);
}
