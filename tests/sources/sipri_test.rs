use std::fs;

use arms_recurrence::SipriRecord;
use arms_recurrence::sources::sipri::{self, StatusClass, classify_status};
use arms_recurrence::utils::io::{RawTable, read_latin1_table};
use arms_recurrence::{PipelineError, Stage};

use crate::utils::{SIPRI_HEADER, sipri_bytes};

fn record(country: &str, year: i32, new: f64, second: f64) -> SipriRecord {
    SipriRecord {
        country: country.to_string(),
        year,
        new_arms_tiv: new,
        second_hand_arms_tiv: second,
    }
}

#[test]
fn test_preamble_blank_lines_do_not_shift_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SIPRI.csv");
    fs::write(&path, sipri_bytes()).unwrap();
    assert!(crate::utils::sipri_preamble().contains("\n\n"));

    let table = read_latin1_table(&path, 10, "SIPRI trade register").unwrap();
    assert_eq!(table.headers.first().map(String::as_str), Some("Recipient"));
    assert!(table.column_index("SIPRI TIV of delivered weapons", Stage::SipriNormalizer).is_ok());
}

#[test]
fn test_latin1_export_with_preamble() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SIPRI.csv");
    fs::write(&path, sipri_bytes()).unwrap();

    let table = read_latin1_table(&path, 10, "SIPRI trade register").unwrap();
    let (records, dropped) = sipri::normalize_with_report(&table).unwrap();

    assert_eq!(
        records,
        vec![
            record("Chad", 2010, 2.0, 6.0),
            record("Chad", 2011, 4.0, 0.0),
            record("Côte d'Ivoire", 2010, 0.0, 4.5),
            record("Côte d'Ivoire", 2011, 1.4, 0.0),
        ]
    );
    assert_eq!(dropped.unclassified, 1);
    assert_eq!(dropped.unclassified_tiv, 1.0);
    assert_eq!(dropped.total(), 1);
}

#[test]
fn test_status_classifier_domain() {
    assert_eq!(classify_status("New"), StatusClass::New);
    assert_eq!(classify_status("new but from storage"), StatusClass::New);
    assert_eq!(classify_status("Second hand"), StatusClass::SecondHand);
    assert_eq!(classify_status("SECOND HAND but modernized"), StatusClass::SecondHand);
    assert_eq!(classify_status("second hand, new engines"), StatusClass::SecondHand);
    assert_eq!(classify_status(""), StatusClass::Unclassified);
    assert_eq!(classify_status("Status unknown"), StatusClass::Unclassified);

    assert_eq!(StatusClass::New.flag(), Some(0));
    assert_eq!(StatusClass::SecondHand.flag(), Some(1));
    assert_eq!(StatusClass::Unclassified.flag(), None);
}

#[test]
fn test_records_without_year_or_tiv_are_dropped() {
    let text = format!(
        "{SIPRI_HEADER}\n\
         Chad,France,2009,1,A,B,1,,New,1,1,1\n\
         Chad,France,2009,1,A,B,1,2010,New,1,1,n/a\n\
         ,France,2009,1,A,B,1,2010,New,1,1,3\n\
         Chad,France,2009,1,A,B,1,2010,New,1,1,5\n"
    );
    let (records, dropped) =
        sipri::normalize_with_report(&RawTable::from_text(&text).unwrap()).unwrap();

    assert_eq!(records, vec![record("Chad", 2010, 5.0, 0.0)]);
    assert_eq!(dropped.missing_year, 1);
    assert_eq!(dropped.missing_tiv, 1);
    assert_eq!(dropped.missing_recipient, 1);
}

#[test]
fn test_missing_status_column_is_parse_error() {
    let text = "Recipient,Year(s) of delivery,SIPRI TIV of delivered weapons\nChad,2010,1\n";
    let err = sipri::normalize(&RawTable::from_text(text).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parse {
            stage: Stage::SipriNormalizer,
            ..
        }
    ));
}
