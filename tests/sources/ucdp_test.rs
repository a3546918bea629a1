use arms_recurrence::UcdpRecord;
use arms_recurrence::sources::ucdp;
use arms_recurrence::utils::io::RawTable;
use arms_recurrence::{PipelineError, Stage};

use crate::utils::UCDP_CSV;

fn record(country: &str, year: i32, recurrence: u8) -> UcdpRecord {
    UcdpRecord {
        country: country.to_string(),
        year,
        recurrence,
    }
}

#[test]
fn test_episodes_collapse_to_country_years() {
    let records = ucdp::normalize(&RawTable::from_text(UCDP_CSV).unwrap()).unwrap();

    // Côte d'Ivoire 2011 has no observed flag and is dropped
    assert_eq!(
        records,
        vec![
            record("Chad", 2010, 1),
            record("Chad", 2011, 0),
            record("Côte d'Ivoire", 2010, 1),
            record("Mali", 2010, 1),
        ]
    );
}

#[test]
fn test_float_years_and_missing_keys() {
    let text = "location,year,recur\nChad,1995.0,1\n,1996,1\nChad,,0\n";
    let records = ucdp::normalize(&RawTable::from_text(text).unwrap()).unwrap();
    assert_eq!(records, vec![record("Chad", 1995, 1)]);
}

#[test]
fn test_out_of_domain_flag_is_parse_error() {
    let text = "location,year,recur\nChad,2010,2\n";
    let err = ucdp::normalize(&RawTable::from_text(text).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Parse {
            stage: Stage::UcdpNormalizer,
            ..
        }
    ));
}

#[test]
fn test_missing_recur_column_is_parse_error() {
    let err = ucdp::normalize(&RawTable::from_text("location,year\nChad,2010\n").unwrap())
        .unwrap_err();
    assert!(err.to_string().contains("recur"));
}
