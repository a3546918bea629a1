use arms_recurrence::sources::wdi;
use arms_recurrence::utils::io::RawTable;
use arms_recurrence::{PipelineError, Stage};

use crate::utils::{WDI_CSV, WDI_HEADER};

#[test]
fn test_export_with_footer_normalizes() {
    let records = wdi::normalize(&RawTable::from_text(WDI_CSV).unwrap()).unwrap();

    let keys: Vec<(&str, i32)> = records.iter().map(|r| (r.country.as_str(), r.year)).collect();
    assert_eq!(
        keys,
        [
            ("Chad", 2010),
            ("Chad", 2011),
            ("Côte d'Ivoire", 2010),
            ("Côte d'Ivoire", 2011),
            ("Côte d'Ivoire", 2012),
        ]
    );

    for record in &records {
        assert_eq!(record.log_gdp_pc, record.gdp_pc.ln());
        assert_eq!(record.log_pop, record.pop.ln());
    }
    assert_eq!(records[2].country_code, "CIV");
    assert_eq!(records[2].pop, 21_000_000.0);
}

#[test]
fn test_duplicate_cells_are_averaged() {
    let text = format!(
        "{WDI_HEADER}\n\
         Chad,TCD,Government Effectiveness: Estimate,GE.EST,-1.0,..,..\n\
         Chad,TCD,Government Effectiveness: Estimate,GE.EST,-2.0,..,..\n\
         Chad,TCD,GDP per capita (constant 2015 US$),NY,700,..,..\n\
         Chad,TCD,\"Population, total\",SP,100,..,..\n"
    );
    let records = wdi::normalize(&RawTable::from_text(&text).unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].gov_effect, -1.5);
}

#[test]
fn test_non_positive_population_is_domain_error() {
    let text = format!(
        "{WDI_HEADER}\n\
         Chad,TCD,Government Effectiveness: Estimate,GE.EST,-1.0,..,..\n\
         Chad,TCD,GDP per capita (constant 2015 US$),NY,700,..,..\n\
         Chad,TCD,\"Population, total\",SP,0,..,..\n"
    );
    let err = wdi::normalize(&RawTable::from_text(&text).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Domain {
            stage: Stage::WdiNormalizer,
            ..
        }
    ));
}

#[test]
fn test_missing_id_column_is_parse_error() {
    let text = "Country,Series Name,2010 [YR2010]\nChad,Population, total,1\n";
    let err = wdi::normalize(&RawTable::from_text(text).unwrap()).unwrap_err();
    assert!(matches!(err, PipelineError::Parse { .. }));
    assert!(err.to_string().contains("Country Name"));
}
