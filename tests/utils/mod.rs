//! Shared fixtures for the integration tests

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use arms_recurrence::{
    ModelSource, PanelObservation, PipelineConfig, SynthConfig, generate_observations,
};

pub const WDI_HEADER: &str =
    "Country Name,Country Code,Series Name,Series Code,2010 [YR2010],2011 [YR2011],2012 [YR2012]";

/// A small WDI export with an unused series, a missing cell and the export footer
pub const WDI_CSV: &str = "\
Country Name,Country Code,Series Name,Series Code,2010 [YR2010],2011 [YR2011],2012 [YR2012]
Chad,TCD,Government Effectiveness: Estimate,GE.EST,-1.40,-1.45,..
Chad,TCD,GDP per capita (constant 2015 US$),NY.GDP.PCAP.KD,700,710,720
Chad,TCD,\"Population, total\",SP.POP.TOTL,11000000,11400000,11800000
Chad,TCD,Access to electricity (% of population),EG.ELC.ACCS.ZS,8,9,10
Côte d'Ivoire,CIV,Government Effectiveness: Estimate,GE.EST,-0.9,-0.8,-0.7
Côte d'Ivoire,CIV,GDP per capita (constant 2015 US$),NY.GDP.PCAP.KD,1800,1850,1900
Côte d'Ivoire,CIV,\"Population, total\",SP.POP.TOTL,21000000,21500000,22000000

Data from database: World Development Indicators,,,,,,
Last Updated: 12/16/2024,,,,,,
";

/// Lines preceding the header in a SIPRI trade register export
/// Ten preamble lines, with the blank separator lines the register inserts
pub fn sipri_preamble() -> String {
    let mut preamble = String::from("SIPRI Arms Transfers Database\n");
    for i in 1..10 {
        let _ = writeln!(preamble, "Preamble line {i}");
        if i == 2 {
            preamble.push('\n');
        }
    }
    preamble.push('\n');
    preamble
}

pub const SIPRI_HEADER: &str = "Recipient,Supplier,Year of order,Number ordered,Weapon designation,Weapon description,Number delivered,Year(s) of delivery,status,SIPRI TIV per unit,SIPRI TIV for total order,SIPRI TIV of delivered weapons";

/// SIPRI deliveries encoded as Latin-1, as the register exports them
pub fn sipri_bytes() -> Vec<u8> {
    let body = "\
Chad,France,2009,4,VAB,APC,4,2010,New,0.5,2,2
Chad,Ukraine,2009,2,Mi-24,Combat helicopter,2,2010,Second hand,3,6,6
Chad,China,2010,10,WZ-551,APC,10,2011; 2012,New,0.4,4,4
Chad,Libya,2010,1,T-55,Tank,1,2011,Status unknown,1,1,1
Côte d'Ivoire,France,2010,3,Gazelle,Light helicopter,3,2010,second hand but modernized,1.5,4.5,4.5
Côte d'Ivoire,Belarus,2010,2,BTR-80,APC,2,2011,New,0.7,1.4,1.4
";
    let text = format!("{}{SIPRI_HEADER}\n{body}", sipri_preamble());
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&text);
    bytes.into_owned()
}

/// UCDP termination episodes; a country-year recurs if any episode does
pub const UCDP_CSV: &str = "\
conflictep_id,conflict_id,location,year,recur,outcome
101,1,Chad,2010,0,3
102,2,Chad,2010,1,3
103,1,Chad,2011,0.0,3
104,3,Côte d'Ivoire,2010,true,1
105,3,Côte d'Ivoire,2011,,1
106,4,Mali,2010,1,4
";

/// Write the three small raw extracts into `dir`
pub fn write_raw_fixtures(dir: &Path) {
    fs::write(dir.join("WDI.csv"), WDI_CSV).unwrap();
    fs::write(dir.join("SIPRI.csv"), sipri_bytes()).unwrap();
    fs::write(dir.join("ucpd-termination.csv"), UCDP_CSV).unwrap();
}

/// Configuration reading from `dir` and writing to `dir/out`, without figures
pub fn test_config(dir: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::with_dirs(dir, dir.join("out"));
    config.plot.render = false;
    config
}

/// Raw extracts whose merged panel reproduces seeded synthetic observations
///
/// Every observation becomes three WDI cells, up to two SIPRI deliveries and
/// one UCDP episode, so the assembled panel carries the injected effect of
/// lagged new arms on recurrence.
pub fn write_synthetic_sources(dir: &Path, synth: &SynthConfig) -> Vec<PanelObservation> {
    let observations = generate_observations(&SynthConfig {
        missing_rate: 0.0,
        ..*synth
    });
    let years: Vec<i32> = (synth.start_year..).take(synth.years).collect();

    let mut wdi = String::from("Country Name,Country Code,Series Name,Series Code");
    for year in &years {
        let _ = write!(wdi, ",{year} [YR{year}]");
    }
    wdi.push('\n');

    let mut sipri = format!("{}{SIPRI_HEADER}\n", sipri_preamble());
    let mut ucdp = String::from("location,year,recur\n");

    for (c, chunk) in observations.chunks(synth.years).enumerate() {
        let country = &chunk[0].country;
        let code = format!("C{c:02}");
        let series: [(&str, fn(&PanelObservation) -> f64); 3] = [
            ("Government Effectiveness: Estimate", |o| o.gov_effect.unwrap()),
            ("GDP per capita (constant 2015 US$)", |o| o.log_gdp_pc.unwrap().exp()),
            ("\"Population, total\"", |o| o.log_pop.unwrap().exp()),
        ];
        for (name, value) in &series {
            let _ = write!(wdi, "{country},{code},{name},X");
            for o in chunk {
                let _ = write!(wdi, ",{}", value(o));
            }
            wdi.push('\n');
        }

        for o in chunk {
            let new = o.new_arms_tiv.unwrap();
            if new > 0.0 {
                let _ = writeln!(
                    sipri,
                    "{country},Supplier,{},1,W,D,1,{},New,{new},{new},{new}",
                    o.year, o.year
                );
            }
            let second = o.second_hand_arms_tiv.unwrap();
            let _ = writeln!(
                sipri,
                "{country},Supplier,{},1,W,D,1,{},Second hand,{second},{second},{second}",
                o.year, o.year
            );
            let _ = writeln!(ucdp, "{country},{},{}", o.year, o.recurrence.unwrap());
        }
    }

    fs::write(dir.join("WDI.csv"), wdi).unwrap();
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&sipri);
    fs::write(dir.join("SIPRI.csv"), bytes.as_ref()).unwrap();
    fs::write(dir.join("ucpd-termination.csv"), ucdp).unwrap();

    observations
}

/// Configuration that fits the model on the panel assembled in the same run
pub fn panel_config(dir: &Path) -> PipelineConfig {
    let mut config = test_config(dir);
    config.model_source = ModelSource::Panel;
    config
}
