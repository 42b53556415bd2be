//! Loading the shipped reference set and malformed reference files.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use dqa_model::{CodeContext, CodeStatus, CodeTable, KnownNameKind, Name};
use dqa_standards::{ReferenceData, StandardsError, load_reference_data};

fn standards_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn load() -> ReferenceData {
    load_reference_data(&standards_dir()).expect("load shipped standards")
}

#[test]
fn loads_vaccine_tables() {
    let reference = load();
    let vaccines = reference.vaccines();

    let hep_b = vaccines.cvx("8").expect("CVX 08");
    assert_eq!(hep_b.cvx_code, "08");
    assert!(hep_b.valid.contains(date(2020, 1, 1)));

    let cpt = vaccines
        .cpt("90744", Some(date(2020, 1, 1)))
        .expect("CPT 90744");
    assert_eq!(cpt.cvx_code.as_deref(), Some("08"));
    assert!(vaccines.cpt("90701", Some(date(2005, 1, 1))).is_none());

    assert!(vaccines.mvx("SKB").is_some());
    let products = vaccines.products("08", "SKB");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].label, "ENGERIX-B");
    assert!(vaccines.group_match("08", "43"));
    assert!(!vaccines.group_match("08", "20"));
}

#[test]
fn seeds_vaccine_codes_without_overriding_code_tables() {
    let reference = load();
    let codes = reference.codes();

    let cvx = codes
        .get(CodeTable::VaccineCvx, "08", None)
        .expect("seeded CVX code");
    assert_eq!(cvx.status, CodeStatus::Valid);

    let dtp = codes
        .get(CodeTable::VaccineCvx, "01", None)
        .expect("listed CVX code");
    assert_eq!(dtp.status, CodeStatus::Deprecated);

    assert!(codes.get(CodeTable::VaccineProduct, "08-SKB", None).is_some());
    assert!(codes.get(CodeTable::VaccineMvx, "MSK", None).is_some());
}

#[test]
fn loads_contextual_codes_and_defaults() {
    let reference = load();
    let codes = reference.codes();
    let usa = CodeContext::new(CodeTable::AddressCountry, "USA");

    let michigan = codes
        .get(CodeTable::AddressState, "MI", Some(&usa))
        .expect("MI in USA");
    assert_eq!(michigan.label, "Michigan");
    assert!(codes.get(CodeTable::AddressState, "MI", None).is_none());

    let us = codes
        .get(CodeTable::AddressCountry, "US", None)
        .expect("US alias");
    assert_eq!(us.code_value, "USA");
    assert_eq!(codes.default_code_value(CodeTable::PatientSex), "U");
    assert_eq!(codes.default_code_value(CodeTable::PatientRace), "");
}

#[test]
fn loads_known_names() {
    let reference = load();
    let names = reference.known_names();
    let baby = Name {
        first: "Baby".to_string(),
        last: "Jones".to_string(),
        ..Name::default()
    };
    assert!(names.matches(KnownNameKind::UnnamedNewborn, &baby, None));
    assert!(names.matches_last(KnownNameKind::InvalidPrefixes, "mrs"));
    assert!(names.matches_middle(KnownNameKind::InvalidName, "NMN"));
}

#[test]
fn missing_directory_is_an_error() {
    let err = load_reference_data(&standards_dir().join("does-not-exist"))
        .expect_err("missing directory");
    assert!(matches!(err, StandardsError::MissingDirectory { .. }));
}

#[test]
fn absent_files_load_as_empty_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let reference = load_reference_data(dir.path()).expect("empty reference set");
    assert!(reference.codes().is_empty());
    assert!(reference.known_names().is_empty());
}

#[test]
fn bad_status_reports_line() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("codes.csv"),
        "table,value,label,code_value,status,context\nPATIENT_SEX,F,Female,F,valid,\nPATIENT_SEX,X,Other,X,bogus,\n",
    )
    .expect("write codes");
    let err = load_reference_data(dir.path()).expect_err("bad status");
    match err {
        StandardsError::InvalidRecord { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bad_window_date_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("vaccine_mvx.csv"),
        "mvx_code,label,valid_start,valid_end,use_start,use_end\nMSK,Merck,1900-01-01,someday,1900-01-01,2100-01-01\n",
    )
    .expect("write mvx");
    let err = load_reference_data(dir.path()).expect_err("bad date");
    assert!(matches!(err, StandardsError::InvalidRecord { .. }));
}
