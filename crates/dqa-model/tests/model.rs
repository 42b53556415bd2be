//! Tests for dqa-model types.

use chrono::NaiveDate;
use dqa_model::{
    CodeContext, CodeStatus, CodeTable, DateWindow, Field, IssueClass, IssueFound, IssueType,
    Message, PotentialIssue, Severity, SeverityOverrides, ValidationReport,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn code_table_parse_accepts_keys() {
    assert_eq!(CodeTable::parse("vaccine_cvx").ok(), Some(CodeTable::VaccineCvx));
    assert_eq!(CodeTable::parse(" ADDRESS_STATE ").ok(), Some(CodeTable::AddressState));
    assert!(CodeTable::parse("NOPE").is_err());
}

#[test]
fn code_status_parse() {
    assert_eq!(CodeStatus::parse("Valid").ok(), Some(CodeStatus::Valid));
    assert_eq!(CodeStatus::parse("d").ok(), Some(CodeStatus::Deprecated));
    assert!(CodeStatus::parse("maybe").is_err());
}

#[test]
fn code_context_renders_table_and_value() {
    let context = CodeContext::new(CodeTable::AddressCountry, "USA");
    assert_eq!(context.as_str(), "ADDRESS_COUNTRY:USA");
    let parsed = CodeContext::parse("address_country:USA").expect("parse context");
    assert_eq!(parsed, context);
}

#[test]
fn date_window_is_half_open() {
    let window = DateWindow::new(date(2000, 1, 1), date(2010, 1, 1));
    assert!(window.contains(date(2000, 1, 1)));
    assert!(window.contains(date(2009, 12, 31)));
    assert!(!window.contains(date(2010, 1, 1)));
    assert!(!window.contains(date(1999, 12, 31)));
}

#[test]
fn every_coded_field_has_a_table() {
    for field in [
        Field::PatientGender,
        Field::VaccinationCvxCode,
        Field::NextOfKinAddressState,
        Field::VaccinationGivenBy,
    ] {
        assert!(field.code_table().is_some(), "{field:?}");
    }
    assert_eq!(Field::PatientSsn.code_table(), None);
}

#[test]
fn issue_type_classes() {
    assert_eq!(IssueType::IsMissing.class(), IssueClass::Missing);
    assert_eq!(IssueType::IsIncomplete.class(), IssueClass::Incomplete);
    assert_eq!(IssueType::IsValuedAsAdd.class(), IssueClass::Advisory);
    assert_eq!(IssueType::IsAfterMessageSubmitted.class(), IssueClass::Invalid);
}

#[test]
fn report_counts_by_severity() {
    let issues = vec![
        IssueFound {
            issue: PotentialIssue::new(Field::PatientSsn, IssueType::IsInvalid),
            position_id: 1,
            code: None,
        },
        IssueFound {
            issue: PotentialIssue::new(Field::PatientBirthPlace, IssueType::IsMissing),
            position_id: 1,
            code: None,
        },
        IssueFound {
            issue: PotentialIssue::new(Field::VaccinationActionCode, IssueType::IsValuedAsAdd),
            position_id: 2,
            code: None,
        },
    ];
    let report = ValidationReport::new(Some("MSG1".to_string()), &issues, &SeverityOverrides::new());
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.accept_count(), 1);
    assert!(report.has_errors());
    assert_eq!(report.issues[0].key, "PatientSsnIsInvalid");
    assert_eq!(report.issues[0].severity, Severity::Error);
}

#[test]
fn message_round_trips_through_json() {
    let json = r#"{
        "received_date": "2020-06-01T00:00:00",
        "patient": { "name": { "first": "Ann", "last": "Lee" }, "id_ssn": "123" },
        "vaccinations": [ { "position_id": 2, "admin_cvx": { "code": "08" } } ]
    }"#;
    let message: Message = serde_json::from_str(json).expect("deserialize message");
    assert_eq!(message.patient.name.first, "Ann");
    assert_eq!(message.vaccinations[0].admin_cvx.code, "08");
    assert!(message.responsible_party().is_none());
    let round: Message =
        serde_json::from_str(&serde_json::to_string(&message).expect("serialize"))
            .expect("deserialize round");
    assert_eq!(round, message);
}
