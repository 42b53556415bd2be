//! Property tests for the field-level rules.

use chrono::NaiveDate;
use proptest::prelude::*;

use dqa_model::{Field, IssueType, Name};
use dqa_standards::ReferenceData;
use dqa_validate::rules::ids::has_run_longer_than;
use dqa_validate::rules::{normalize_name, validate_ssn};
use dqa_validate::{CodeResolver, ValidationContext, ValidatorOptions};

fn expected_valid(ssn: &str) -> bool {
    !(ssn.starts_with("000")
        || ssn.get(3..5) == Some("00")
        || ssn == "123456789"
        || ssn == "987654321"
        || has_run_longer_than(ssn, 6))
}

proptest! {
    #[test]
    fn ssn_is_kept_or_cleared(ssn in "[0-9]{9}") {
        let reference = ReferenceData::default();
        let options = ValidatorOptions::default();
        let resolver = CodeResolver::default();
        let now = NaiveDate::from_ymd_opt(2020, 6, 1)
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .expect("valid date");
        let mut ctx = ValidationContext::new(&reference, &options, &resolver, 1, now, now);

        let kept = validate_ssn(&mut ctx, &ssn);
        let flagged = ctx.has_issue(Field::PatientSsn, IssueType::IsInvalid);
        if expected_valid(&ssn) {
            prop_assert_eq!(kept, ssn);
            prop_assert!(!flagged);
        } else {
            prop_assert_eq!(kept, "");
            prop_assert!(flagged);
        }
    }

    #[test]
    fn long_runs_are_rejected(digit in 1u8..=9, run in 7usize..=9) {
        let c = char::from(b'0' + digit);
        let mut ssn: String = std::iter::repeat_n(c, run).collect();
        while ssn.len() < 9 {
            ssn.insert(0, if digit == 5 { '4' } else { '5' });
        }
        prop_assert!(!expected_valid(&ssn));
    }

    #[test]
    fn name_normalization_is_idempotent(
        first in "[A-Za-z0-9, ()]{0,16}",
        middle in "[A-Za-z ]{0,6}(\\.[A-Za-z ]{0,2})?",
        last in "[A-Za-z0-9,' ]{0,16}",
        suffix in "(|JR|Jr|III)",
    ) {
        let mut name = Name {
            first,
            middle,
            last,
            suffix,
            ..Name::default()
        };
        normalize_name(&mut name);
        let once = name.clone();
        normalize_name(&mut name);
        prop_assert_eq!(name, once);
    }
}
