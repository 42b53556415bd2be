//! Numeric identifier plausibility (SSN, Medicaid).

use std::sync::LazyLock;

use regex::Regex;

use dqa_model::{Field, IssueType};

use crate::context::ValidationContext;

static SSN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9}$").expect("Invalid SSN regex"));

/// Longest run of one repeated character a real identifier contains.
pub const MAX_CONSECUTIVE: usize = 6;

const SEQUENTIAL: &[&str] = &["123456789", "987654321"];

/// True when some character repeats more than `max` times in a row.
pub fn has_run_longer_than(value: &str, max: usize) -> bool {
    let mut run = 0;
    let mut previous = None;
    for c in value.chars() {
        if previous == Some(c) {
            run += 1;
        } else {
            run = 1;
            previous = Some(c);
        }
        if run > max {
            return true;
        }
    }
    false
}

pub fn is_valid_ssn(ssn: &str) -> bool {
    SSN_REGEX.is_match(ssn)
        && !ssn.starts_with("000")
        && ssn.get(3..5) != Some("00")
        && !SEQUENTIAL.contains(&ssn)
        && !has_run_longer_than(ssn, MAX_CONSECUTIVE)
}

pub fn is_valid_number(value: &str, length: usize) -> bool {
    value.chars().count() == length
        && !SEQUENTIAL.contains(&value)
        && !has_run_longer_than(value, MAX_CONSECUTIVE)
}

/// The SSN when plausible; otherwise registers it invalid and returns "".
pub fn validate_ssn(ctx: &mut ValidationContext<'_>, ssn: &str) -> String {
    if is_valid_ssn(ssn) {
        ssn.to_string()
    } else {
        ctx.register(Field::PatientSsn, IssueType::IsInvalid);
        String::new()
    }
}

/// The identifier when plausible for `length`; otherwise registers `field`
/// invalid and returns "".
pub fn validate_number(
    ctx: &mut ValidationContext<'_>,
    value: &str,
    field: Field,
    length: usize,
) -> String {
    if is_valid_number(value, length) {
        value.to_string()
    } else {
        ctx.register(field, IssueType::IsInvalid);
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssn_rules() {
        assert!(is_valid_ssn("123450789"));
        assert!(!is_valid_ssn("000123456"));
        assert!(!is_valid_ssn("123004567"));
        assert!(!is_valid_ssn("123456789"));
        assert!(!is_valid_ssn("987654321"));
        assert!(!is_valid_ssn("511111112"));
        assert!(is_valid_ssn("511111123"));
        assert!(!is_valid_ssn("12345678"));
        assert!(!is_valid_ssn("12345678A"));
    }

    #[test]
    fn runs_of_six_are_allowed() {
        assert!(!has_run_longer_than("1222222", 6));
        assert!(has_run_longer_than("12222222", 6));
    }

    #[test]
    fn numeric_id_rules() {
        assert!(is_valid_number("100200300", 9));
        assert!(!is_valid_number("10020030", 9));
        assert!(!is_valid_number("123456789", 9));
        assert!(!is_valid_number("999999999", 9));
    }
}
