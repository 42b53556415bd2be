//! HL7 timestamp parsing and calendar arithmetic.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use dqa_model::{Field, IssueType};

use crate::context::ValidationContext;

/// Outcome of parsing an HL7 `DTM` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hl7Date {
    Empty,
    Invalid,
    Valid(NaiveDateTime),
}

/// Parse `YYYYMMDD[HHMMSS...]`.
///
/// Fewer than 14 characters are read as a date only; anything after the
/// seconds (fractions, zone offsets) is ignored.
pub fn parse_hl7_date(value: &str) -> Hl7Date {
    let value = value.trim();
    if value.is_empty() {
        return Hl7Date::Empty;
    }
    let parsed = if value.len() < 14 {
        value
            .get(..8)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y%m%d").ok())
            .and_then(|day| day.and_hms_opt(0, 0, 0))
    } else {
        value
            .get(..14)
            .and_then(|stamp| NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").ok())
    };
    parsed.map_or(Hl7Date::Invalid, Hl7Date::Valid)
}

/// Parse a date, registering `field` invalid when it cannot be read.
pub fn create_date(
    ctx: &mut ValidationContext<'_>,
    value: &str,
    field: Field,
) -> Option<NaiveDateTime> {
    match parse_hl7_date(value) {
        Hl7Date::Empty => None,
        Hl7Date::Invalid => {
            ctx.register(field, IssueType::IsInvalid);
            None
        }
        Hl7Date::Valid(date) => Some(date),
    }
}

/// Whole calendar months from `start` to `end`, ignoring the day.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month0() as i32 - start.month0() as i32)
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().is_some_and(|next| next.day() == 1)
}

/// Age in years, counting a year as 365.25 days.
pub fn age_in_years(birth: NaiveDateTime, at: NaiveDateTime) -> f64 {
    const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;
    (at - birth).num_seconds() as f64 / SECONDS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_date_and_timestamp() {
        assert_eq!(
            parse_hl7_date("20200115"),
            Hl7Date::Valid(day(2020, 1, 15).and_hms_opt(0, 0, 0).expect("time"))
        );
        assert_eq!(
            parse_hl7_date("20200115093000-0500"),
            Hl7Date::Valid(day(2020, 1, 15).and_hms_opt(9, 30, 0).expect("time"))
        );
        assert_eq!(parse_hl7_date(""), Hl7Date::Empty);
        assert_eq!(parse_hl7_date("2020"), Hl7Date::Invalid);
        assert_eq!(parse_hl7_date("20201345"), Hl7Date::Invalid);
        assert_eq!(parse_hl7_date("2020011599999999"), Hl7Date::Invalid);
    }

    #[test]
    fn month_arithmetic() {
        assert_eq!(months_between(day(2019, 11, 30), day(2020, 2, 1)), 3);
        assert_eq!(months_between(day(2020, 2, 1), day(2020, 2, 28)), 0);
        assert!(is_last_day_of_month(day(2020, 2, 29)));
        assert!(!is_last_day_of_month(day(2021, 2, 27)));
        assert!(is_last_day_of_month(day(2021, 12, 31)));
    }

    #[test]
    fn age_uses_julian_years() {
        let birth = day(2000, 1, 1).and_hms_opt(0, 0, 0).expect("time");
        let at = day(2017, 12, 31).and_hms_opt(0, 0, 0).expect("time");
        assert!(age_in_years(birth, at) < 18.0);
        let later = day(2018, 1, 1).and_hms_opt(0, 0, 0).expect("time");
        assert!(age_in_years(birth, later) > 18.0);
    }
}
