//! Vaccine reference records and known-name entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// CVX code reported when no vaccine was administered.
pub const CVX_NO_VACCINE_ADMINISTERED: &str = "998";
/// CVX code for an unknown vaccine.
pub const CVX_UNKNOWN: &str = "999";

/// Half-open date window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConceptType {
    #[default]
    Vaccine,
    Unspecified,
    ForeignVaccine,
    NonVaccine,
}

impl ConceptType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "vaccine" => Some(Self::Vaccine),
            "unspecified" => Some(Self::Unspecified),
            "foreign vaccine" | "foreign" => Some(Self::ForeignVaccine),
            "non vaccine" | "nonvaccine" => Some(Self::NonVaccine),
            _ => None,
        }
    }

    /// Foreign and unspecified concepts are only checked for administered
    /// vaccinations.
    pub fn is_lenient(&self) -> bool {
        matches!(self, Self::ForeignVaccine | Self::Unspecified)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineCvx {
    pub cvx_code: String,
    pub label: String,
    pub concept_type: ConceptType,
    pub valid: DateWindow,
    pub usage: DateWindow,
    /// Expected patient age range in months.
    pub use_month_start: i32,
    pub use_month_end: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineCpt {
    pub cpt_code: String,
    pub label: String,
    /// CVX code this procedure maps to.
    pub cvx_code: Option<String>,
    pub valid: DateWindow,
    pub usage: DateWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineMvx {
    pub mvx_code: String,
    pub label: String,
    pub valid: DateWindow,
    pub usage: DateWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineProduct {
    pub label: String,
    pub cvx_code: String,
    pub mvx_code: String,
    pub valid: DateWindow,
    pub usage: DateWindow,
}

impl VaccineProduct {
    /// Composite `CVX-MVX` code products are resolved under.
    pub fn product_code(&self) -> String {
        format!("{}-{}", self.cvx_code, self.mvx_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineCvxGroup {
    pub cvx_code: String,
    pub group_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KnownNameKind {
    InvalidName,
    UnnamedNewborn,
    TestPatient,
    JunkName,
    InvalidPrefixes,
}

impl KnownNameKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "INVALID_NAME" => Some(Self::InvalidName),
            "UNNAMED_NEWBORN" => Some(Self::UnnamedNewborn),
            "TEST_PATIENT" => Some(Self::TestPatient),
            "JUNK_NAME" => Some(Self::JunkName),
            "INVALID_PREFIXES" => Some(Self::InvalidPrefixes),
            _ => None,
        }
    }
}

/// A name pattern that flags suspicious patient records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownName {
    pub kind: KnownNameKind,
    pub first: String,
    pub middle: String,
    pub last: String,
    pub birth_date: Option<NaiveDate>,
}

impl KnownName {
    pub fn only_first(&self) -> bool {
        !self.first.is_empty() && self.middle.is_empty() && self.last.is_empty()
    }

    pub fn only_middle(&self) -> bool {
        self.first.is_empty() && !self.middle.is_empty() && self.last.is_empty()
    }

    pub fn only_last(&self) -> bool {
        self.first.is_empty() && self.middle.is_empty() && !self.last.is_empty()
    }
}
