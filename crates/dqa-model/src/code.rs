//! Code tables, code status and resolved-code cache entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Reference code table a received value is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodeTable {
    AckType,
    ProcessingId,
    CharacterSet,
    AddressCountry,
    AddressState,
    AddressCounty,
    AddressType,
    PatientSex,
    PatientEthnicity,
    PatientRace,
    PatientProtection,
    PatientPublicity,
    PatientImmunity,
    PatientClass,
    RegistryStatus,
    BirthOrder,
    NameType,
    PersonLanguage,
    Relationship,
    TelecommunicationUse,
    TelecommunicationEquipment,
    FinancialStatus,
    Organization,
    Physician,
    Provider,
    VaccinationAction,
    VaccinationCompletion,
    InformationSource,
    VaccineCvx,
    VaccineCpt,
    VaccineMvx,
    VaccineProduct,
    AdministrationUnit,
    BodyRoute,
    BodySite,
    Confidentiality,
    RefusalReason,
    OrderControl,
    ObservationValueType,
    ObservationIdentifier,
}

impl CodeTable {
    pub const fn all() -> &'static [Self] {
        &[
            Self::AckType,
            Self::ProcessingId,
            Self::CharacterSet,
            Self::AddressCountry,
            Self::AddressState,
            Self::AddressCounty,
            Self::AddressType,
            Self::PatientSex,
            Self::PatientEthnicity,
            Self::PatientRace,
            Self::PatientProtection,
            Self::PatientPublicity,
            Self::PatientImmunity,
            Self::PatientClass,
            Self::RegistryStatus,
            Self::BirthOrder,
            Self::NameType,
            Self::PersonLanguage,
            Self::Relationship,
            Self::TelecommunicationUse,
            Self::TelecommunicationEquipment,
            Self::FinancialStatus,
            Self::Organization,
            Self::Physician,
            Self::Provider,
            Self::VaccinationAction,
            Self::VaccinationCompletion,
            Self::InformationSource,
            Self::VaccineCvx,
            Self::VaccineCpt,
            Self::VaccineMvx,
            Self::VaccineProduct,
            Self::AdministrationUnit,
            Self::BodyRoute,
            Self::BodySite,
            Self::Confidentiality,
            Self::RefusalReason,
            Self::OrderControl,
            Self::ObservationValueType,
            Self::ObservationIdentifier,
        ]
    }

    /// Stable upper-case key used in reference files and code contexts.
    pub fn key(&self) -> &'static str {
        match self {
            Self::AckType => "ACK_TYPE",
            Self::ProcessingId => "PROCESSING_ID",
            Self::CharacterSet => "CHARACTER_SET",
            Self::AddressCountry => "ADDRESS_COUNTRY",
            Self::AddressState => "ADDRESS_STATE",
            Self::AddressCounty => "ADDRESS_COUNTY",
            Self::AddressType => "ADDRESS_TYPE",
            Self::PatientSex => "PATIENT_SEX",
            Self::PatientEthnicity => "PATIENT_ETHNICITY",
            Self::PatientRace => "PATIENT_RACE",
            Self::PatientProtection => "PATIENT_PROTECTION",
            Self::PatientPublicity => "PATIENT_PUBLICITY",
            Self::PatientImmunity => "PATIENT_IMMUNITY",
            Self::PatientClass => "PATIENT_CLASS",
            Self::RegistryStatus => "REGISTRY_STATUS",
            Self::BirthOrder => "BIRTH_ORDER",
            Self::NameType => "NAME_TYPE",
            Self::PersonLanguage => "PERSON_LANGUAGE",
            Self::Relationship => "RELATIONSHIP",
            Self::TelecommunicationUse => "TELECOMMUNICATION_USE",
            Self::TelecommunicationEquipment => "TELECOMMUNICATION_EQUIPMENT",
            Self::FinancialStatus => "FINANCIAL_STATUS",
            Self::Organization => "ORGANIZATION",
            Self::Physician => "PHYSICIAN",
            Self::Provider => "PROVIDER",
            Self::VaccinationAction => "VACCINATION_ACTION",
            Self::VaccinationCompletion => "VACCINATION_COMPLETION",
            Self::InformationSource => "INFORMATION_SOURCE",
            Self::VaccineCvx => "VACCINE_CVX",
            Self::VaccineCpt => "VACCINE_CPT",
            Self::VaccineMvx => "VACCINE_MVX",
            Self::VaccineProduct => "VACCINE_PRODUCT",
            Self::AdministrationUnit => "ADMINISTRATION_UNIT",
            Self::BodyRoute => "BODY_ROUTE",
            Self::BodySite => "BODY_SITE",
            Self::Confidentiality => "CONFIDENTIALITY",
            Self::RefusalReason => "REFUSAL_REASON",
            Self::OrderControl => "ORDER_CONTROL",
            Self::ObservationValueType => "OBSERVATION_VALUE_TYPE",
            Self::ObservationIdentifier => "OBSERVATION_IDENTIFIER",
        }
    }

    /// Parse a table from its key (case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        let key = s.trim().to_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|table| table.key() == key)
            .ok_or_else(|| ModelError::UnknownCodeTable(s.to_string()))
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Classification of a received code against its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStatus {
    Valid,
    Invalid,
    Deprecated,
    Ignored,
    Unrecognized,
}

impl CodeStatus {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "valid" | "v" => Ok(Self::Valid),
            "invalid" | "i" => Ok(Self::Invalid),
            "deprecated" | "d" => Ok(Self::Deprecated),
            "ignored" | "g" => Ok(Self::Ignored),
            "unrecognized" | "u" => Ok(Self::Unrecognized),
            _ => Err(ModelError::UnknownCodeStatus(s.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
            Self::Deprecated => "Deprecated",
            Self::Ignored => "Ignored",
            Self::Unrecognized => "Unrecognized",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Context a code was received in, e.g. the country a state code belongs to.
///
/// Rendered as `TABLE:code_value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeContext(String);

impl CodeContext {
    pub fn new(table: CodeTable, code_value: &str) -> Self {
        Self(format!("{}:{}", table.key(), code_value))
    }

    /// Parse the `TABLE:value` form used in reference files.
    pub fn parse(s: &str) -> Result<Self> {
        let (table, value) = s
            .split_once(':')
            .ok_or_else(|| ModelError::UnknownCodeTable(s.to_string()))?;
        Ok(Self::new(CodeTable::parse(table)?, value.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A received value resolved against a code table for one submitter profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeReceived {
    /// Identity of the cache entry; stable for the life of a profile cache.
    pub id: u64,
    pub profile_id: u64,
    pub table: CodeTable,
    pub received_value: String,
    pub code_label: String,
    pub code_value: String,
    pub status: CodeStatus,
    pub context: Option<CodeContext>,
    pub received_count: u64,
}

impl CodeReceived {
    /// Context value children of this code are resolved under.
    pub fn as_context(&self) -> CodeContext {
        CodeContext::new(self.table, &self.code_value)
    }
}
