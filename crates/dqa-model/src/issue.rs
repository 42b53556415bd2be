//! Potential-issue catalog and registered issue occurrences.
//!
//! A [`PotentialIssue`] pairs a [`Field`] with an [`IssueType`]. Both enums
//! are closed, so the catalog is fixed at compile time; validators only
//! reference entries, they never create new kinds.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::code::{CodeReceived, CodeTable};
use crate::error::{ModelError, Result};

macro_rules! fields {
    (@table) => {
        None
    };
    (@table $table:ident) => {
        Some(CodeTable::$table)
    };
    ($($variant:ident => $label:literal $(, $table:ident)?;)*) => {
        /// Message field an issue is reported against.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Field {
            $($variant,)*
        }

        impl Field {
            pub const fn all() -> &'static [Self] {
                &[$(Self::$variant,)*]
            }

            /// Stable identifier, e.g. `VaccinationAdminDate`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            /// Human-readable label, e.g. `Vaccination admin date`.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }

            /// Code table values of this field are resolved against.
            pub fn code_table(&self) -> Option<CodeTable> {
                match self {
                    $(Self::$variant => fields!(@table $($table)?),)*
                }
            }
        }
    };
}

fields! {
    Hl7MshAcceptAckType => "Accept ack type", AckType;
    Hl7MshAppAckType => "App ack type", AckType;
    Hl7MshAltCharacterSet => "Alt character set", CharacterSet;
    Hl7MshCharacterSet => "Character set", CharacterSet;
    Hl7MshCountryCode => "Country code", AddressCountry;
    Hl7MshMessageControlId => "Message control id";
    Hl7MshMessageDate => "Message date";
    Hl7MshMessageStructure => "Message structure";
    Hl7MshMessageTrigger => "Message trigger";
    Hl7MshMessageType => "Message type";
    Hl7MshProcessingId => "Processing id", ProcessingId;
    Hl7MshReceivingApplication => "Receiving application";
    Hl7MshReceivingFacility => "Receiving facility";
    Hl7MshSendingApplication => "Sending application";
    Hl7MshSendingFacility => "Sending facility";
    Hl7MshVersion => "Version";

    NextOfKinAddress => "Next-of-kin address";
    NextOfKinAddressCity => "Next-of-kin address city";
    NextOfKinAddressCountry => "Next-of-kin address country", AddressCountry;
    NextOfKinAddressCounty => "Next-of-kin address county", AddressCounty;
    NextOfKinAddressState => "Next-of-kin address state", AddressState;
    NextOfKinAddressStreet => "Next-of-kin address street";
    NextOfKinAddressStreet2 => "Next-of-kin address street2";
    NextOfKinAddressType => "Next-of-kin address type";
    NextOfKinAddressZip => "Next-of-kin address zip";
    NextOfKinName => "Next-of-kin name";
    NextOfKinNameFirst => "Next-of-kin first name";
    NextOfKinNameLast => "Next-of-kin last name";
    NextOfKinPhoneNumber => "Next-of-kin phone number";
    NextOfKinRelationship => "Next-of-kin relationship", Relationship;

    ObservationObservationIdentifierCode => "Observation identifier code", ObservationIdentifier;
    ObservationObservationValue => "Observation value";
    ObservationValueType => "Observation value type", ObservationValueType;

    PatientAddress => "Patient address";
    PatientAddressCity => "Patient address city";
    PatientAddressCountry => "Patient address country", AddressCountry;
    PatientAddressCounty => "Patient address county", AddressCounty;
    PatientAddressState => "Patient address state", AddressState;
    PatientAddressStreet => "Patient address street";
    PatientAddressStreet2 => "Patient address street2";
    PatientAddressType => "Patient address type";
    PatientAddressZip => "Patient address zip";
    PatientAlias => "Patient alias";
    PatientBirthDate => "Patient birth date";
    PatientBirthIndicator => "Patient birth indicator";
    PatientBirthOrder => "Patient birth order", BirthOrder;
    PatientBirthPlace => "Patient birth place";
    PatientClass => "Patient class", PatientClass;
    PatientDeathDate => "Patient death date";
    PatientDeathIndicator => "Patient death indicator";
    PatientEthnicity => "Patient ethnicity", PatientEthnicity;
    PatientGender => "Patient gender", PatientSex;
    PatientGuardianAddressCity => "Patient guardian address city";
    PatientGuardianAddressState => "Patient guardian address state";
    PatientGuardianAddressZip => "Patient guardian address zip";
    PatientGuardianName => "Patient guardian name";
    PatientGuardianNameFirst => "Patient guardian first name";
    PatientGuardianNameLast => "Patient guardian last name";
    PatientGuardianPhone => "Patient guardian phone";
    PatientGuardianRelationship => "Patient guardian relationship";
    PatientGuardianResponsibleParty => "Patient guardian responsible party";
    PatientImmunityCode => "Patient immunity code", PatientImmunity;
    PatientMedicaidNumber => "Patient Medicaid number";
    PatientMiddleName => "Patient middle name";
    PatientMotherSMaidenName => "Patient mother's maiden name";
    PatientName => "Patient name";
    PatientNameFirst => "Patient first name";
    PatientNameLast => "Patient last name";
    PatientNameTypeCode => "Patient name type code", NameType;
    PatientPhone => "Patient phone";
    PatientPhoneTelEquipCode => "Patient phone tel equip code", TelecommunicationEquipment;
    PatientPhoneTelUseCode => "Patient phone tel use code", TelecommunicationUse;
    PatientPrimaryFacilityId => "Patient primary facility id", Organization;
    PatientPrimaryFacilityName => "Patient primary facility name";
    PatientPrimaryLanguage => "Patient primary language", PersonLanguage;
    PatientPrimaryPhysicianId => "Patient primary physician id", Physician;
    PatientPrimaryPhysicianName => "Patient primary physician name";
    PatientProtectionIndicator => "Patient protection indicator", PatientProtection;
    PatientPublicityCode => "Patient publicity code", PatientPublicity;
    PatientRace => "Patient race", PatientRace;
    PatientRegistryId => "Patient registry id";
    PatientRegistryStatus => "Patient registry status", RegistryStatus;
    PatientSsn => "Patient SSN";
    PatientSubmitterId => "Patient submitter id";
    PatientSubmitterIdAuthority => "Patient submitter id authority";
    PatientSubmitterIdTypeCode => "Patient submitter id type code";
    PatientSystemCreationDate => "Patient system creation date";
    PatientVfcEffectiveDate => "Patient VFC effective date";
    PatientVfcStatus => "Patient VFC status", FinancialStatus;

    VaccinationActionCode => "Vaccination action code", VaccinationAction;
    VaccinationAdminCode => "Vaccination admin code";
    VaccinationAdminDate => "Vaccination admin date";
    VaccinationAdminDateEnd => "Vaccination admin date end";
    VaccinationAdministeredAmount => "Vaccination administered amount";
    VaccinationAdministeredUnit => "Vaccination administered unit", AdministrationUnit;
    VaccinationBodyRoute => "Vaccination body route", BodyRoute;
    VaccinationBodySite => "Vaccination body site", BodySite;
    VaccinationCompletionStatus => "Vaccination completion status", VaccinationCompletion;
    VaccinationConfidentialityCode => "Vaccination confidentiality code", Confidentiality;
    VaccinationCptCode => "Vaccination CPT code", VaccineCpt;
    VaccinationCvxCode => "Vaccination CVX code", VaccineCvx;
    VaccinationCvxCodeAndCptCode => "Vaccination CVX code and CPT code";
    VaccinationFacilityId => "Vaccination facility id", Organization;
    VaccinationFacilityName => "Vaccination facility name";
    VaccinationFillerOrderNumber => "Vaccination filler order number";
    VaccinationFinancialEligibilityCode => "Vaccination financial eligibility code", FinancialStatus;
    VaccinationGivenBy => "Vaccination given by", Provider;
    VaccinationInformationSource => "Vaccination information source", InformationSource;
    VaccinationLotExpirationDate => "Vaccination lot expiration date";
    VaccinationLotNumber => "Vaccination lot number";
    VaccinationManufacturerCode => "Vaccination manufacturer code", VaccineMvx;
    VaccinationOrderControlCode => "Vaccination order control code", OrderControl;
    VaccinationOrderedBy => "Vaccination ordered by", Provider;
    VaccinationPlacerOrderNumber => "Vaccination placer order number";
    VaccinationProduct => "Vaccination product", VaccineProduct;
    VaccinationRecordedBy => "Vaccination recorded by", Provider;
    VaccinationRefusalReason => "Vaccination refusal reason", RefusalReason;
    VaccinationSystemEntryTime => "Vaccination system entry time";
    VaccinationVis => "Vaccination VIS";
    VaccinationVisCvxCode => "Vaccination VIS CVX code", VaccineCvx;
    VaccinationVisPresentedDate => "Vaccination VIS presented date";
    VaccinationVisPublishedDate => "Vaccination VIS published date";
}

/// Coarse classification reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueClass {
    Missing,
    Invalid,
    Unrecognized,
    Deprecated,
    Ignored,
    Incomplete,
    Advisory,
}

impl IssueClass {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Invalid => "invalid",
            Self::Unrecognized => "unrecognized",
            Self::Deprecated => "deprecated",
            Self::Ignored => "ignored",
            Self::Incomplete => "incomplete",
            Self::Advisory => "advisory",
        }
    }

    /// Severity an issue of this class carries unless overridden.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::Invalid => Severity::Error,
            Self::Missing | Self::Unrecognized | Self::Deprecated | Self::Incomplete => {
                Severity::Warning
            }
            Self::Ignored | Self::Advisory => Severity::Accept,
        }
    }
}

macro_rules! issue_types {
    ($($variant:ident => $phrase:literal, $class:ident;)*) => {
        /// What is wrong with (or notable about) a field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum IssueType {
            $($variant,)*
        }

        impl IssueType {
            pub const fn all() -> &'static [Self] {
                &[$(Self::$variant,)*]
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            pub fn phrase(&self) -> &'static str {
                match self {
                    $(Self::$variant => $phrase,)*
                }
            }

            pub fn class(&self) -> IssueClass {
                match self {
                    $(Self::$variant => IssueClass::$class,)*
                }
            }
        }
    };
}

issue_types! {
    IsMissing => "is missing", Missing;
    IsInvalid => "is invalid", Invalid;
    IsUnrecognized => "is unrecognized", Unrecognized;
    IsDeprecated => "is deprecated", Deprecated;
    IsIgnored => "is ignored", Ignored;
    IsIncomplete => "is incomplete", Incomplete;

    IsInFuture => "is in future", Invalid;
    IsAfterSubmission => "is after submission", Invalid;
    IsBeforeBirth => "is before birth", Invalid;
    IsVeryLongAgo => "is very long ago", Advisory;
    IsInconsistent => "is inconsistent", Invalid;
    IsMissingAndMultipleBirthIndicated => "is missing and multiple birth indicated", Missing;
    IsTooShort => "is too short", Invalid;
    HasJunkName => "has junk name", Invalid;
    HasInvalidPrefixes => "has invalid prefixes", Invalid;
    MayIncludeMiddleInitial => "may include middle initial", Advisory;
    MayBeInitial => "may be initial", Advisory;
    MayBeTemporaryNewbornName => "may be temporary newborn name", Advisory;
    MayBeTestName => "may be test name", Advisory;
    IsSameAsUnderagePatient => "is same as underage patient", Advisory;
    IsDifferentFromPatientAddress => "is different from patient address", Advisory;
    IsUnexpected => "is unexpected", Advisory;
    IsNotResponsibleParty => "is not responsible party", Advisory;

    IsValuedAsYes => "is valued as yes", Advisory;
    IsValuedAsNo => "is valued as no", Advisory;
    IsValuedAsTraining => "is valued as training", Advisory;
    IsValuedAsProduction => "is valued as production", Advisory;
    IsValuedAsDebug => "is valued as debug", Advisory;
    IsValuedAs2_5 => "is valued as 2.5", Advisory;
    IsValuedAs2_3_1 => "is valued as 2.3.1", Advisory;
    IsValuedAs2_4 => "is valued as 2.4", Advisory;
    IsValuedAsAdd => "is valued as add", Advisory;
    IsValuedAsUpdate => "is valued as update", Advisory;
    IsValuedAsAddOrUpdate => "is valued as add or update", Advisory;
    IsValuedAsDelete => "is valued as delete", Advisory;
    IsValuedAsCompleted => "is valued as completed", Advisory;
    IsValuedAsRefused => "is valued as refused", Advisory;
    IsValuedAsNotAdministered => "is valued as not administered", Advisory;
    IsValuedAsPartiallyAdministered => "is valued as partially administered", Advisory;
    IsValuedAsAdministered => "is valued as administered", Advisory;
    IsValuedAsHistorical => "is valued as historical", Advisory;
    IsValuedAsUnknown => "is valued as unknown", Advisory;
    IsValuedAsZero => "is valued as zero", Advisory;
    IsValuedAsRestricted => "is valued as restricted", Advisory;

    IsInvalidForDateAdministered => "is invalid for date administered", Invalid;
    IsUnexpectedForDateAdministered => "is unexpected for date administered", Advisory;
    IsNotSpecific => "is not specific", Advisory;
    IsNotVaccine => "is not vaccine", Invalid;
    IsOnFirstDayOfMonth => "is on first day of month", Advisory;
    IsOn15thDayOfMonth => "is on 15th day of month", Advisory;
    IsOnLastDayOfMonth => "is on last day of month", Advisory;
    IsBeforeOrAfterLicensedVaccineRange => "is before or after licensed vaccine range", Invalid;
    IsBeforeOrAfterExpectedVaccineUsageRange => "is before or after expected vaccine usage range", Advisory;
    IsBeforeOrAfterWhenExpectedForPatientAge => "is before or after when expected for patient age", Advisory;
    IsAfterLotExpirationDate => "is after lot expiration date", Invalid;
    IsAfterMessageSubmitted => "is after message submitted", Invalid;
    IsAfterPatientDeathDate => "is after patient death date", Invalid;
    IsAfterSystemEntryDate => "is after system entry date", Invalid;
    IsDifferentFromStartDate => "is different from start date", Advisory;
    AreInconsistent => "are inconsistent", Invalid;
    ConflictsCompletionStatus => "conflicts completion status", Invalid;
    IsAfterAdminDate => "is after admin date", Invalid;
    IsNotAdminDate => "is not admin date", Advisory;
    IsBeforePublishedDate => "is before published date", Invalid;
    IsAdministeredButAppearsToHistorical => "is administered but appears to historical", Advisory;
    IsHistoricalButAppearsToBeAdministered => "is historical but appears to be administered", Advisory;
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The message should not be accepted as is.
    Error,
    /// Should be reviewed by the submitter.
    Warning,
    /// Informational; accepted.
    Accept,
}

impl Severity {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" | "e" => Ok(Self::Error),
            "warning" | "warn" | "w" => Ok(Self::Warning),
            "accept" | "a" => Ok(Self::Accept),
            _ => Err(ModelError::UnknownSeverity(s.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Accept => "Accept",
        }
    }
}

/// Catalog entry: one field/issue-type combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PotentialIssue {
    pub field: Field,
    pub issue_type: IssueType,
}

impl PotentialIssue {
    pub const fn new(field: Field, issue_type: IssueType) -> Self {
        Self { field, issue_type }
    }

    /// Stable key, e.g. `VaccinationAdminDateIsAfterMessageSubmitted`.
    pub fn key(&self) -> String {
        format!("{}{}", self.field.name(), self.issue_type.name())
    }

    /// Look an issue up by its stable key.
    pub fn from_key(key: &str) -> Result<Self> {
        Field::all()
            .iter()
            .filter_map(|field| {
                let rest = key.strip_prefix(field.name())?;
                IssueType::all()
                    .iter()
                    .find(|issue_type| issue_type.name() == rest)
                    .map(|issue_type| Self::new(*field, *issue_type))
            })
            .next()
            .ok_or_else(|| ModelError::UnknownIssue(key.to_string()))
    }

    pub fn class(&self) -> IssueClass {
        self.issue_type.class()
    }

    pub fn default_severity(&self) -> Severity {
        self.class().default_severity()
    }
}

impl fmt::Display for PotentialIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.label(), self.issue_type.phrase())
    }
}

/// Severity overrides keyed by potential-issue key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityOverrides(BTreeMap<String, Severity>);

impl SeverityOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, issue: PotentialIssue, severity: Severity) {
        self.0.insert(issue.key(), severity);
    }

    pub fn severity(&self, issue: PotentialIssue) -> Severity {
        self.0
            .get(&issue.key())
            .copied()
            .unwrap_or_else(|| issue.default_severity())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys that do not name a catalog entry.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .filter(|key| PotentialIssue::from_key(key).is_err())
            .map(String::as_str)
            .collect()
    }
}

/// One registered occurrence of a potential issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFound {
    pub issue: PotentialIssue,
    /// Position of the owning record (patient is 1).
    pub position_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeReceived>,
}

impl IssueFound {
    pub fn field(&self) -> Field {
        self.issue.field
    }

    pub fn issue_type(&self) -> IssueType {
        self.issue.issue_type
    }

    pub fn is(&self, field: Field, issue_type: IssueType) -> bool {
        self.issue == PotentialIssue::new(field, issue_type)
    }
}

/// A reportable view of an issue occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    pub key: String,
    pub field: Field,
    pub class: IssueClass,
    pub severity: Severity,
    pub message: String,
    pub position_id: u32,
    pub received_value: Option<String>,
    pub code_value: Option<String>,
}

/// Issues found for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub message_key: Option<String>,
    pub issues: Vec<IssueReport>,
}

impl ValidationReport {
    pub fn new(
        message_key: Option<String>,
        issues: &[IssueFound],
        overrides: &SeverityOverrides,
    ) -> Self {
        let issues = issues
            .iter()
            .map(|found| IssueReport {
                key: found.issue.key(),
                field: found.issue.field,
                class: found.issue.class(),
                severity: overrides.severity(found.issue),
                message: found.issue.to_string(),
                position_id: found.position_id,
                received_value: found.code.as_ref().map(|c| c.received_value.clone()),
                code_value: found.code.as_ref().map(|c| c.code_value.clone()),
            })
            .collect();
        Self {
            message_key,
            issues,
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn accept_count(&self) -> usize {
        self.count(Severity::Accept)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reads_as_sentence() {
        let issue = PotentialIssue::new(Field::VaccinationAdminDate, IssueType::IsAfterMessageSubmitted);
        insta::assert_snapshot!(issue.to_string(), @"Vaccination admin date is after message submitted");
        insta::assert_snapshot!(issue.key(), @"VaccinationAdminDateIsAfterMessageSubmitted");
    }

    #[test]
    fn key_round_trips_through_catalog() {
        for field in Field::all() {
            for issue_type in [IssueType::IsMissing, IssueType::IsInvalid] {
                let issue = PotentialIssue::new(*field, issue_type);
                assert_eq!(PotentialIssue::from_key(&issue.key()).ok(), Some(issue));
            }
        }
    }

    #[test]
    fn overrides_replace_default_severity() {
        let issue = PotentialIssue::new(Field::PatientSsn, IssueType::IsMissing);
        let mut overrides = SeverityOverrides::new();
        assert_eq!(overrides.severity(issue), Severity::Warning);
        overrides.insert(issue, Severity::Error);
        assert_eq!(overrides.severity(issue), Severity::Error);
    }
}
