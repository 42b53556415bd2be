pub mod code;
pub mod error;
pub mod issue;
pub mod message;
pub mod reference;
pub mod types;

pub use code::{CodeContext, CodeReceived, CodeStatus, CodeTable};
pub use error::{ModelError, Result};
pub use issue::{
    Field, IssueClass, IssueFound, IssueReport, IssueType, PotentialIssue, Severity,
    SeverityOverrides, ValidationReport,
};
pub use message::{
    Message, MessageHeader, NextOfKin, Observation, Patient, PatientImmunity, Vaccination,
    VaccinationVis,
};
pub use reference::{
    ConceptType, DateWindow, KnownName, KnownNameKind, VaccineCpt, VaccineCvx, VaccineCvxGroup,
    VaccineMvx, VaccineProduct,
};
pub use types::{Address, CodedEntity, Id, Name, OrganizationName, PhoneNumber};
