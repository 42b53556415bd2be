//! Message entities as produced by the HL7 parser.
//!
//! The validator mutates these in place: names are normalized, resolved
//! codes are attached, and derived flags (`administered`, `under_aged`,
//! `responsible_party`) are filled in.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::issue::IssueFound;
use crate::types::{Address, CodedEntity, Id, Name, OrganizationName, PhoneNumber};

pub const INFO_SOURCE_ADMIN: &str = "00";
pub const INFO_SOURCE_HIST: &str = "01";

pub const ACTION_ADD: &str = "A";
pub const ACTION_UPDATE: &str = "U";
pub const ACTION_DELETE: &str = "D";

pub const COMPLETION_COMPLETED: &str = "CP";
pub const COMPLETION_REFUSED: &str = "RE";
pub const COMPLETION_NOT_ADMINISTERED: &str = "NA";
pub const COMPLETION_PARTIALLY_ADMINISTERED: &str = "PA";

pub const RELATIONSHIP_CARE_GIVER: &str = "CGV";
pub const RELATIONSHIP_CHILD: &str = "CHD";
pub const RELATIONSHIP_FATHER: &str = "FTH";
pub const RELATIONSHIP_FOSTER_CHILD: &str = "FCH";
pub const RELATIONSHIP_GRANDPARENT: &str = "GRP";
pub const RELATIONSHIP_GUARDIAN: &str = "GRD";
pub const RELATIONSHIP_MOTHER: &str = "MTH";
pub const RELATIONSHIP_PARENT: &str = "PAR";
pub const RELATIONSHIP_STEPCHILD: &str = "SCH";

/// Relationships that make a next-of-kin eligible as responsible party.
pub const RESPONSIBLE_RELATIONSHIPS: &[&str] = &[
    RELATIONSHIP_CARE_GIVER,
    RELATIONSHIP_FATHER,
    RELATIONSHIP_GRANDPARENT,
    RELATIONSHIP_MOTHER,
    RELATIONSHIP_PARENT,
    RELATIONSHIP_GUARDIAN,
];

/// Relationships that suggest the record was entered backwards for a minor.
pub const CHILD_RELATIONSHIPS: &[&str] = &[
    RELATIONSHIP_CHILD,
    RELATIONSHIP_FOSTER_CHILD,
    RELATIONSHIP_STEPCHILD,
];

/// Root unit of validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub header: MessageHeader,
    #[serde(default)]
    pub patient: Patient,
    #[serde(default)]
    pub next_of_kins: Vec<NextOfKin>,
    #[serde(default)]
    pub vaccinations: Vec<Vaccination>,
    pub received_date: NaiveDateTime,
    /// Message control id, set by header validation.
    #[serde(default)]
    pub message_key: Option<String>,
    #[serde(default)]
    pub issues: Vec<IssueFound>,
}

impl Message {
    pub fn new(received_date: NaiveDateTime) -> Self {
        Self {
            received_date,
            ..Self::default()
        }
    }

    /// The next-of-kin chosen as the patient's responsible party, if any.
    pub fn responsible_party(&self) -> Option<&NextOfKin> {
        self.patient
            .responsible_party
            .and_then(|index| self.next_of_kins.get(index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageHeader {
    pub receiving_application: String,
    pub receiving_facility: String,
    pub sending_application: String,
    pub sending_facility: String,
    pub ack_type_accept: CodedEntity,
    pub ack_type_application: CodedEntity,
    pub message_control: String,
    pub message_date: Option<NaiveDateTime>,
    pub message_type: String,
    pub message_trigger: String,
    pub message_structure: String,
    pub message_version: String,
    pub processing_status: CodedEntity,
    pub country: CodedEntity,
    pub character_set: CodedEntity,
    pub character_set_alt: CodedEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    pub name: Name,
    pub alias_first: String,
    pub alias_last: String,
    pub mother_maiden_name: String,
    pub birth_date: Option<NaiveDateTime>,
    pub birth_multiple: String,
    pub birth_order: CodedEntity,
    pub birth_place: String,
    pub death_date: Option<NaiveDateTime>,
    pub death_indicator: String,
    pub address: Address,
    pub phone: PhoneNumber,
    pub id_medicaid: Id,
    pub id_ssn: String,
    pub id_registry: Id,
    pub id_submitter: Id,
    pub ethnicity: CodedEntity,
    pub race: CodedEntity,
    pub sex: CodedEntity,
    pub facility: OrganizationName,
    pub physician: Id,
    pub primary_language: CodedEntity,
    pub protection: CodedEntity,
    pub publicity: CodedEntity,
    pub patient_class: CodedEntity,
    pub registry_status: CodedEntity,
    pub financial_eligibility: CodedEntity,
    pub financial_eligibility_date: Option<NaiveDateTime>,
    pub system_creation_date: Option<NaiveDateTime>,
    pub immunities: Vec<PatientImmunity>,
    /// Index into [`Message::next_of_kins`]; assigned at most once per pass.
    pub responsible_party: Option<usize>,
    /// Derived from the birth date during patient validation.
    pub under_aged: Option<bool>,
}

impl Patient {
    pub fn is_under_aged(&self) -> bool {
        self.under_aged.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientImmunity {
    pub immunity: CodedEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextOfKin {
    pub position_id: u32,
    pub skipped: bool,
    pub name: Name,
    pub address: Address,
    pub phone: PhoneNumber,
    pub relationship: CodedEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vaccination {
    pub position_id: u32,
    pub skipped: bool,
    pub action: CodedEntity,
    pub completion: CodedEntity,
    pub information_source: CodedEntity,
    /// Set once from the information source; gates the administered rules.
    pub administered: bool,
    pub admin_date: Option<NaiveDateTime>,
    pub admin_date_end: Option<NaiveDateTime>,
    pub admin_cpt: CodedEntity,
    pub admin_cvx: CodedEntity,
    /// CVX code in effect after CPT substitution.
    pub vaccine_cvx: Option<String>,
    pub lot_number: String,
    pub expiration_date: Option<NaiveDateTime>,
    pub manufacturer: CodedEntity,
    pub product: CodedEntity,
    pub amount: String,
    pub amount_unit: CodedEntity,
    pub body_route: CodedEntity,
    pub body_site: CodedEntity,
    pub confidentiality: CodedEntity,
    pub ordered_by: Id,
    pub entered_by: Id,
    pub given_by: Id,
    pub facility: OrganizationName,
    pub order_control: CodedEntity,
    pub placer_order_number: String,
    pub filler_order_number: String,
    pub refusal: CodedEntity,
    pub financial_eligibility: CodedEntity,
    pub system_entry_date: Option<NaiveDateTime>,
    pub observations: Vec<Observation>,
    pub vis_list: Vec<VaccinationVis>,
}

impl Vaccination {
    pub fn is_action_add(&self) -> bool {
        self.action.code == ACTION_ADD
    }

    pub fn is_action_update(&self) -> bool {
        self.action.code == ACTION_UPDATE
    }

    pub fn is_action_delete(&self) -> bool {
        self.action.code == ACTION_DELETE
    }

    pub fn is_completion_completed(&self) -> bool {
        self.completion.code == COMPLETION_COMPLETED
    }

    pub fn is_completion_refused(&self) -> bool {
        self.completion.code == COMPLETION_REFUSED
    }

    pub fn is_completion_not_administered(&self) -> bool {
        self.completion.code == COMPLETION_NOT_ADMINISTERED
    }

    pub fn is_completion_partially_administered(&self) -> bool {
        self.completion.code == COMPLETION_PARTIALLY_ADMINISTERED
    }
}

/// A coded observation attached to a vaccination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    pub skipped: bool,
    pub value_type: CodedEntity,
    pub identifier: CodedEntity,
    pub value: String,
    pub sub_id: String,
}

/// Vaccine information statement given for one vaccination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaccinationVis {
    pub position_id: u32,
    pub document: CodedEntity,
    pub cvx: CodedEntity,
    pub published_date: Option<NaiveDateTime>,
    pub presented_date: Option<NaiveDateTime>,
}
