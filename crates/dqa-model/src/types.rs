//! Field-level value types shared by the message entities.

use serde::{Deserialize, Serialize};

use crate::code::{CodeReceived, CodeStatus};

/// A coded field: the received code, its display text, and the resolution
/// attached by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodedEntity {
    pub code: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<CodeReceived>,
}

impl CodedEntity {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn status(&self) -> Option<CodeStatus> {
        self.resolved.as_ref().map(|code| code.status)
    }

    pub fn is_valid(&self) -> bool {
        self.status() == Some(CodeStatus::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        self.status() == Some(CodeStatus::Invalid)
    }

    pub fn is_ignored(&self) -> bool {
        self.status() == Some(CodeStatus::Ignored)
    }

    pub fn is_deprecated(&self) -> bool {
        self.status() == Some(CodeStatus::Deprecated)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Name {
    pub first: String,
    pub middle: String,
    pub last: String,
    pub suffix: String,
    pub prefix: String,
    #[serde(rename = "type")]
    pub type_code: CodedEntity,
}

impl Name {
    /// True when neither first nor last name is present.
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.last.is_empty()
    }

    pub fn full_name(&self) -> String {
        [&self.first, &self.middle, &self.last, &self.suffix]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An identifier issued by an authority, optionally naming a person
/// (providers, physicians) whose name is used as the code label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Id {
    pub number: String,
    pub name: Name,
    pub assigning_authority: String,
    pub type_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<CodeReceived>,
}

impl Id {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.number.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationName {
    pub name: String,
    pub id: Id,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub street2: String,
    pub city: String,
    pub state: CodedEntity,
    pub zip: String,
    pub country: CodedEntity,
    pub county_parish: CodedEntity,
    #[serde(rename = "type")]
    pub type_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumber {
    /// Number as received; presence is judged on this value.
    pub number: String,
    pub country_code: String,
    pub area_code: String,
    pub local_number: String,
    pub extension: String,
    pub tel_use: CodedEntity,
    pub tel_equip: CodedEntity,
}
