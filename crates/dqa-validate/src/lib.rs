//! Data-quality rule engine for immunization update (VXU) messages.
//!
//! A [`Validator`] walks a parsed [`dqa_model::Message`] section by section,
//! resolving every coded value against the reference data and recording each
//! finding as an [`dqa_model::IssueFound`]. Site-specific rules plug in
//! through [`sections::SectionRegistry`].

#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
mod header;
mod next_of_kin;
mod patient;
pub mod resolver;
pub mod rules;
pub mod sections;
pub mod store;
mod vaccination;
pub mod validator;

pub use crate::config::{AdministeredScoring, ValidatorOptions};
pub use crate::context::{PATIENT_POSITION, ValidationContext};
pub use crate::error::{Result, ValidateError};
pub use crate::resolver::CodeResolver;
pub use crate::sections::{SectionRegistry, SectionValidator};
pub use crate::store::{CodeStore, InMemoryCodeStore, QualityCollector};
pub use crate::vaccination::administered_score;
pub use crate::validator::Validator;
