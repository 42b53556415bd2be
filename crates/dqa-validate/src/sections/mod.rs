//! Pluggable section validators.
//!
//! A [`SectionValidator`] adds rules for one record kind of the message:
//! the header, the patient, or a vaccination. Validators are registered in a
//! [`SectionRegistry`] and run after the core rules of their record, in
//! registration order.
//!
//! # Example
//!
//! ```ignore
//! use dqa_validate::sections::{SectionRegistry, SectionValidator};
//!
//! struct LotPrefix;
//!
//! impl SectionValidator<Vaccination> for LotPrefix {
//!     fn name(&self) -> &'static str {
//!         "lot-prefix"
//!     }
//!
//!     fn validate(&self, vaccination: &mut Vaccination, ctx: &mut ValidationContext<'_>) -> Result<()> {
//!         // site-specific lot number rules
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = SectionRegistry::standard();
//! registry.register_vaccination(Box::new(LotPrefix));
//! ```

mod facility;
mod given_by;
mod order_control;
mod order_number;
mod patient_class;
mod registry_status;

pub use facility::FacilityValidator;
pub use given_by::GivenByValidator;
pub use order_control::OrderControlValidator;
pub use order_number::OrderNumberValidator;
pub use patient_class::PatientClassValidator;
pub use registry_status::RegistryStatusValidator;

use dqa_model::{MessageHeader, Patient, Vaccination};

use crate::context::ValidationContext;
use crate::error::Result;

/// Rules for one record kind `R`.
pub trait SectionValidator<R>: Send + Sync {
    /// Short stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Validate `record`, registering issues on `ctx`.
    ///
    /// # Errors
    ///
    /// Only resolver or store failures are errors; findings are issues.
    fn validate(&self, record: &mut R, ctx: &mut ValidationContext<'_>) -> Result<()>;
}

/// Registered section validators, per record kind.
#[derive(Default)]
pub struct SectionRegistry {
    header: Vec<Box<dyn SectionValidator<MessageHeader>>>,
    patient: Vec<Box<dyn SectionValidator<Patient>>>,
    vaccination: Vec<Box<dyn SectionValidator<Vaccination>>>,
}

impl SectionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The validators every deployment runs.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_header(Box::new(FacilityValidator));
        registry.register_patient(Box::new(PatientClassValidator));
        registry.register_patient(Box::new(RegistryStatusValidator));
        registry.register_vaccination(Box::new(OrderControlValidator));
        registry.register_vaccination(Box::new(OrderNumberValidator));
        registry.register_vaccination(Box::new(FacilityValidator));
        registry.register_vaccination(Box::new(GivenByValidator));
        registry
    }

    pub fn register_header(&mut self, validator: Box<dyn SectionValidator<MessageHeader>>) {
        self.header.push(validator);
    }

    pub fn register_patient(&mut self, validator: Box<dyn SectionValidator<Patient>>) {
        self.patient.push(validator);
    }

    pub fn register_vaccination(&mut self, validator: Box<dyn SectionValidator<Vaccination>>) {
        self.vaccination.push(validator);
    }

    pub fn validate_header(
        &self,
        header: &mut MessageHeader,
        ctx: &mut ValidationContext<'_>,
    ) -> Result<()> {
        run(&self.header, header, ctx)
    }

    pub fn validate_patient(&self, patient: &mut Patient, ctx: &mut ValidationContext<'_>) -> Result<()> {
        run(&self.patient, patient, ctx)
    }

    pub fn validate_vaccination(
        &self,
        vaccination: &mut Vaccination,
        ctx: &mut ValidationContext<'_>,
    ) -> Result<()> {
        run(&self.vaccination, vaccination, ctx)
    }

    /// Names of the registered header, patient and vaccination validators.
    pub fn names(&self) -> (Vec<&'static str>, Vec<&'static str>, Vec<&'static str>) {
        (
            self.header.iter().map(|v| v.name()).collect(),
            self.patient.iter().map(|v| v.name()).collect(),
            self.vaccination.iter().map(|v| v.name()).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.header.len() + self.patient.len() + self.vaccination.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (header, patient, vaccination) = self.names();
        f.debug_struct("SectionRegistry")
            .field("header", &header)
            .field("patient", &patient)
            .field("vaccination", &vaccination)
            .finish()
    }
}

fn run<R>(
    validators: &[Box<dyn SectionValidator<R>>],
    record: &mut R,
    ctx: &mut ValidationContext<'_>,
) -> Result<()> {
    for validator in validators {
        tracing::trace!(section = validator.name(), "running section validator");
        validator.validate(record, ctx)?;
    }
    Ok(())
}
