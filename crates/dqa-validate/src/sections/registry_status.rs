use dqa_model::{Field, Patient};

use super::SectionValidator;
use crate::context::ValidationContext;
use crate::error::Result;

/// Immunization registry status (active, inactive, moved, deceased).
pub struct RegistryStatusValidator;

impl SectionValidator<Patient> for RegistryStatusValidator {
    fn name(&self) -> &'static str {
        "registry-status"
    }

    fn validate(&self, patient: &mut Patient, ctx: &mut ValidationContext<'_>) -> Result<()> {
        ctx.handle_code(&mut patient.registry_status, Field::PatientRegistryStatus)
    }
}
