use dqa_model::{Field, Patient};

use super::SectionValidator;
use crate::context::ValidationContext;
use crate::error::Result;

pub struct PatientClassValidator;

impl SectionValidator<Patient> for PatientClassValidator {
    fn name(&self) -> &'static str {
        "patient-class"
    }

    fn validate(&self, patient: &mut Patient, ctx: &mut ValidationContext<'_>) -> Result<()> {
        ctx.handle_code(&mut patient.patient_class, Field::PatientClass)
    }
}
