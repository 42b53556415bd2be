use dqa_model::{Field, Vaccination};

use super::SectionValidator;
use crate::context::ValidationContext;
use crate::error::Result;

/// The administering provider, expected on administered doses.
pub struct GivenByValidator;

impl SectionValidator<Vaccination> for GivenByValidator {
    fn name(&self) -> &'static str {
        "given-by"
    }

    fn validate(&self, vaccination: &mut Vaccination, ctx: &mut ValidationContext<'_>) -> Result<()> {
        let report = vaccination.administered;
        ctx.handle_id(&mut vaccination.given_by, Field::VaccinationGivenBy, report)
    }
}
