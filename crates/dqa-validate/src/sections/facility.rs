use dqa_model::{Field, MessageHeader, Vaccination};

use super::SectionValidator;
use crate::context::ValidationContext;
use crate::error::Result;

/// Sending facility on the header; administering facility on vaccinations.
pub struct FacilityValidator;

impl SectionValidator<MessageHeader> for FacilityValidator {
    fn name(&self) -> &'static str {
        "facility"
    }

    fn validate(&self, header: &mut MessageHeader, ctx: &mut ValidationContext<'_>) -> Result<()> {
        ctx.not_empty(&header.sending_facility, Field::Hl7MshSendingFacility);
        Ok(())
    }
}

impl SectionValidator<Vaccination> for FacilityValidator {
    fn name(&self) -> &'static str {
        "facility"
    }

    fn validate(&self, vaccination: &mut Vaccination, ctx: &mut ValidationContext<'_>) -> Result<()> {
        let report = vaccination.administered;
        ctx.handle_id(&mut vaccination.facility.id, Field::VaccinationFacilityId, report)
    }
}
