use dqa_model::{Field, Vaccination};

use super::SectionValidator;
use crate::context::ValidationContext;
use crate::error::Result;

/// Placer and filler order numbers. The filler number identifies the dose
/// in the sending system and is required when administered.
pub struct OrderNumberValidator;

impl SectionValidator<Vaccination> for OrderNumberValidator {
    fn name(&self) -> &'static str {
        "order-number"
    }

    fn validate(&self, vaccination: &mut Vaccination, ctx: &mut ValidationContext<'_>) -> Result<()> {
        ctx.not_empty(&vaccination.placer_order_number, Field::VaccinationPlacerOrderNumber);
        ctx.not_empty_if(
            &vaccination.filler_order_number,
            Field::VaccinationFillerOrderNumber,
            vaccination.administered,
        );
        Ok(())
    }
}
