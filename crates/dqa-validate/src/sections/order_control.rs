use dqa_model::{Field, Vaccination};

use super::SectionValidator;
use crate::context::ValidationContext;
use crate::error::Result;

pub struct OrderControlValidator;

impl SectionValidator<Vaccination> for OrderControlValidator {
    fn name(&self) -> &'static str {
        "order-control"
    }

    fn validate(&self, vaccination: &mut Vaccination, ctx: &mut ValidationContext<'_>) -> Result<()> {
        ctx.handle_code(&mut vaccination.order_control, Field::VaccinationOrderControlCode)
    }
}
