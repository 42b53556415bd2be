//! Vaccination (ORC/RXA/RXR/OBX) rules.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use dqa_model::message::{INFO_SOURCE_ADMIN, INFO_SOURCE_HIST};
use dqa_model::reference::{CVX_NO_VACCINE_ADMINISTERED, CVX_UNKNOWN};
use dqa_model::{
    CodeReceived, CodeStatus, CodedEntity, ConceptType, DateWindow, Field, IssueType, Patient,
    PatientImmunity, Vaccination, VaccinationVis, VaccineCpt, VaccineCvx,
};
use dqa_standards::VaccineTables;

use crate::config::AdministeredScoring;
use crate::context::ValidationContext;
use crate::error::Result;
use crate::rules::create_date;
use crate::rules::dates::{is_last_day_of_month, months_between};
use crate::sections::SectionRegistry;

const OBX_VACCINE_FUNDING: &str = "64994-7";
const OBX_VACCINE_TYPE: &str = "30956-7";
const OBX_VIS_PUBLISHED: &str = "29768-9";
const OBX_VIS_PRESENTED: &str = "29769-7";
const OBX_PRESUMED_IMMUNITY: &str = "59784-9";

/// Amount sent when the dose is unknown.
const AMOUNT_UNKNOWN: &str = "999";

/// Lot numbers this short, or with this prefix, are placeholders.
const LOT_PLACEHOLDER_PREFIX: &str = "LOT";
const LOT_MIN_LENGTH: usize = 5;

/// Where an administration date falls against a record's windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowFit {
    Expected,
    Unexpected,
    Invalid,
}

fn window_fit(valid: &DateWindow, usage: &DateWindow, day: NaiveDate) -> WindowFit {
    if !valid.contains(day) {
        WindowFit::Invalid
    } else if !usage.contains(day) {
        WindowFit::Unexpected
    } else {
        WindowFit::Expected
    }
}

/// The vaccine the record is about, after falling back from CVX to CPT.
struct AdminCode<'r> {
    cvx: Option<&'r VaccineCvx>,
    cpt: Option<&'r VaccineCpt>,
    resolved: Option<CodeReceived>,
}

pub(crate) fn validate_vaccination(
    vaccination: &mut Vaccination,
    patient: &mut Patient,
    registry: &SectionRegistry,
    ctx: &mut ValidationContext<'_>,
) -> Result<()> {
    let vaccines = ctx.reference().vaccines();
    validate_action_and_completion(vaccination, ctx)?;
    let administered = vaccination.administered;
    let admin_day = vaccination.admin_date.map(|date| date.date());

    let admin_code = validate_admin_code(vaccination, vaccines, admin_day, ctx)?;
    vaccination.vaccine_cvx = admin_code.cvx.map(|cvx| cvx.cvx_code.clone());

    if ctx.present(vaccination.admin_date.as_ref(), Field::VaccinationAdminDate)
        && let Some(day) = admin_day
    {
        if day.day() == 1 {
            ctx.register(Field::VaccinationAdminDate, IssueType::IsOnFirstDayOfMonth);
        } else if day.day() == 15 {
            ctx.register(Field::VaccinationAdminDate, IssueType::IsOn15thDayOfMonth);
        } else if is_last_day_of_month(day) {
            ctx.register(Field::VaccinationAdminDate, IssueType::IsOnLastDayOfMonth);
        }
    }

    if let Some(cvx) = admin_code.cvx {
        validate_vaccine_concept(cvx, &admin_code, administered, admin_day, patient, ctx);
    }

    validate_manufacturer(vaccination, admin_code.cvx, vaccines, admin_day, ctx)?;
    validate_admin_date_order(vaccination, patient, ctx);

    let amount_valued = validate_amount(vaccination, ctx);
    ctx.handle_code_with(
        &mut vaccination.amount_unit,
        Field::VaccinationAdministeredUnit,
        administered && amount_valued,
        None,
    )?;
    ctx.handle_code_with(&mut vaccination.body_route, Field::VaccinationBodyRoute, administered, None)?;
    ctx.handle_code_with(&mut vaccination.body_site, Field::VaccinationBodySite, administered, None)?;
    ctx.handle_code(&mut vaccination.confidentiality, Field::VaccinationConfidentialityCode)?;
    if matches!(vaccination.confidentiality.code.as_str(), "R" | "V") {
        ctx.register(Field::VaccinationConfidentialityCode, IssueType::IsValuedAsRestricted);
    }

    if let (Some(cpt), Some(cvx)) = (admin_code.cpt, admin_code.cvx)
        && let Some(cpt_cvx) = &cpt.cvx_code
        && !vaccines.group_match(&cvx.cvx_code, cpt_cvx)
    {
        ctx.register(Field::VaccinationCvxCodeAndCptCode, IssueType::AreInconsistent);
    }

    registry.validate_vaccination(vaccination, ctx)?;

    ctx.handle_id(&mut vaccination.ordered_by, Field::VaccinationOrderedBy, administered)?;
    ctx.handle_id(&mut vaccination.entered_by, Field::VaccinationRecordedBy, true)?;

    if administered {
        ctx.not_empty(&vaccination.facility.name, Field::VaccinationFacilityName);
        ctx.present(vaccination.expiration_date.as_ref(), Field::VaccinationLotExpirationDate);
        let lot = &vaccination.lot_number;
        if ctx.not_empty(lot, Field::VaccinationLotNumber)
            && (lot.starts_with(LOT_PLACEHOLDER_PREFIX) || lot.chars().count() < LOT_MIN_LENGTH)
        {
            ctx.register(Field::VaccinationLotNumber, IssueType::IsInvalid);
        }
    }

    let refused = vaccination.is_completion_refused();
    if vaccination.is_completion_completed() && !vaccination.refusal.is_empty() {
        ctx.register(Field::VaccinationRefusalReason, IssueType::ConflictsCompletionStatus);
    }
    ctx.handle_code_with(&mut vaccination.refusal, Field::VaccinationRefusalReason, refused, None)?;

    if ctx.present(vaccination.system_entry_date.as_ref(), Field::VaccinationSystemEntryTime)
        && vaccination
            .system_entry_date
            .is_some_and(|entered| ctx.received_date().date() < entered.date())
    {
        ctx.register(Field::VaccinationSystemEntryTime, IssueType::IsInFuture);
    }

    let funding = validate_observations(vaccination, patient, ctx)?;
    validate_vis(vaccination, ctx)?;

    if let Some(funding) = funding {
        vaccination.financial_eligibility.code = funding;
    }
    if vaccination.financial_eligibility.is_empty() {
        if administered {
            ctx.register(Field::VaccinationFinancialEligibilityCode, IssueType::IsMissing);
        }
    } else {
        ctx.handle_code_with(
            &mut vaccination.financial_eligibility,
            Field::VaccinationFinancialEligibilityCode,
            administered,
            None,
        )?;
    }

    let scoring = &ctx.options().administered_score;
    let score = administered_score(vaccination, ctx.received_date(), scoring);
    if administered && score < scoring.threshold {
        ctx.register(
            Field::VaccinationInformationSource,
            IssueType::IsAdministeredButAppearsToHistorical,
        );
    } else if !administered && score >= scoring.threshold {
        ctx.register(
            Field::VaccinationInformationSource,
            IssueType::IsHistoricalButAppearsToBeAdministered,
        );
    }
    Ok(())
}

fn validate_action_and_completion(
    vaccination: &mut Vaccination,
    ctx: &mut ValidationContext<'_>,
) -> Result<()> {
    ctx.handle_code(&mut vaccination.action, Field::VaccinationActionCode)?;
    if vaccination.is_action_add() {
        ctx.register(Field::VaccinationActionCode, IssueType::IsValuedAsAdd);
        ctx.register(Field::VaccinationActionCode, IssueType::IsValuedAsAddOrUpdate);
    } else if vaccination.is_action_update() {
        ctx.register(Field::VaccinationActionCode, IssueType::IsValuedAsUpdate);
        ctx.register(Field::VaccinationActionCode, IssueType::IsValuedAsAddOrUpdate);
    } else if vaccination.is_action_delete() {
        ctx.register(Field::VaccinationActionCode, IssueType::IsValuedAsDelete);
    }

    ctx.handle_code(&mut vaccination.completion, Field::VaccinationCompletionStatus)?;
    let completion = if vaccination.is_completion_completed() {
        Some(IssueType::IsValuedAsCompleted)
    } else if vaccination.is_completion_refused() {
        Some(IssueType::IsValuedAsRefused)
    } else if vaccination.is_completion_not_administered() {
        Some(IssueType::IsValuedAsNotAdministered)
    } else if vaccination.is_completion_partially_administered() {
        Some(IssueType::IsValuedAsPartiallyAdministered)
    } else {
        None
    };
    if let Some(issue_type) = completion {
        ctx.register(Field::VaccinationCompletionStatus, issue_type);
    }

    let given = vaccination.completion.is_empty()
        || vaccination.is_completion_completed()
        || vaccination.is_completion_partially_administered();
    let cvx = vaccination.admin_cvx.code.as_str();
    if given
        && !cvx.is_empty()
        && cvx != CVX_NO_VACCINE_ADMINISTERED
        && ctx.not_empty(
            &vaccination.information_source.code,
            Field::VaccinationInformationSource,
        )
    {
        ctx.handle_code(&mut vaccination.information_source, Field::VaccinationInformationSource)?;
        match vaccination.information_source.code.as_str() {
            INFO_SOURCE_ADMIN => {
                vaccination.administered = true;
                ctx.register(Field::VaccinationInformationSource, IssueType::IsValuedAsAdministered);
            }
            INFO_SOURCE_HIST => {
                vaccination.administered = false;
                ctx.register(Field::VaccinationInformationSource, IssueType::IsValuedAsHistorical);
            }
            _ => vaccination.administered = false,
        }
    }
    Ok(())
}

/// Resolve the CVX and CPT codes and pick the vaccine the record names.
///
/// The CPT code stands in when the CVX code is unknown, invalid or ignored
/// and the CPT code maps to a known vaccine.
fn validate_admin_code<'r>(
    vaccination: &mut Vaccination,
    vaccines: &'r VaccineTables,
    admin_day: Option<NaiveDate>,
    ctx: &mut ValidationContext<'_>,
) -> Result<AdminCode<'r>> {
    let administered = vaccination.administered;
    ctx.handle_code(&mut vaccination.admin_cpt, Field::VaccinationCptCode)?;
    ctx.handle_code(&mut vaccination.admin_cvx, Field::VaccinationCvxCode)?;

    let cpt = vaccines.cpt(&vaccination.admin_cpt.code, admin_day);
    if let (Some(cpt), Some(day)) = (cpt, admin_day) {
        match window_fit(&cpt.valid, &cpt.usage, day) {
            WindowFit::Invalid => ctx.register_with_code(
                Field::VaccinationCptCode,
                IssueType::IsInvalidForDateAdministered,
                vaccination.admin_cpt.resolved.as_ref(),
            ),
            WindowFit::Unexpected => ctx.register_with_code(
                Field::VaccinationCptCode,
                IssueType::IsUnexpectedForDateAdministered,
                vaccination.admin_cpt.resolved.as_ref(),
            ),
            WindowFit::Expected => {}
        }
    }

    let cvx = vaccines.cvx(&vaccination.admin_cvx.code);
    if let (Some(cvx), Some(day)) = (cvx, admin_day)
        && (!cvx.concept_type.is_lenient() || administered)
    {
        match window_fit(&cvx.valid, &cvx.usage, day) {
            WindowFit::Invalid => ctx.register_with_code(
                Field::VaccinationCvxCode,
                IssueType::IsInvalidForDateAdministered,
                vaccination.admin_cvx.resolved.as_ref(),
            ),
            WindowFit::Unexpected => ctx.register_with_code(
                Field::VaccinationCvxCode,
                IssueType::IsUnexpectedForDateAdministered,
                vaccination.admin_cvx.resolved.as_ref(),
            ),
            WindowFit::Expected => {}
        }
    }

    let cvx_unusable = cvx.is_none()
        || vaccination.admin_cvx.is_invalid()
        || vaccination.admin_cvx.is_ignored();
    let cpt_cvx = cpt
        .and_then(|cpt| cpt.cvx_code.as_deref())
        .and_then(|code| vaccines.cvx(code));
    let (entity, cvx) = match cpt_cvx {
        Some(cpt_cvx) if cvx_unusable => (&vaccination.admin_cpt, Some(cpt_cvx)),
        _ => (&vaccination.admin_cvx, cvx),
    };

    if entity.is_empty() {
        ctx.register(Field::VaccinationAdminCode, IssueType::IsMissing);
    } else if let Some(code) = &entity.resolved {
        let issue_type = match code.status {
            CodeStatus::Valid => None,
            CodeStatus::Deprecated => Some(IssueType::IsDeprecated),
            CodeStatus::Ignored => Some(IssueType::IsIgnored),
            CodeStatus::Invalid => Some(IssueType::IsInvalid),
            CodeStatus::Unrecognized => Some(IssueType::IsUnrecognized),
        };
        if let Some(issue_type) = issue_type {
            ctx.register_with_code(Field::VaccinationAdminCode, issue_type, Some(code));
        }
    }

    Ok(AdminCode {
        cvx,
        cpt,
        resolved: entity.resolved.clone(),
    })
}

fn validate_vaccine_concept(
    cvx: &VaccineCvx,
    admin_code: &AdminCode<'_>,
    administered: bool,
    admin_day: Option<NaiveDate>,
    patient: &Patient,
    ctx: &mut ValidationContext<'_>,
) {
    let code = admin_code.resolved.as_ref();
    let concept = if cvx.concept_type == ConceptType::Unspecified {
        administered.then_some(IssueType::IsNotSpecific)
    } else if cvx.cvx_code == CVX_NO_VACCINE_ADMINISTERED {
        Some(IssueType::IsValuedAsNotAdministered)
    } else if cvx.cvx_code == CVX_UNKNOWN {
        Some(IssueType::IsValuedAsUnknown)
    } else if cvx.concept_type == ConceptType::NonVaccine {
        Some(IssueType::IsNotVaccine)
    } else {
        None
    };
    if let Some(issue_type) = concept {
        ctx.register_with_code(Field::VaccinationAdminCode, issue_type, code);
    }

    let Some(day) = admin_day else {
        return;
    };
    if !cvx.concept_type.is_lenient() || administered {
        match window_fit(&cvx.valid, &cvx.usage, day) {
            WindowFit::Invalid => {
                ctx.register(
                    Field::VaccinationAdminDate,
                    IssueType::IsBeforeOrAfterLicensedVaccineRange,
                );
                ctx.register_with_code(
                    Field::VaccinationAdminCode,
                    IssueType::IsInvalidForDateAdministered,
                    code,
                );
            }
            WindowFit::Unexpected => {
                ctx.register(
                    Field::VaccinationAdminDate,
                    IssueType::IsBeforeOrAfterExpectedVaccineUsageRange,
                );
                ctx.register_with_code(
                    Field::VaccinationAdminCode,
                    IssueType::IsUnexpectedForDateAdministered,
                    code,
                );
            }
            WindowFit::Expected => {}
        }
    }

    if let Some(birth) = patient.birth_date {
        let months = months_between(birth.date(), day);
        if months < cvx.use_month_start || months > cvx.use_month_end {
            ctx.register(
                Field::VaccinationAdminDate,
                IssueType::IsBeforeOrAfterWhenExpectedForPatientAge,
            );
        }
    }
}

fn validate_manufacturer(
    vaccination: &mut Vaccination,
    cvx: Option<&VaccineCvx>,
    vaccines: &VaccineTables,
    admin_day: Option<NaiveDate>,
    ctx: &mut ValidationContext<'_>,
) -> Result<()> {
    let administered = vaccination.administered;
    ctx.handle_code_with(
        &mut vaccination.manufacturer,
        Field::VaccinationManufacturerCode,
        administered,
        None,
    )?;
    if !administered {
        return Ok(());
    }

    let mvx = if vaccination.manufacturer.is_empty() {
        None
    } else {
        vaccines.mvx(&vaccination.manufacturer.code)
    };
    if let (Some(mvx), Some(day)) = (mvx, admin_day) {
        let issue_type = match window_fit(&mvx.valid, &mvx.usage, day) {
            WindowFit::Invalid => Some(IssueType::IsInvalidForDateAdministered),
            WindowFit::Unexpected => Some(IssueType::IsUnexpectedForDateAdministered),
            WindowFit::Expected => None,
        };
        if let Some(issue_type) = issue_type {
            ctx.register_with_code(
                Field::VaccinationManufacturerCode,
                issue_type,
                vaccination.manufacturer.resolved.as_ref(),
            );
        }
    }

    let specific_cvx = cvx.filter(|cvx| {
        let code = cvx.cvx_code.as_str();
        !code.is_empty() && code != CVX_NO_VACCINE_ADMINISTERED && code != CVX_UNKNOWN
    });
    let manufacturer_usable =
        vaccination.manufacturer.is_valid() || vaccination.manufacturer.is_deprecated();
    match (mvx, specific_cvx) {
        (Some(mvx), Some(cvx)) if manufacturer_usable => {
            vaccination.product = CodedEntity::new(format!("{}-{}", cvx.cvx_code, mvx.mvx_code));
            ctx.handle_code(&mut vaccination.product, Field::VaccinationProduct)?;
            if let Some(day) = admin_day {
                let products = vaccines.products(&cvx.cvx_code, &mvx.mvx_code);
                let licensed: Vec<_> = products.iter().filter(|p| p.valid.contains(day)).collect();
                if licensed.is_empty() {
                    ctx.register(Field::VaccinationProduct, IssueType::IsInvalidForDateAdministered);
                } else if !licensed.iter().any(|p| p.usage.contains(day)) {
                    ctx.register(
                        Field::VaccinationProduct,
                        IssueType::IsUnexpectedForDateAdministered,
                    );
                }
            }
        }
        _ => ctx.register(Field::VaccinationProduct, IssueType::IsMissing),
    }
    Ok(())
}

fn validate_admin_date_order(
    vaccination: &Vaccination,
    patient: &Patient,
    ctx: &mut ValidationContext<'_>,
) {
    let Some(admin) = vaccination.admin_date else {
        return;
    };
    let day = admin.date();
    let after = |other: Option<NaiveDateTime>| other.is_some_and(|other| day > other.date());

    if vaccination.administered && after(vaccination.expiration_date) {
        ctx.register(Field::VaccinationAdminDate, IssueType::IsAfterLotExpirationDate);
    }
    if day > ctx.received_date().date() {
        ctx.register(Field::VaccinationAdminDate, IssueType::IsAfterMessageSubmitted);
    }
    if after(patient.death_date) {
        ctx.register(Field::VaccinationAdminDate, IssueType::IsAfterPatientDeathDate);
    }
    if patient.birth_date.is_some_and(|birth| day < birth.date()) {
        ctx.register(Field::VaccinationAdminDate, IssueType::IsBeforeBirth);
    }
    if after(vaccination.system_entry_date) {
        ctx.register(Field::VaccinationAdminDate, IssueType::IsAfterSystemEntryDate);
    }
    if ctx.present(vaccination.admin_date_end.as_ref(), Field::VaccinationAdminDateEnd)
        && vaccination.admin_date_end != Some(admin)
    {
        ctx.register(Field::VaccinationAdminDateEnd, IssueType::IsDifferentFromStartDate);
    }
}

/// Check the administered amount; returns true when a usable amount is given.
fn validate_amount(vaccination: &mut Vaccination, ctx: &mut ValidationContext<'_>) -> bool {
    let administered = vaccination.administered;
    let amount = vaccination.amount.trim().to_string();
    if amount.is_empty() || amount == AMOUNT_UNKNOWN {
        if administered {
            ctx.register(Field::VaccinationAdministeredAmount, IssueType::IsMissing);
            ctx.register(Field::VaccinationAdministeredAmount, IssueType::IsValuedAsUnknown);
        }
        vaccination.amount.clear();
        return false;
    }
    match amount.parse::<f64>() {
        Ok(value) if value == 0.0 => {
            if administered {
                ctx.register(Field::VaccinationAdministeredAmount, IssueType::IsValuedAsZero);
            }
            vaccination.amount = amount;
            false
        }
        Ok(value) if value.is_finite() => {
            vaccination.amount = amount;
            true
        }
        // Unparseable text, NaN and infinities alike.
        _ => {
            if administered {
                ctx.register(Field::VaccinationAdministeredAmount, IssueType::IsInvalid);
            }
            vaccination.amount.clear();
            false
        }
    }
}

/// Walk the observations; returns the funding source, when one was sent.
///
/// VIS observations sharing a sub-id are gathered into one VIS record.
fn validate_observations(
    vaccination: &mut Vaccination,
    patient: &mut Patient,
    ctx: &mut ValidationContext<'_>,
) -> Result<Option<String>> {
    let mut funding = None;
    let mut vis_by_sub_id: BTreeMap<String, usize> = BTreeMap::new();

    for observation in &mut vaccination.observations {
        ctx.handle_code(&mut observation.value_type, Field::ObservationValueType)?;
        ctx.handle_code(
            &mut observation.identifier,
            Field::ObservationObservationIdentifierCode,
        )?;
        if observation.skipped {
            continue;
        }
        match observation.identifier.code.as_str() {
            OBX_VACCINE_FUNDING if funding.is_none() => {
                if ctx.not_empty(&observation.value, Field::ObservationObservationValue) {
                    funding = Some(observation.value.clone());
                }
            }
            identifier @ (OBX_VACCINE_TYPE | OBX_VIS_PUBLISHED | OBX_VIS_PRESENTED) => {
                let index = match vis_by_sub_id.get(&observation.sub_id) {
                    Some(index) => *index,
                    None => {
                        vaccination.vis_list.push(VaccinationVis::default());
                        let index = vaccination.vis_list.len() - 1;
                        vis_by_sub_id.insert(observation.sub_id.clone(), index);
                        index
                    }
                };
                let vis = &mut vaccination.vis_list[index];
                let value = observation.value.as_str();
                match identifier {
                    OBX_VACCINE_TYPE => vis.cvx.code = value.to_string(),
                    OBX_VIS_PRESENTED if !value.is_empty() => {
                        vis.presented_date =
                            create_date(ctx, value, Field::VaccinationVisPresentedDate);
                    }
                    OBX_VIS_PUBLISHED if !value.is_empty() => {
                        vis.published_date =
                            create_date(ctx, value, Field::VaccinationVisPublishedDate);
                    }
                    _ => {}
                }
            }
            OBX_PRESUMED_IMMUNITY => {
                let mut immunity = PatientImmunity {
                    immunity: CodedEntity::new(observation.value.clone()),
                };
                ctx.handle_code(&mut immunity.immunity, Field::PatientImmunityCode)?;
                patient.immunities.push(immunity);
            }
            _ => {}
        }
    }
    Ok(funding)
}

fn validate_vis(vaccination: &mut Vaccination, ctx: &mut ValidationContext<'_>) -> Result<()> {
    let administered = vaccination.administered;
    if vaccination.vis_list.is_empty() {
        if administered {
            ctx.register(Field::VaccinationVis, IssueType::IsMissing);
        }
        return Ok(());
    }

    let admin_day = vaccination.admin_date.map(|date| date.date());
    for (index, vis) in vaccination.vis_list.iter_mut().enumerate() {
        vis.position_id = u32::try_from(index + 1).unwrap_or(u32::MAX);
        ctx.handle_code_with(&mut vis.cvx, Field::VaccinationVisCvxCode, administered, None)?;

        if vis.published_date.is_none() && administered {
            ctx.register(Field::VaccinationVisPublishedDate, IssueType::IsMissing);
        }
        match vis.presented_date.map(|date| date.date()) {
            None => {
                if administered {
                    ctx.register(Field::VaccinationVisPresentedDate, IssueType::IsMissing);
                }
            }
            Some(presented) => {
                if let Some(admin) = admin_day {
                    if presented > admin {
                        ctx.register(Field::VaccinationVisPresentedDate, IssueType::IsAfterAdminDate);
                    } else if presented < admin {
                        ctx.register(Field::VaccinationVisPresentedDate, IssueType::IsNotAdminDate);
                    }
                }
                if vis
                    .published_date
                    .is_some_and(|published| presented < published.date())
                {
                    ctx.register(
                        Field::VaccinationVisPresentedDate,
                        IssueType::IsBeforePublishedDate,
                    );
                }
            }
        }

        if vis.document.is_empty() && (vis.cvx.is_empty() || vis.published_date.is_none()) {
            ctx.register(Field::VaccinationVis, IssueType::IsUnrecognized);
            if index == 0 && administered {
                ctx.register(Field::VaccinationVis, IssueType::IsMissing);
            }
        }
    }
    Ok(())
}

/// Score how much a record looks like a dose given by the submitter rather
/// than one transcribed from history.
pub fn administered_score(
    vaccination: &Vaccination,
    received: NaiveDateTime,
    scoring: &AdministeredScoring,
) -> i32 {
    let recent = Duration::days(scoring.recent_window_days);
    let given_by = &vaccination.given_by;
    [
        (
            vaccination
                .admin_date
                .is_some_and(|admin| received - admin < recent),
            scoring.recent_admin_date,
        ),
        (!vaccination.lot_number.is_empty(), scoring.lot_number),
        (vaccination.expiration_date.is_some(), scoring.expiration_date),
        (!vaccination.manufacturer.is_empty(), scoring.manufacturer),
        (
            !vaccination.financial_eligibility.is_empty(),
            scoring.financial_eligibility,
        ),
        (!vaccination.body_route.is_empty(), scoring.body_route),
        (!vaccination.body_site.is_empty(), scoring.body_site),
        (
            !matches!(vaccination.amount.as_str(), "" | AMOUNT_UNKNOWN | "0"),
            scoring.amount,
        ),
        (
            !vaccination.facility.id.number.is_empty() || !vaccination.facility.name.is_empty(),
            scoring.facility,
        ),
        (
            !given_by.number.is_empty()
                || !given_by.name.first.is_empty()
                || !given_by.name.last.is_empty(),
            scoring.given_by,
        ),
    ]
    .into_iter()
    .filter(|(present, _)| *present)
    .map(|(_, weight)| weight)
    .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    #[test]
    fn empty_record_scores_zero() {
        let vaccination = Vaccination::default();
        let score = administered_score(
            &vaccination,
            at(2020, 6, 1),
            &AdministeredScoring::default(),
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn fully_documented_dose_scores_every_weight() {
        let mut vaccination = Vaccination {
            admin_date: Some(at(2020, 5, 20)),
            lot_number: "AB12345".to_string(),
            expiration_date: Some(at(2021, 1, 1)),
            manufacturer: CodedEntity::new("MSD"),
            financial_eligibility: CodedEntity::new("V02"),
            body_route: CodedEntity::new("IM"),
            body_site: CodedEntity::new("LA"),
            amount: "0.5".to_string(),
            ..Vaccination::default()
        };
        vaccination.facility.name = "Clinic".to_string();
        vaccination.given_by.name.last = "Nurse".to_string();

        let scoring = AdministeredScoring::default();
        let score = administered_score(&vaccination, at(2020, 6, 1), &scoring);
        assert_eq!(score, 5 + 2 + 2 + 2 + 2 + 1 + 1 + 3 + 4 + 4);
        assert!(score >= scoring.threshold);
    }

    #[test]
    fn old_dose_loses_recency_weight() {
        let vaccination = Vaccination {
            admin_date: Some(at(2020, 1, 1)),
            amount: "999".to_string(),
            ..Vaccination::default()
        };
        let score = administered_score(
            &vaccination,
            at(2020, 6, 1),
            &AdministeredScoring::default(),
        );
        assert_eq!(score, 0);
    }

    #[test]
    fn window_fit_prefers_invalid_over_unexpected() {
        let valid = DateWindow::new(at(2000, 1, 1).date(), at(2010, 1, 1).date());
        let usage = DateWindow::new(at(2002, 1, 1).date(), at(2008, 1, 1).date());
        assert_eq!(window_fit(&valid, &usage, at(2011, 1, 1).date()), WindowFit::Invalid);
        assert_eq!(window_fit(&valid, &usage, at(2001, 1, 1).date()), WindowFit::Unexpected);
        assert_eq!(window_fit(&valid, &usage, at(2005, 1, 1).date()), WindowFit::Expected);
        assert_eq!(window_fit(&valid, &usage, at(2010, 1, 1).date()), WindowFit::Invalid);
    }
}
