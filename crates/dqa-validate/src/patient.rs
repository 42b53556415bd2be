//! Patient (PID/PD1) rules.

use chrono::NaiveDateTime;

use dqa_model::{Field, IssueType, KnownNameKind, Patient};

use crate::context::ValidationContext;
use crate::error::Result;
use crate::rules::dates::age_in_years;
use crate::rules::names::may_include_middle_initial;
use crate::rules::{
    AddressFields, TelecomFields, canonical_suffix, normalize_name, valid_name_chars,
    validate_address, validate_number, validate_phone, validate_ssn,
};
use crate::sections::SectionRegistry;

const MEDICAID_LENGTH: usize = 9;

pub(crate) fn validate_patient(
    patient: &mut Patient,
    message_date: Option<NaiveDateTime>,
    registry: &SectionRegistry,
    ctx: &mut ValidationContext<'_>,
) -> Result<()> {
    validate_address(ctx, &mut patient.address, &AddressFields::PATIENT)?;

    let alias = format!("{}{}", patient.alias_first, patient.alias_last);
    ctx.not_empty(&alias, Field::PatientAlias);

    validate_birth(patient, message_date, ctx)?;
    ctx.not_empty(&patient.birth_place, Field::PatientBirthPlace);
    ctx.handle_code(&mut patient.ethnicity, Field::PatientEthnicity)?;

    validate_name(patient, ctx)?;
    validate_mother_maiden_name(patient, ctx);

    validate_phone(
        ctx,
        &mut patient.phone,
        Field::PatientPhone,
        Some(TelecomFields {
            tel_use: Field::PatientPhoneTelUseCode,
            tel_equip: Field::PatientPhoneTelEquipCode,
        }),
    )?;

    ctx.not_empty(&patient.facility.name, Field::PatientPrimaryFacilityName);
    ctx.handle_id(&mut patient.facility.id, Field::PatientPrimaryFacilityId, true)?;
    ctx.handle_code(&mut patient.primary_language, Field::PatientPrimaryLanguage)?;
    ctx.handle_id(&mut patient.physician, Field::PatientPrimaryPhysicianId, true)?;
    if patient.physician.name.is_empty() {
        ctx.register(Field::PatientPrimaryPhysicianName, IssueType::IsMissing);
    }

    if ctx.not_empty(&patient.protection.code, Field::PatientProtectionIndicator) {
        ctx.handle_code(&mut patient.protection, Field::PatientProtectionIndicator)?;
        match patient.protection.code.as_str() {
            "Y" => ctx.register(Field::PatientProtectionIndicator, IssueType::IsValuedAsYes),
            "N" => ctx.register(Field::PatientProtectionIndicator, IssueType::IsValuedAsNo),
            _ => {}
        }
    }
    ctx.handle_code(&mut patient.publicity, Field::PatientPublicityCode)?;
    ctx.handle_code(&mut patient.race, Field::PatientRace)?;

    validate_ids(patient, ctx);
    validate_financial_eligibility(patient, ctx)?;
    validate_death(patient, ctx);

    let options = ctx.options();
    let age = patient
        .birth_date
        .map(|birth| age_in_years(birth, ctx.now()));
    patient.under_aged = Some(age.is_some_and(|age| age < f64::from(options.underage_years)));
    if age.is_some_and(|age| age > f64::from(options.very_old_years)) {
        ctx.register(Field::PatientBirthDate, IssueType::IsVeryLongAgo);
    }

    if ctx.present(patient.system_creation_date.as_ref(), Field::PatientSystemCreationDate)
        && let Some(created) = patient.system_creation_date
    {
        if patient.birth_date.is_some_and(|birth| created < birth) {
            ctx.register(Field::PatientSystemCreationDate, IssueType::IsBeforeBirth);
        }
        if ctx.received_date().date() < created.date() {
            ctx.register(Field::PatientSystemCreationDate, IssueType::IsInFuture);
        }
    }

    registry.validate_patient(patient, ctx)
}

fn validate_birth(
    patient: &mut Patient,
    message_date: Option<NaiveDateTime>,
    ctx: &mut ValidationContext<'_>,
) -> Result<()> {
    match patient.birth_date {
        None => ctx.register(Field::PatientBirthDate, IssueType::IsMissing),
        Some(birth) => {
            if ctx.received_date().date() < birth.date() {
                ctx.register(Field::PatientBirthDate, IssueType::IsInFuture);
            }
            if message_date.is_some_and(|sent| sent.date() < birth.date()) {
                ctx.register(Field::PatientBirthDate, IssueType::IsAfterSubmission);
            }
        }
    }

    match patient.birth_multiple.as_str() {
        "" => {
            if !patient.birth_order.is_empty() {
                ctx.register(Field::PatientBirthIndicator, IssueType::IsMissing);
            }
        }
        "Y" => {
            ctx.handle_code(&mut patient.birth_order, Field::PatientBirthOrder)?;
            if patient.birth_order.is_empty() {
                ctx.register(
                    Field::PatientBirthOrder,
                    IssueType::IsMissingAndMultipleBirthIndicated,
                );
            }
        }
        "N" => {
            if !patient.birth_order.is_empty() && patient.birth_order.code != "1" {
                ctx.register(Field::PatientBirthOrder, IssueType::IsInvalid);
            }
        }
        _ => ctx.register(Field::PatientBirthIndicator, IssueType::IsInvalid),
    }
    Ok(())
}

fn validate_name(patient: &mut Patient, ctx: &mut ValidationContext<'_>) -> Result<()> {
    let known = ctx.reference().known_names();

    if may_include_middle_initial(&patient.name) {
        ctx.register(Field::PatientNameFirst, IssueType::MayIncludeMiddleInitial);
    }
    normalize_name(&mut patient.name);
    let name = &mut patient.name;

    if ctx.not_empty(&name.first, Field::PatientNameFirst)
        && (known.matches_first(KnownNameKind::InvalidName, &name.first)
            || !valid_name_chars(&name.first))
    {
        ctx.register(Field::PatientNameFirst, IssueType::IsInvalid);
    }
    ctx.handle_code(&mut patient.sex, Field::PatientGender)?;

    if ctx.not_empty(&name.last, Field::PatientNameLast)
        && (known.matches_last(KnownNameKind::InvalidName, &name.last)
            || !valid_name_chars(&name.last))
    {
        ctx.register(Field::PatientNameLast, IssueType::IsInvalid);
    }

    if ctx.not_empty(&name.middle, Field::PatientMiddleName) {
        if known.matches_middle(KnownNameKind::InvalidName, &name.middle) {
            name.middle.clear();
        }
        if name.middle.chars().count() == 1 {
            ctx.register(Field::PatientMiddleName, IssueType::MayBeInitial);
        }
    }
    if let Some(stripped) = name.middle.strip_suffix('.') {
        name.middle = stripped.to_string();
    }
    if !name.middle.is_empty() && !valid_name_chars(&name.middle) {
        ctx.register(Field::PatientMiddleName, IssueType::IsInvalid);
    }

    name.suffix = canonical_suffix(&name.suffix);
    ctx.handle_code(&mut name.type_code, Field::PatientNameTypeCode)?;

    let birth_day = patient.birth_date.map(|birth| birth.date());
    let name = &patient.name;
    if known.matches(KnownNameKind::UnnamedNewborn, name, birth_day) {
        ctx.register(Field::PatientName, IssueType::MayBeTemporaryNewbornName);
    }
    if known.matches(KnownNameKind::TestPatient, name, birth_day) {
        ctx.register(Field::PatientName, IssueType::MayBeTestName);
    }
    if known.matches(KnownNameKind::JunkName, name, birth_day) {
        ctx.register(Field::PatientName, IssueType::HasJunkName);
    }
    Ok(())
}

fn validate_mother_maiden_name(patient: &mut Patient, ctx: &mut ValidationContext<'_>) {
    let known = ctx.reference().known_names();
    let field = Field::PatientMotherSMaidenName;
    if !ctx.not_empty(&patient.mother_maiden_name, field) {
        return;
    }
    let maiden = &patient.mother_maiden_name;
    let issue_type = if known.matches_last(KnownNameKind::InvalidName, maiden) {
        Some(IssueType::IsInvalid)
    } else if known.matches_last(KnownNameKind::JunkName, maiden) {
        Some(IssueType::HasJunkName)
    } else if known.matches_last(KnownNameKind::InvalidPrefixes, maiden) {
        Some(IssueType::HasInvalidPrefixes)
    } else if maiden.chars().count() == 1 {
        Some(IssueType::IsTooShort)
    } else {
        None
    };
    if let Some(issue_type) = issue_type {
        ctx.register(field, issue_type);
        patient.mother_maiden_name.clear();
    }
}

fn validate_ids(patient: &mut Patient, ctx: &mut ValidationContext<'_>) {
    if ctx.not_empty(&patient.id_medicaid.number, Field::PatientMedicaidNumber) {
        patient.id_medicaid.number = validate_number(
            ctx,
            &patient.id_medicaid.number,
            Field::PatientMedicaidNumber,
            MEDICAID_LENGTH,
        );
    }
    ctx.not_empty(&patient.id_registry.number, Field::PatientRegistryId);
    if ctx.not_empty(&patient.id_ssn, Field::PatientSsn) {
        patient.id_ssn = validate_ssn(ctx, &patient.id_ssn);
    }
    let submitter = &patient.id_submitter;
    if ctx.not_empty(&submitter.number, Field::PatientSubmitterId) {
        ctx.not_empty(&submitter.assigning_authority, Field::PatientSubmitterIdAuthority);
        ctx.not_empty(&submitter.type_code, Field::PatientSubmitterIdTypeCode);
    }
}

fn validate_financial_eligibility(
    patient: &mut Patient,
    ctx: &mut ValidationContext<'_>,
) -> Result<()> {
    ctx.handle_code(&mut patient.financial_eligibility, Field::PatientVfcStatus)?;
    if let Some(effective) = patient.financial_eligibility_date {
        if patient
            .birth_date
            .is_some_and(|birth| effective.date() < birth.date())
        {
            ctx.register(Field::PatientVfcEffectiveDate, IssueType::IsBeforeBirth);
        }
        if ctx.received_date().date() < effective.date() {
            ctx.register(Field::PatientVfcEffectiveDate, IssueType::IsInFuture);
        }
    }
    Ok(())
}

fn validate_death(patient: &Patient, ctx: &mut ValidationContext<'_>) {
    if !ctx.not_empty(&patient.death_indicator, Field::PatientDeathIndicator) {
        return;
    }
    if patient.death_indicator == "Y" {
        if ctx.present(patient.death_date.as_ref(), Field::PatientDeathDate)
            && let Some(death) = patient.death_date
        {
            if patient
                .birth_date
                .is_some_and(|birth| death.date() < birth.date())
            {
                ctx.register(Field::PatientDeathDate, IssueType::IsBeforeBirth);
            }
            if ctx.received_date().date() < death.date() {
                ctx.register(Field::PatientDeathDate, IssueType::IsInFuture);
            }
        }
    } else if patient.death_date.is_some() {
        ctx.register(Field::PatientDeathIndicator, IssueType::IsInconsistent);
    }
}
