//! Next-of-kin (NK1) rules and responsible-party inference.

use dqa_model::message::{CHILD_RELATIONSHIPS, RESPONSIBLE_RELATIONSHIPS};
use dqa_model::{Address, Field, IssueType, Name, NextOfKin, Patient};

use crate::context::ValidationContext;
use crate::error::Result;
use crate::rules::{AddressFields, validate_address, validate_phone};

/// Validate one next-of-kin record at `index` of the message.
///
/// The first responsible party found for a minor is recorded on the patient
/// and its guardian details are checked.
pub(crate) fn validate_next_of_kin(
    next_of_kin: &mut NextOfKin,
    index: usize,
    patient: &mut Patient,
    ctx: &mut ValidationContext<'_>,
) -> Result<()> {
    if validate_address(ctx, &mut next_of_kin.address, &AddressFields::NEXT_OF_KIN)?
        && differs_from(&patient.address, &next_of_kin.address)
    {
        ctx.register(Field::NextOfKinAddress, IssueType::IsDifferentFromPatientAddress);
    }

    let under_aged = patient.is_under_aged();
    ctx.handle_code(&mut next_of_kin.relationship, Field::NextOfKinRelationship)?;
    let relationship = next_of_kin.relationship.code.as_str();
    let mut responsible = false;
    if under_aged && !relationship.is_empty() {
        if CHILD_RELATIONSHIPS.contains(&relationship) {
            ctx.register(Field::NextOfKinRelationship, IssueType::IsUnexpected);
        } else {
            responsible = RESPONSIBLE_RELATIONSHIPS.contains(&relationship);
        }
    }
    if under_aged && !responsible {
        ctx.register(Field::NextOfKinRelationship, IssueType::IsNotResponsibleParty);
    }

    let has_first = ctx.not_empty(&next_of_kin.name.first, Field::NextOfKinNameFirst);
    let has_last = ctx.not_empty(&next_of_kin.name.last, Field::NextOfKinNameLast);
    if !has_first && !has_last {
        ctx.register(Field::NextOfKinName, IssueType::IsMissing);
    }

    validate_phone(ctx, &mut next_of_kin.phone, Field::NextOfKinPhoneNumber, None)?;

    if responsible && (has_first || has_last) && patient.responsible_party.is_none() {
        patient.responsible_party = Some(index);
        validate_guardian(next_of_kin, &patient.name, ctx);
    }
    Ok(())
}

fn differs_from(patient: &Address, next_of_kin: &Address) -> bool {
    patient.city != next_of_kin.city
        || patient.state.code != next_of_kin.state.code
        || patient.street != next_of_kin.street
        || patient.street2 != next_of_kin.street2
}

fn validate_guardian(guardian: &NextOfKin, patient_name: &Name, ctx: &mut ValidationContext<'_>) {
    ctx.not_empty(&guardian.address.city, Field::PatientGuardianAddressCity);
    ctx.not_empty(&guardian.address.state.code, Field::PatientGuardianAddressState);
    ctx.not_empty(&guardian.address.zip, Field::PatientGuardianAddressZip);
    ctx.not_empty(&guardian.name.first, Field::PatientGuardianNameFirst);
    ctx.not_empty(&guardian.name.last, Field::PatientGuardianNameLast);

    let name = &guardian.name;
    if !patient_name.first.is_empty()
        && !patient_name.last.is_empty()
        && name.first == patient_name.first
        && name.last == patient_name.last
    {
        ctx.register(Field::PatientGuardianName, IssueType::IsSameAsUnderagePatient);
    }

    ctx.not_empty(&guardian.phone.number, Field::PatientGuardianPhone);
    ctx.not_empty(&guardian.relationship.code, Field::PatientGuardianRelationship);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_difference_compares_street2() {
        let patient = Address {
            street: "1 Main St".to_string(),
            street2: "Apt 2".to_string(),
            city: "Lansing".to_string(),
            ..Address::default()
        };
        let mut next_of_kin = patient.clone();
        assert!(!differs_from(&patient, &next_of_kin));
        next_of_kin.street2 = "Apt 3".to_string();
        assert!(differs_from(&patient, &next_of_kin));
    }
}
