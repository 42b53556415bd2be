//! Postal address rules shared by the patient and next-of-kin records.

use std::sync::LazyLock;

use regex::Regex;

use dqa_model::{Address, CodeContext, CodeTable, Field, IssueType};

use crate::context::ValidationContext;
use crate::error::Result;

static ZIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("Invalid ZIP regex"));

const DEFAULT_COUNTRY: &str = "USA";

/// The fields an address's issues are reported against.
#[derive(Debug, Clone, Copy)]
pub struct AddressFields {
    pub address: Field,
    pub city: Field,
    pub country: Field,
    pub county: Field,
    pub state: Field,
    pub street: Field,
    pub street2: Field,
    pub zip: Field,
    pub type_code: Field,
}

impl AddressFields {
    pub const PATIENT: Self = Self {
        address: Field::PatientAddress,
        city: Field::PatientAddressCity,
        country: Field::PatientAddressCountry,
        county: Field::PatientAddressCounty,
        state: Field::PatientAddressState,
        street: Field::PatientAddressStreet,
        street2: Field::PatientAddressStreet2,
        zip: Field::PatientAddressZip,
        type_code: Field::PatientAddressType,
    };

    pub const NEXT_OF_KIN: Self = Self {
        address: Field::NextOfKinAddress,
        city: Field::NextOfKinAddressCity,
        country: Field::NextOfKinAddressCountry,
        county: Field::NextOfKinAddressCounty,
        state: Field::NextOfKinAddressState,
        street: Field::NextOfKinAddressStreet,
        street2: Field::NextOfKinAddressStreet2,
        zip: Field::NextOfKinAddressZip,
        type_code: Field::NextOfKinAddressType,
    };
}

/// `12345` or `12345-6789`.
pub fn is_valid_zip(zip: &str) -> bool {
    ZIP_REGEX.is_match(zip)
}

fn is_placeholder_city(city: &str) -> bool {
    city.eq_ignore_ascii_case("ANYTOWN") || city.chars().count() <= 1
}

/// Validate an address in place.
///
/// Returns false when street, city, ZIP or state is missing; the address is
/// then reported missing as a whole and its type is not checked.
pub fn validate_address(
    ctx: &mut ValidationContext<'_>,
    address: &mut Address,
    fields: &AddressFields,
) -> Result<bool> {
    if ctx.not_empty(&address.city, fields.city) && is_placeholder_city(&address.city) {
        ctx.register(fields.city, IssueType::IsInvalid);
    }

    let state = address.state.code.to_uppercase();
    if state == "US" {
        address.state.code.clear();
        address.country.code = DEFAULT_COUNTRY.to_string();
    } else if matches!(state.as_str(), "MX" | "MEX" | "MEXICO") {
        address.country.code = address.state.code.clone();
    }

    ctx.handle_code(&mut address.country, fields.country)?;
    let country_value = address
        .country
        .resolved
        .as_ref()
        .map(|code| code.code_value.as_str())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_COUNTRY);
    let country_context = CodeContext::new(CodeTable::AddressCountry, country_value);
    ctx.handle_code_with(&mut address.state, fields.state, true, Some(&country_context))?;
    let state_context = address.state.resolved.as_ref().map(|code| code.as_context());
    ctx.handle_code_with(
        &mut address.county_parish,
        fields.county,
        true,
        state_context.as_ref(),
    )?;

    ctx.not_empty(&address.street, fields.street);
    ctx.not_empty(&address.street2, fields.street2);

    if ctx.not_empty(&address.zip, fields.zip) {
        let domestic = address.country.is_empty() || country_value == DEFAULT_COUNTRY;
        if domestic && !is_valid_zip(&address.zip) {
            ctx.register(fields.zip, IssueType::IsInvalid);
        }
    }

    if address.street.is_empty()
        || address.city.is_empty()
        || address.zip.is_empty()
        || address.state.is_empty()
    {
        ctx.register(fields.address, IssueType::IsMissing);
        return Ok(false);
    }
    ctx.not_empty(&address.type_code, fields.type_code);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_formats() {
        assert!(is_valid_zip("49503"));
        assert!(is_valid_zip("49503-1234"));
        assert!(!is_valid_zip("4950"));
        assert!(!is_valid_zip("49503-12"));
        assert!(!is_valid_zip("4950A"));
        assert!(!is_valid_zip("495031234"));
    }

    #[test]
    fn placeholder_cities() {
        assert!(is_placeholder_city("Anytown"));
        assert!(is_placeholder_city("X"));
        assert!(!is_placeholder_city("Lansing"));
    }
}
