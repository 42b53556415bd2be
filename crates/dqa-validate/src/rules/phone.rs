//! Telephone number rules (North American Numbering Plan).

use dqa_model::{Field, IssueType, PhoneNumber};

use crate::context::ValidationContext;
use crate::error::Result;

/// Fields a phone number's use and equipment codes are reported against.
#[derive(Debug, Clone, Copy)]
pub struct TelecomFields {
    pub tel_use: Field,
    pub tel_equip: Field,
}

/// NANP check for domestic numbers; other country codes are accepted.
pub fn is_valid_phone(phone: &PhoneNumber) -> bool {
    if !matches!(phone.country_code.as_str(), "" | "1" | "+1") {
        return true;
    }
    if !phone.area_code.is_empty() && !valid_exchange(&phone.area_code) {
        return false;
    }
    if !phone.local_number.is_empty() {
        let digits: String = phone
            .local_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.len() != 7 || !valid_exchange(&digits[..3]) || digits.get(1..3) == Some("11") {
            return false;
        }
    }
    true
}

/// Three digits, the first 2 through 9.
fn valid_exchange(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 3
        && (b'2'..=b'9').contains(&bytes[0])
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_digit()
}

/// Presence, completeness, telecom codes, then NANP validity.
pub fn validate_phone(
    ctx: &mut ValidationContext<'_>,
    phone: &mut PhoneNumber,
    field: Field,
    telecom: Option<TelecomFields>,
) -> Result<()> {
    if !ctx.not_empty(&phone.number, field) {
        return Ok(());
    }
    if phone.area_code.is_empty() || phone.local_number.is_empty() {
        ctx.register(field, IssueType::IsIncomplete);
    }
    if let Some(telecom) = telecom {
        ctx.handle_code(&mut phone.tel_use, telecom.tel_use)?;
        ctx.handle_code(&mut phone.tel_equip, telecom.tel_equip)?;
    }
    if !is_valid_phone(phone) {
        ctx.register(field, IssueType::IsInvalid);
    }
    Ok(())
}
