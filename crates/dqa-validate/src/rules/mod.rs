//! Field-level rules shared across record validators.

pub mod address;
pub mod dates;
pub mod ids;
pub mod names;
pub mod phone;

pub use address::{AddressFields, is_valid_zip, validate_address};
pub use dates::{Hl7Date, create_date, parse_hl7_date};
pub use ids::{is_valid_number, is_valid_ssn, validate_number, validate_ssn};
pub use names::{canonical_suffix, normalize_name, valid_name_chars};
pub use phone::{TelecomFields, is_valid_phone, validate_phone};
