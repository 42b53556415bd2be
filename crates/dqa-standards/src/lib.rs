#![deny(unsafe_code)]

pub mod codes;
mod csv_utils;
pub mod error;
pub mod known_names;
pub mod loaders;
pub mod paths;
pub mod reference;
pub mod vaccines;

pub use crate::codes::{CodeMaster, MasterCode};
pub use crate::error::{Result, StandardsError};
pub use crate::known_names::KnownNames;
pub use crate::loaders::load_reference_data;
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
pub use crate::reference::ReferenceData;
pub use crate::vaccines::VaccineTables;
