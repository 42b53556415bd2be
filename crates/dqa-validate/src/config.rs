//! Validator configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! underage_years = 18
//!
//! [administered_score]
//! threshold = 12
//!
//! [severity_overrides]
//! PatientSsnIsMissing = "accept"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dqa_model::SeverityOverrides;

use crate::error::{Result, ValidateError};

/// Weights of the administered-vs-historical plausibility score.
///
/// A vaccination scoring at or above `threshold` looks administered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdministeredScoring {
    pub recent_admin_date: i32,
    pub lot_number: i32,
    pub expiration_date: i32,
    pub manufacturer: i32,
    pub financial_eligibility: i32,
    pub body_route: i32,
    pub body_site: i32,
    pub amount: i32,
    pub facility: i32,
    pub given_by: i32,
    pub threshold: i32,
    /// Admin dates less than this many days before receipt count as recent.
    pub recent_window_days: i64,
}

impl Default for AdministeredScoring {
    fn default() -> Self {
        Self {
            recent_admin_date: 5,
            lot_number: 2,
            expiration_date: 2,
            manufacturer: 2,
            financial_eligibility: 2,
            body_route: 1,
            body_site: 1,
            amount: 3,
            facility: 4,
            given_by: 4,
            threshold: 10,
            recent_window_days: 31,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    pub administered_score: AdministeredScoring,
    /// Patients younger than this are minors.
    pub underage_years: u32,
    /// Patients older than this have a suspect birth date.
    pub very_old_years: u32,
    /// Clock skew tolerated before a message date counts as in the future.
    pub message_date_leeway_hours: i64,
    pub severity_overrides: SeverityOverrides,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            administered_score: AdministeredScoring::default(),
            underage_years: 18,
            very_old_years: 99,
            message_date_leeway_hours: 12,
            severity_overrides: SeverityOverrides::default(),
        }
    }
}

impl ValidatorOptions {
    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ValidateError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded validator options");
        Ok(options)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: Self = toml::from_str(content).map_err(|e| ValidateError::Config {
            message: e.to_string(),
        })?;
        for key in options.severity_overrides.unknown_keys() {
            warn!(key, "severity override does not name a potential issue");
        }
        Ok(options)
    }
}
