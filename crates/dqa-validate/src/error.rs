use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a validation pass.
///
/// Data-quality findings are never errors; they are registered as issues.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidateError {
    #[error("code store failed for profile {profile}: {message}")]
    Store { profile: u64, message: String },

    #[error("code cache lock poisoned for profile {profile}")]
    LockPoisoned { profile: u64 },

    #[error("field {field} has no code table")]
    UnmappedField { field: &'static str },

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, ValidateError>;
