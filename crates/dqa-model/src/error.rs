use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("unknown code table: {0}")]
    UnknownCodeTable(String),
    #[error("unknown code status: {0}")]
    UnknownCodeStatus(String),
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),
    #[error("unknown potential issue: {0}")]
    UnknownIssue(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
