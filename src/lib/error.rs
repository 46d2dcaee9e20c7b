use thiserror::Error;

/// Failures of a single evaporation computation.
/// Every variant reaches the caller of the day being processed, nothing is recovered internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaporationError {
    #[error("invalid date '{0}', expected format YYYY-MM-DD")]
    Format(String),
    #[error("invalid {name} '{value}'. Valid options: {options}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        options: String,
    },
    #[error("numeric domain error: {0}")]
    NumericDomain(String),
}

pub type Result<T> = std::result::Result<T, EvaporationError>;
