use std::fmt::Display;

use penman::error::EvaporationError;

#[derive(Debug)]
pub struct AppError {
    msg: String,
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError { msg }
    }
}

impl From<AppError> for String {
    fn from(value: AppError) -> String {
        value.msg
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError { msg: msg.into() }
    }
}

impl From<EvaporationError> for AppError {
    fn from(err: EvaporationError) -> Self {
        AppError {
            msg: err.to_string(),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl std::error::Error for AppError {}

/// true for the usual spellings of a boolean flag in text configuration files
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "True" | "TRUE" | "1")
}
