use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),
    #[error("invalid national number length: {0}")]
    InvalidNationalNumberLength(usize),
    #[error("invalid output format: {0}")]
    InvalidOutputFormat(String),
    #[error("column '{requested}' not found (available: {})", available.join(", "))]
    ColumnNotFound {
        requested: String,
        available: Vec<String>,
    },
}
