use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("xml error: {0}")]
    Xml(String),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),
    #[error("cannot read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("too many rows for a single worksheet: {0}")]
    TooManyRows(usize),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Csv,
    Zip,
    Xml,
    MissingHomeDir,
    InvalidDataPath,
    UnsupportedFormat,
    InputNotFound,
    Unreadable,
    TooManyRows,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Csv(_) => StoreErrorKind::Csv,
            StoreError::Zip(_) => StoreErrorKind::Zip,
            StoreError::Xml(_) => StoreErrorKind::Xml,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::UnsupportedFormat(_) => StoreErrorKind::UnsupportedFormat,
            StoreError::InputNotFound(_) => StoreErrorKind::InputNotFound,
            StoreError::Unreadable { .. } => StoreErrorKind::Unreadable,
            StoreError::TooManyRows(_) => StoreErrorKind::TooManyRows,
        }
    }
}
