use blocksieve_core::CoreError;
use blocksieve_source::SourceError;
use blocksieve_store::StoreError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("blocklist unavailable: {0}")]
    BlocklistUnavailable(#[source] SourceError),
    #[error("input unreadable: {0}")]
    InputUnreadable(#[source] StoreError),
    #[error("{0}")]
    ColumnNotFound(#[source] CoreError),
    #[error("write failure: {0}")]
    WriteFailure(#[source] StoreError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Stable classification reported to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BlocklistUnavailable,
    InputUnreadable,
    ColumnNotFound,
    WriteFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BlocklistUnavailable => "blocklist_unavailable",
            ErrorKind::InputUnreadable => "input_unreadable",
            ErrorKind::ColumnNotFound => "column_not_found",
            ErrorKind::WriteFailure => "write_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::BlocklistUnavailable(_) => ErrorKind::BlocklistUnavailable,
            PipelineError::InputUnreadable(_) => ErrorKind::InputUnreadable,
            PipelineError::ColumnNotFound(_) => ErrorKind::ColumnNotFound,
            PipelineError::WriteFailure(_) => ErrorKind::WriteFailure,
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(err: SourceError) -> Self {
        PipelineError::BlocklistUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, PipelineError};
    use blocksieve_source::SourceError;

    #[test]
    fn kinds_serialize_as_snake_case() {
        let err = PipelineError::from(SourceError::Parse("blocklist payload is empty".to_string()));
        assert_eq!(err.kind(), ErrorKind::BlocklistUnavailable);
        assert_eq!(
            err.to_string(),
            "blocklist unavailable: parse error: blocklist payload is empty"
        );
        assert_eq!(ErrorKind::WriteFailure.to_string(), "write_failure");
    }
}
