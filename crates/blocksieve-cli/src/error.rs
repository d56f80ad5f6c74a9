use anyhow::Error;
use blocksieve_config::ConfigError;
use blocksieve_core::CoreError;
use blocksieve_pipeline::{ErrorKind, PipelineError};
use blocksieve_store::{StoreError, StoreErrorKind};
use serde_json::json;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_BLOCKLIST_UNAVAILABLE: u8 = 4;
pub const EXIT_INPUT_UNREADABLE: u8 = 5;
pub const EXIT_WRITE_FAILURE: u8 = 6;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

/// One machine-readable line on stdout for callers driving `--json`.
pub fn report_error_json(err: &Error) {
    let line = json!({
        "error": {
            "kind": error_kind_for(err),
            "message": format!("{:#}", err),
        }
    });
    println!("{line}");
}

pub fn error_kind_for(err: &Error) -> &'static str {
    for cause in err.chain() {
        if let Some(pipeline_err) = cause.downcast_ref::<PipelineError>() {
            return pipeline_err.kind().as_str();
        }
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => "invalid_input",
                CliError::NotFound(_) => "not_found",
            };
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return match store_exit_code(store_err) {
                EXIT_INPUT_UNREADABLE => ErrorKind::InputUnreadable.as_str(),
                EXIT_WRITE_FAILURE => ErrorKind::WriteFailure.as_str(),
                EXIT_INVALID_INPUT => "invalid_input",
                _ => "failure",
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return "invalid_config";
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return "invalid_input";
        }
    }
    "failure"
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(pipeline_err) = cause.downcast_ref::<PipelineError>() {
            return ExitCode::from(pipeline_exit_code(pipeline_err));
        }
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn pipeline_exit_code(err: &PipelineError) -> u8 {
    match err.kind() {
        ErrorKind::BlocklistUnavailable => EXIT_BLOCKLIST_UNAVAILABLE,
        ErrorKind::InputUnreadable => EXIT_INPUT_UNREADABLE,
        ErrorKind::ColumnNotFound => EXIT_INVALID_INPUT,
        ErrorKind::WriteFailure => EXIT_WRITE_FAILURE,
    }
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::InputNotFound
        | StoreErrorKind::UnsupportedFormat
        | StoreErrorKind::Unreadable => EXIT_INPUT_UNREADABLE,
        StoreErrorKind::Io
        | StoreErrorKind::Csv
        | StoreErrorKind::Zip
        | StoreErrorKind::Xml
        | StoreErrorKind::TooManyRows => EXIT_WRITE_FAILURE,
        StoreErrorKind::InvalidDataPath => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidBlocklistUrl(_)
        | ConfigError::InvalidTimeout(_)
        | ConfigError::InvalidPhone(_)
        | ConfigError::InvalidMaxRowsPerPart(_)
        | ConfigError::InvalidOutputDir(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
