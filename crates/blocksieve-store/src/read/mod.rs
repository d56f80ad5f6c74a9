mod delimited;
mod workbook;

use crate::error::{Result, StoreError};
use blocksieve_core::Table;
use serde::Serialize;
use std::path::Path;

pub use delimited::{decode_text, TextEncoding};

/// How an input file was interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputInfo {
    pub format: &'static str,
    pub encoding: Option<&'static str>,
    pub delimiter: Option<char>,
    /// Rows dropped because they carried more fields than the header.
    pub skipped_rows: usize,
}

#[derive(Debug, Clone)]
pub struct InputTable {
    pub table: Table,
    pub info: InputInfo,
}

/// Reads a CSV or spreadsheet file into a table, choosing the reader by
/// extension.
pub fn read_table(path: &Path) -> Result<InputTable> {
    if !path.is_file() {
        return Err(StoreError::InputNotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" | "txt" => delimited::read_delimited(path),
        "xlsx" | "xlsm" | "xls" | "ods" => workbook::read_workbook(path),
        _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
    }
}
