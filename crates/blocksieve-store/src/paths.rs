use crate::error::{Result, StoreError};
use blocksieve_core::{JobId, OutputFormat};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "blocksieve";
const ARTIFACTS_DIR: &str = "artifacts";
const PROCESSED_SUFFIX: &str = "_processed";

pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_DATA_HOME") {
        let path = PathBuf::from(dir);
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidDataPath(path));
        }
        return Ok(path.join(APP_DIR));
    }

    let home = dirs::home_dir().ok_or(StoreError::MissingHomeDir)?;
    Ok(home.join(".local").join("share").join(APP_DIR))
}

/// Staging directory for artifacts, created on demand.
pub fn resolve_artifacts_dir(custom: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match custom {
        Some(path) if path.as_os_str().is_empty() => {
            return Err(StoreError::InvalidDataPath(path));
        }
        Some(path) => path,
        None => data_dir()?.join(ARTIFACTS_DIR),
    };
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// `<id>_processed.csv` / `<id>_processed.xlsx`
pub fn single_file_name(id: &JobId, format: OutputFormat) -> String {
    format!("{id}{PROCESSED_SUFFIX}.{}", format.extension())
}

/// `<id>_csv.zip` / `<id>_xlsx.zip`
pub fn archive_file_name(id: &JobId, format: OutputFormat) -> String {
    format!("{id}_{}.zip", format.extension())
}

/// `<id>_processed_part3.csv`, numbered from 1.
pub fn part_file_name(id: &JobId, format: OutputFormat, part: usize) -> String {
    format!("{id}{PROCESSED_SUFFIX}_part{part}.{}", format.extension())
}

/// Finds a previously written artifact. A spreadsheet request falls back to
/// the text artifact when only that one exists.
pub fn locate_artifact(dir: &Path, id: &JobId, preferred: OutputFormat) -> Option<PathBuf> {
    let mut formats = vec![preferred];
    if preferred == OutputFormat::Xlsx {
        formats.push(OutputFormat::Csv);
    }
    formats
        .into_iter()
        .flat_map(|format| [single_file_name(id, format), archive_file_name(id, format)])
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
