use crate::error::{Result, StoreError};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Writes into a hidden temporary file next to the target and renames it into
/// place once `write` succeeds. On any error the temporary file is removed.
pub(crate) fn publish<F>(dir: &Path, file_name: &str, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let mut staged = tempfile::Builder::new()
        .prefix(".blocksieve-")
        .suffix(".partial")
        .tempfile_in(dir)?;
    write(staged.as_file_mut())?;
    staged.as_file().sync_all()?;

    let target = dir.join(file_name);
    staged
        .persist(&target)
        .map_err(|err| StoreError::Io(err.error))?;
    Ok(target)
}
