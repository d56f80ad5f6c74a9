mod archive;
mod delimited;
mod staging;
mod xlsx;

use crate::error::{Result, StoreError};
use crate::paths;
use blocksieve_core::{Cell, JobId, OutputFormat, PhoneValue, Table};
use serde::Serialize;
use std::borrow::Cow;
use std::ops::Range;
use std::path::PathBuf;
use tracing::debug;

pub use xlsx::MAX_SHEET_ROWS;

/// The rows selected for output, in the order they are written.
///
/// `phones` is indexed like `table.rows`; `rows` holds indices into both.
#[derive(Debug, Clone, Copy)]
pub struct OutputView<'a> {
    pub table: &'a Table,
    pub phone_column: usize,
    pub phones: &'a [PhoneValue],
    pub rows: &'a [usize],
    pub strip_plus: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum OutCell<'a> {
    Phone(&'a str),
    Value(&'a Cell),
}

impl<'a> OutCell<'a> {
    pub(crate) fn text(self) -> Cow<'a, str> {
        match self {
            OutCell::Phone(value) => Cow::Borrowed(value),
            OutCell::Value(cell) => cell.as_text(),
        }
    }
}

impl<'a> OutputView<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn headers(&self) -> &'a [String] {
        &self.table.headers
    }

    /// Cells of the `position`-th output row with the phone column replaced.
    pub(crate) fn cells(&self, position: usize) -> impl Iterator<Item = OutCell<'a>> + 'a {
        let table = self.table;
        let index = self.rows[position];
        let row = &table.rows[index];
        let phone = self.phones[index].output_value(self.strip_plus);
        let phone_column = self.phone_column;
        (0..table.headers.len()).map(move |column| {
            if column == phone_column {
                OutCell::Phone(phone)
            } else {
                OutCell::Value(row.get(column))
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub id: JobId,
    pub format: OutputFormat,
    pub file_name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub parts: usize,
    pub archived: bool,
}

#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    max_rows_per_part: usize,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>, max_rows_per_part: usize) -> Self {
        Self {
            dir: dir.into(),
            max_rows_per_part: max_rows_per_part.max(1),
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Writes the view as one file, or as an archive of parts when
    /// `split_files` is set and the rows exceed the part limit. The artifact
    /// only appears under its final name once it is complete.
    pub fn write(
        &self,
        id: &JobId,
        view: &OutputView<'_>,
        format: OutputFormat,
        split_files: bool,
    ) -> Result<Artifact> {
        let total = view.len();

        if split_files && total > self.max_rows_per_part {
            let ranges = chunk_ranges(total, self.max_rows_per_part);
            let file_name = paths::archive_file_name(id, format);
            let path = staging::publish(&self.dir, &file_name, |file| {
                archive::write_archive(file, id, view, format, &ranges)
            })?;
            debug!(parts = ranges.len(), rows = total, file = %file_name, "archive written");
            return Ok(Artifact {
                id: *id,
                format,
                file_name,
                path,
                rows: total,
                parts: ranges.len(),
                archived: true,
            });
        }

        if format == OutputFormat::Xlsx && total >= MAX_SHEET_ROWS {
            return Err(StoreError::TooManyRows(total));
        }
        let file_name = paths::single_file_name(id, format);
        let path = staging::publish(&self.dir, &file_name, |file| match format {
            OutputFormat::Csv => delimited::write_csv(file, view, 0..total),
            OutputFormat::Xlsx => xlsx::write_xlsx(file, view, 0..total),
        })?;
        debug!(rows = total, file = %file_name, "file written");
        Ok(Artifact {
            id: *id,
            format,
            file_name,
            path,
            rows: total,
            parts: 1,
            archived: false,
        })
    }
}

pub(crate) fn chunk_ranges(total: usize, size: usize) -> Vec<Range<usize>> {
    (0..total)
        .step_by(size)
        .map(|start| start..(start + size).min(total))
        .collect()
}
