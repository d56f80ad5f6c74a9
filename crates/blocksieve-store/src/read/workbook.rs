use super::{InputInfo, InputTable};
use crate::error::{Result, StoreError};
use blocksieve_core::{clean_header, Cell, Row, Table};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

/// Reads the first worksheet; the first row is the header.
pub(super) fn read_workbook(path: &Path) -> Result<InputTable> {
    let unreadable = |reason: String| StoreError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|err| unreadable(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("workbook has no worksheets".to_string()))?
        .map_err(|err| unreadable(err.to_string()))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| unreadable("worksheet is empty".to_string()))?
        .iter()
        .map(|cell| clean_header(&to_cell(cell).as_text()))
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(unreadable("missing header row".to_string()));
    }

    let width = headers.len();
    let mut rows = Vec::with_capacity(range.height().saturating_sub(1));
    for raw in rows_iter {
        let mut cells: Vec<Cell> = raw.iter().take(width).map(to_cell).collect();
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        cells.resize(width, Cell::Empty);
        rows.push(Row::new(cells));
    }

    debug!(rows = rows.len(), columns = width, "parsed workbook input");
    Ok(InputTable {
        table: Table::new(headers, rows),
        info: InputInfo {
            format: "workbook",
            encoding: None,
            delimiter: None,
            skipped_rows: 0,
        },
    })
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(value) => Cell::from(value.as_str()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        other => Cell::Text(other.to_string()),
    }
}
