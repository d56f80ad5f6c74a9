use crate::error::CoreError;
use std::borrow::Cow;

const BOM: char = '\u{feff}';

static EMPTY_CELL: Cell = Cell::Empty;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(value) => Cow::Borrowed(value),
            Cell::Number(value) => Cow::Owned(format_number(*value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

// Integral floats print without a fractional part so phone numbers read from
// spreadsheets survive as digits.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One input record. Cells are positional and line up with `Table::headers`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds a column by exact name, then ignoring BOM and surrounding
    /// whitespace, then case-insensitively.
    pub fn column_index(&self, requested: &str) -> Option<usize> {
        if let Some(index) = self.headers.iter().position(|name| name == requested) {
            return Some(index);
        }
        let wanted = clean_header(requested);
        if let Some(index) = self
            .headers
            .iter()
            .position(|name| clean_header(name) == wanted)
        {
            return Some(index);
        }
        self.headers
            .iter()
            .position(|name| clean_header(name).to_lowercase() == wanted.to_lowercase())
    }

    pub fn resolve_column(&self, requested: &str) -> Result<usize, CoreError> {
        self.column_index(requested)
            .ok_or_else(|| CoreError::ColumnNotFound {
                requested: requested.to_string(),
                available: self.headers.clone(),
            })
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        self.rows.iter().map(move |row| row.get(index).as_text())
    }
}

pub fn clean_header(name: &str) -> String {
    name.replace(BOM, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{clean_header, Cell, Row, Table};
    use crate::error::CoreError;

    fn table(headers: &[&str]) -> Table {
        Table::new(headers.iter().map(|h| h.to_string()).collect(), Vec::new())
    }

    #[test]
    fn column_lookup_prefers_exact_then_cleaned_then_case_insensitive() {
        let t = table(&["\u{feff}Telefon ", "phone", "Phone"]);
        assert_eq!(t.column_index("Phone"), Some(2));
        assert_eq!(t.column_index("Telefon"), Some(0));
        assert_eq!(t.column_index("TELEFON"), Some(0));
        assert_eq!(t.column_index("missing"), None);
    }

    #[test]
    fn resolve_column_reports_available_names() {
        let t = table(&["name", "tel"]);
        let err = t.resolve_column("phone").unwrap_err();
        assert_eq!(
            err,
            CoreError::ColumnNotFound {
                requested: "phone".to_string(),
                available: vec!["name".to_string(), "tel".to_string()],
            }
        );
        assert!(err.to_string().contains("name, tel"));
    }

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(Cell::Number(723456789.0).as_text(), "723456789");
        assert_eq!(Cell::Number(1.5).as_text(), "1.5");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn short_rows_read_as_empty() {
        let row = Row::new(vec![Cell::from("a")]);
        assert_eq!(row.get(3), &Cell::Empty);
    }

    #[test]
    fn clean_header_strips_bom_and_whitespace() {
        assert_eq!(clean_header("\u{feff} phone\t"), "phone");
    }
}
