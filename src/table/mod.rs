//! # Tabular views
//!
//! A small column-oriented [`Table`] type used to present extraction results
//! and comparison statistics. Tables render as aligned text (`Display`), CSV
//! ([`Table::write_csv`]) or JSON (`Serialize`).

use std::fmt;
use std::io::Write;

use serde::Serialize;

mod format;


pub use format::{
    format, FormattedTables, CHANNEL_COLUMN, CYTOMETER_METRIC, DATE_METRIC, ERROR_COLUMN,
    EVENTS_METRIC, FILE_COLUMN, FLUOROPHORE_COLUMN, GENERAL_METRICS, METRIC_COLUMN,
    SAMPLE_METRIC, VALUE_COLUMN,
};

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Free text
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Missing value
    Empty,
}

impl Cell {
    /// Text cell
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of the cell. Text is parsed; floats must be integral.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Numeric view of the cell. Text is parsed; `NaN` and infinities are
    /// not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Self::Empty => None,
        }
    }

    /// True for [`Cell::Empty`]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Six decimals at most, trailing zeros trimmed
fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0');
    match text.strip_suffix('.') {
        Some(integral) => format!("{}.0", integral),
        None => text.to_string(),
    }
}

/// Named columns and rows of cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Panics if the row width does not match the column count.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row width must match the number of columns"
        );
        self.rows.push(row);
    }

    /// Append a column; existing rows get `cell`
    pub fn push_column(&mut self, name: impl Into<String>, cell: Cell) {
        self.columns.push(name.into());
        for row in &mut self.rows {
            row.push(cell.clone());
        }
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Cell at `row` in column `name`
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Copy of the table without the named columns
    pub fn without_columns(&self, names: &[&str]) -> Table {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.contains(&self.columns[i].as_str()))
            .collect();
        Table {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Pivot a key/value table into a single row: each key becomes a column.
    ///
    /// Returns `None` when either column is missing.
    pub fn transpose(&self, key_column: &str, value_column: &str) -> Option<Table> {
        let keys = self.column(key_column)?;
        let values = self.column(value_column)?;
        let mut out = Table::new(keys.iter().map(|k| k.to_string()));
        out.push_row(values.into_iter().cloned().collect());
        Some(out)
    }

    /// Stack tables vertically. Columns are the union in first-seen order;
    /// cells for columns a table lacks are [`Cell::Empty`].
    pub fn vstack<'a, I>(tables: I) -> Table
    where
        I: IntoIterator<Item = &'a Table>,
    {
        let tables: Vec<&Table> = tables.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut out = Table::new(columns.clone());
        for table in tables {
            for row in &table.rows {
                let cells = columns
                    .iter()
                    .map(|c| match table.column_index(c) {
                        Some(i) => row[i].clone(),
                        None => Cell::Empty,
                    })
                    .collect();
                out.push_row(cells);
            }
        }
        out
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|c| c.to_string()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &rendered {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let write_line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width - cell.chars().count();
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())
        };

        write_line(f, &self.columns)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("  "))?;
        for row in &rendered {
            write_line(f, row)?;
        }
        Ok(())
    }
}
