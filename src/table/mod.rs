//! In-memory CSV tables with the column statistics `analyze_csv` needs.

mod describe;

use std::io::Read;
use std::path::Path;

use thiserror::Error;

pub use describe::describe;

/// Failure to load a table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(#[from] csv::Error),

    #[error("No columns to parse from file")]
    NoColumns,

    #[error("Invalid CSV file (empty or no columns)")]
    Empty,
}

/// Failure to compute a column statistic.
#[derive(Error, Debug, PartialEq)]
pub enum ColumnError {
    #[error("Column not found")]
    NotFound,

    #[error("Column '{0}' has no numeric values")]
    NotNumeric(String),
}

/// A parsed CSV file: header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Read and validate a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse CSV from any reader. Requires at least one column and one data row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(TableError::NoColumns);
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        if rows.is_empty() {
            return Err(TableError::Empty);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn cells(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[idx].as_str())
    }

    /// Numeric view of a column, skipping missing cells.
    ///
    /// `None` when any present cell is not a number or every cell is missing.
    fn numeric_at(&self, idx: usize) -> Option<Vec<f64>> {
        let mut values = Vec::with_capacity(self.rows.len());
        for cell in self.cells(idx).map(str::trim) {
            if is_missing(cell) {
                continue;
            }
            values.push(parse_number(cell)?);
        }
        (!values.is_empty()).then_some(values)
    }

    /// Arithmetic mean of a numeric column.
    pub fn mean(&self, column: &str) -> Result<f64, ColumnError> {
        let idx = self.column_index(column).ok_or(ColumnError::NotFound)?;
        let values = self
            .numeric_at(idx)
            .ok_or_else(|| ColumnError::NotNumeric(column.to_string()))?;
        Ok(mean(&values))
    }
}

/// Cell spellings read as "no value", matched exactly after trimming.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a trimmed cell holds no value.
pub(crate) fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Shortest round-trip rendering; integral values keep a trailing `.0`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(src: &str) -> Table {
        Table::from_reader(src.as_bytes()).unwrap()
    }

    #[test]
    fn parses_headers_and_rows() {
        let t = table("Name,Age\nAlice,30\nBob,40\n");
        assert_eq!(t.headers(), &["Name".to_string(), "Age".to_string()]);
        assert_eq!(t.row_count(), 2);
        assert!(t.has_column("Age"));
        assert!(!t.has_column("age"));
    }

    #[test]
    fn mean_of_numeric_column() {
        let t = table("Name,Age\nAlice,30\nBob,40\nCarol,35\n");
        assert_eq!(t.mean("Age").unwrap(), 35.0);
    }

    #[test]
    fn mean_skips_blank_cells() {
        let t = table("Name,Score\nA,1\nB,\nC,2\n");
        assert_eq!(t.mean("Score").unwrap(), 1.5);
    }

    #[test]
    fn mean_skips_missing_markers() {
        let t = table("Name,Age\nA,30\nB,NA\nC,40\n");
        assert_eq!(t.mean("Age").unwrap(), 35.0);

        let t = table("x\n1\nnan\n2\nnull\n3\n N/A \n");
        assert_eq!(t.mean("x").unwrap(), 2.0);
    }

    #[test]
    fn all_missing_column_has_no_numeric_values() {
        let t = table("Name,Age\nA,NA\nB,\n");
        assert_eq!(t.mean("Age"), Err(ColumnError::NotNumeric("Age".into())));
    }

    #[test]
    fn mean_of_text_column_is_error() {
        let t = table("Name,Age\nAlice,30\n");
        assert_eq!(t.mean("Name"), Err(ColumnError::NotNumeric("Name".into())));
        assert_eq!(t.mean("Height"), Err(ColumnError::NotFound));
    }

    #[test]
    fn header_only_file_is_empty() {
        let err = Table::from_reader("a,b\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Empty));
    }

    #[test]
    fn blank_file_has_no_columns() {
        let err = Table::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::NoColumns));
    }

    #[test]
    fn ragged_rows_are_parse_errors() {
        let err = Table::from_reader("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }

    #[test]
    fn float_formatting_keeps_integral_suffix() {
        assert_eq!(format_float(35.0), "35.0");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(-4.0), "-4.0");
        assert_eq!(format_float(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(format_float(f64::NAN), "nan");
    }
}
