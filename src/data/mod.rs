pub mod loader;

use chrono::{Datelike, NaiveDate};
use ndarray::Array1;
use thiserror::Error;

pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const ADJ_CLOSE: &str = "Adj Close";
pub const VOLUME: &str = "Volume";
pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";

/// Cell text read as a missing value, in addition to the empty cell
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_TOKENS.contains(&cell)
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV parse error: no columns to parse from file")]
    NoColumns,
    #[error("CSV parse error: expected {expected} fields in line {line}, saw {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Date parse error: could not parse {value:?} in column '{column}' (row {row})")]
    DateParse {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<f64>), // NaN marks a missing cell
    Integer(Vec<Option<i32>>),
    Date(Vec<Option<NaiveDate>>),
    Text(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Integer(v) => v.len(),
            ColumnValues::Date(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
    pub derived: bool,
    raw: Vec<String>, // cell text as uploaded, empty for derived columns
}

impl Column {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.values,
            ColumnValues::Numeric(_) | ColumnValues::Integer(_)
        )
    }

    /// Numeric view of the column, missing cells become NaN
    pub fn to_array(&self) -> Option<Array1<f64>> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(Array1::from(v.clone())),
            ColumnValues::Integer(v) => Some(
                v.iter()
                    .map(|x| x.map(f64::from).unwrap_or(f64::NAN))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub(crate) fn raw(&self) -> &[String] {
        &self.raw
    }

    pub fn raw_text(&self, row: usize) -> String {
        if let Some(cell) = self.raw.get(row) {
            return cell.clone();
        }
        match &self.values {
            ColumnValues::Integer(v) => v
                .get(row)
                .and_then(|x| x.map(|x| x.to_string()))
                .unwrap_or_default(),
            ColumnValues::Numeric(v) => v
                .get(row)
                .filter(|x| !x.is_nan())
                .map(|x| x.to_string())
                .unwrap_or_default(),
            ColumnValues::Date(v) => v
                .get(row)
                .and_then(|d| d.map(|d| d.to_string()))
                .unwrap_or_default(),
            ColumnValues::Text(v) => v.get(row).cloned().unwrap_or_default(),
        }
    }
}

/// In-memory table built from one uploaded CSV, stored column-wise
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Builds a dataset from header names and raw cell text. Each column is
    /// typed numeric when every present cell parses as a float; a column with
    /// rows but no present cells is numeric too.
    pub fn from_raw(headers: Vec<String>, cells: Vec<Vec<String>>, n_rows: usize) -> Self {
        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| Column {
                name,
                values: infer_values(&raw),
                derived: false,
                raw,
            })
            .collect();
        Self { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn has_numeric(&self, name: &str) -> bool {
        self.column(name).is_some_and(Column::is_numeric)
    }

    pub fn numeric(&self, name: &str) -> Option<Array1<f64>> {
        self.column(name).and_then(Column::to_array)
    }

    pub fn dates(&self, name: &str) -> Option<&[Option<NaiveDate>]> {
        match &self.column(name)?.values {
            ColumnValues::Date(v) => Some(v),
            _ => None,
        }
    }

    pub fn integers(&self, name: &str) -> Option<&[Option<i32>]> {
        match &self.column(name)?.values {
            ColumnValues::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric columns in table order; derived columns only when asked for
    pub fn numeric_columns(&self, include_derived: bool) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric() && (include_derived || !c.derived))
            .collect()
    }

    /// First `n` rows as uploaded
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        (0..self.n_rows.min(n))
            .map(|row| self.columns.iter().map(|c| c.raw_text(row)).collect())
            .collect()
    }

    pub(crate) fn set_values(&mut self, name: &str, values: ColumnValues) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.name == name) {
            column.values = values;
        }
    }

    /// Appends `Year` and `Month` computed from the `Date` column. Does nothing
    /// when `Date` has not been converted.
    pub fn derive_calendar_columns(&mut self) {
        let Some(dates) = self.dates(DATE) else {
            return;
        };
        let years: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.year())).collect();
        let months: Vec<Option<i32>> = dates
            .iter()
            .map(|d| d.map(|d| d.month() as i32))
            .collect();

        self.push_derived(YEAR, years);
        self.push_derived(MONTH, months);
    }

    fn push_derived(&mut self, name: &str, values: Vec<Option<i32>>) {
        let column = Column {
            name: name.to_string(),
            values: ColumnValues::Integer(values),
            derived: true,
            raw: Vec::new(),
        };
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }
}

fn infer_values(raw: &[String]) -> ColumnValues {
    if raw.is_empty() {
        return ColumnValues::Text(Vec::new());
    }
    let mut numbers = Vec::with_capacity(raw.len());
    for cell in raw {
        if is_missing(cell) {
            numbers.push(f64::NAN);
            continue;
        }
        match cell.parse::<f64>() {
            Ok(x) => numbers.push(x),
            Err(_) => return ColumnValues::Text(raw.to_vec()),
        }
    }
    ColumnValues::Numeric(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_typing() {
        let dataset = Dataset::from_raw(
            strings(&["Close", "Ticker", "Empty"]),
            vec![
                strings(&["1.5", "", "2"]),
                strings(&["TSLA", "TSLA", "TSLA"]),
                strings(&["", "", ""]),
            ],
            3,
        );

        assert!(dataset.has_numeric("Close"));
        assert!(!dataset.has_numeric("Ticker"));
        assert!(dataset.has_numeric("Empty"));
        assert!(dataset.numeric("Empty").unwrap().iter().all(|x| x.is_nan()));

        let close = dataset.numeric("Close").unwrap();
        assert_eq!(close[0], 1.5);
        assert!(close[1].is_nan());
        assert_eq!(close[2], 2.0);
    }

    #[test]
    fn test_missing_tokens() {
        let dataset = Dataset::from_raw(
            strings(&["Close", "Volume", "Ticker"]),
            vec![
                strings(&["1", "null", "NA"]),
                strings(&["N/A", "#N/A", "<NA>"]),
                strings(&["TSLA", "null", "TSLA"]),
            ],
            3,
        );

        let close = dataset.numeric("Close").unwrap();
        assert_eq!(close[0], 1.0);
        assert!(close[1].is_nan() && close[2].is_nan());
        assert!(dataset.has_numeric("Volume"));
        assert!(!dataset.has_numeric("Ticker"));
        // preview keeps the uploaded text
        assert_eq!(dataset.head(2)[1], strings(&["null", "#N/A", "null"]));
        assert!(!is_missing("0"));
        assert!(!is_missing("Null"));
    }

    #[test]
    fn test_headers_only_columns_are_text() {
        let dataset = Dataset::from_raw(strings(&["Close"]), vec![Vec::new()], 0);
        assert!(!dataset.has_numeric("Close"));
    }

    #[test]
    fn test_derive_calendar_columns() {
        let mut dataset = Dataset::from_raw(
            strings(&["Date"]),
            vec![strings(&["2020-03-15", ""])],
            2,
        );
        dataset.set_values(
            DATE,
            ColumnValues::Date(vec![NaiveDate::from_ymd_opt(2020, 3, 15), None]),
        );
        dataset.derive_calendar_columns();

        assert_eq!(dataset.integers(YEAR).unwrap(), &[Some(2020), None]);
        assert_eq!(dataset.integers(MONTH).unwrap(), &[Some(3), None]);
        assert!(dataset.column(YEAR).unwrap().derived);
        assert_eq!(dataset.numeric_columns(false).len(), 0);
        assert_eq!(dataset.numeric_columns(true).len(), 2);
        // preview keeps the uploaded text
        assert_eq!(dataset.head(5)[0], strings(&["2020-03-15", "2020", "3"]));
    }

    #[test]
    fn test_no_derived_columns_without_date() {
        let mut dataset = Dataset::from_raw(strings(&["Close"]), vec![strings(&["1"])], 1);
        dataset.derive_calendar_columns();
        assert!(!dataset.has_column(YEAR));
        assert!(!dataset.has_column(MONTH));
    }
}
