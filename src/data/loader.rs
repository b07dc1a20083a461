use super::{is_missing, ColumnValues, DataError, Dataset, Result, DATE};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct DataLoader;

impl DataLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Dataset> {
        Self::from_reader(bytes)
    }

    /// Parses delimited text into a dataset. Short records are padded with
    /// missing cells, long records are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DataError::NoColumns);
        }
        let headers = Self::dedupe_headers(headers);

        let n_cols = headers.len();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); n_cols];
        let mut n_rows = 0;

        for result in rdr.records() {
            let record = result?;
            if record.len() > n_cols {
                return Err(DataError::FieldCount {
                    line: record.position().map_or(0, |p| p.line()),
                    expected: n_cols,
                    found: record.len(),
                });
            }
            for (i, column) in cells.iter_mut().enumerate() {
                column.push(record.get(i).unwrap_or_default().to_string());
            }
            n_rows += 1;
        }

        Ok(Dataset::from_raw(headers, cells, n_rows))
    }

    /// Converts the `Date` column in place. Any present value that matches
    /// none of `formats` fails the whole column and leaves the dataset as it was.
    pub fn convert_dates(dataset: &mut Dataset, formats: &[String]) -> Result<()> {
        let Some(column) = dataset.column(DATE) else {
            return Ok(());
        };

        let mut dates = Vec::with_capacity(column.raw().len());
        for (row, value) in column.raw().iter().enumerate() {
            if is_missing(value) {
                dates.push(None);
                continue;
            }
            match parse_date(value, formats) {
                Some(date) => dates.push(Some(date)),
                None => {
                    return Err(DataError::DateParse {
                        column: DATE.to_string(),
                        row,
                        value: value.clone(),
                    })
                }
            }
        }

        dataset.set_values(DATE, ColumnValues::Date(dates));
        Ok(())
    }

    /// Repeated header names get `.1`, `.2`, ... suffixes
    fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        headers
            .into_iter()
            .map(|name| {
                let count = seen.entry(name.clone()).or_insert(0);
                let unique = if *count == 0 {
                    name
                } else {
                    format!("{}.{}", name, count)
                };
                *count += 1;
                unique
            })
            .collect()
    }
}

/// Helper function to parse a single date cell
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}
