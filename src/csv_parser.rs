//! CSV loading with automatic type inference.
//!
//! Parses CSV text into a [`DataFrame`](crate::dataframe::DataFrame)
//! with column types inferred from content. The inference priority is:
//! Numeric → Categorical → Text.
//!
//! # Features
//!
//! - RFC 4180 record splitting via the `csv` crate (quoted fields,
//!   escaped quotes, delimiters inside quotes)
//! - Null markers recognized by default: empty, `NA`, `N/A`, `null`,
//!   `NULL`, `None`, `?`, `NaN`, `#N/A`
//! - `inf` / `-inf` load as numeric infinities, not as missing values
//! - Low-cardinality strings are dictionary-encoded as Categorical
//! - Columns with no present values load as Text
//!
//! # Example
//!
//! ```
//! use autostat::csv_parser::CsvParser;
//! use autostat::dataframe::DataType;
//!
//! let csv = "make,fuel-type,price\naudi,gas,13950\naudi,gas,?\nbmw,gas,16430\nbmw,gas,16925\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! assert_eq!(df.row_count(), 4);
//! assert_eq!(df.column(0).unwrap().data_type(), DataType::Text);
//! assert_eq!(df.column(1).unwrap().data_type(), DataType::Categorical);
//! assert_eq!(df.column(2).unwrap().data_type(), DataType::Numeric);
//! assert_eq!(df.column(2).unwrap().null_count(), 1);
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::dataframe::{Column, DataFrame, DataType};
use crate::error::{Result, StatsError};

/// Standard null value markers recognized during parsing.
const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", "?", "NaN", "nan", "NAN",
    "#N/A",
];

/// Maximum unique-value ratio for a column to be classified as Categorical
/// instead of Text.
const CATEGORICAL_THRESHOLD: f64 = 0.5;

/// Maximum dictionary size for categorical columns.
const MAX_CATEGORICAL_UNIQUE: usize = 1000;

/// CSV parser configuration and entry point.
///
/// ```
/// use autostat::csv_parser::CsvParser;
///
/// let tsv = "a\tb\n1\t2\n3\t4\n";
/// let df = CsvParser::new().delimiter(b'\t').parse_str(tsv).unwrap();
/// assert_eq!(df.column_names(), &["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
    has_header: bool,
    null_markers: Vec<String>,
}

impl CsvParser {
    /// Creates a parser with default settings (comma delimiter, header row, standard null markers).
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets whether the first row is a header (default: true).
    pub fn has_header(mut self, header: bool) -> Self {
        self.has_header = header;
        self
    }

    /// Sets custom null markers (replaces defaults).
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Parses a CSV string into a DataFrame.
    pub fn parse_str(&self, input: &str) -> Result<DataFrame> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        self.parse_reader(input.as_bytes())
    }

    /// Parses a CSV file from disk into a DataFrame.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!("loading CSV from {}", path.display());
        let mut content = String::new();
        BufReader::new(file).read_to_string(&mut content)?;
        self.parse_str(&content)
    }

    /// Parses CSV data from any reader into a DataFrame.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<DataFrame> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for record in rdr.records() {
            records.push(record.map_err(csv_error)?);
        }
        if records.is_empty() {
            return Ok(DataFrame::new());
        }

        let (headers, data_rows) = if self.has_header {
            let headers: Vec<String> = records[0].iter().map(|h| h.trim().to_string()).collect();
            (headers, &records[1..])
        } else {
            let n_cols = records[0].len();
            let headers: Vec<String> = (0..n_cols).map(|i| format!("col_{i}")).collect();
            (headers, &records[..])
        };

        let n_cols = headers.len();
        let n_rows = data_rows.len();

        // Transpose to column-major raw strings
        let mut raw_columns: Vec<Vec<&str>> = vec![Vec::with_capacity(n_rows); n_cols];
        for record in data_rows {
            if record.len() != n_cols {
                return Err(StatsError::CsvParse {
                    line: record.position().map_or(0, |p| p.line() as usize),
                    message: format!("expected {n_cols} fields, got {}", record.len()),
                });
            }
            for (col_idx, field) in record.iter().enumerate() {
                raw_columns[col_idx].push(field);
            }
        }

        let mut df = DataFrame::new();
        for (name, raw_col) in headers.into_iter().zip(raw_columns.iter()) {
            df.add_column(name, self.build_column(raw_col))?;
        }

        log::debug!(
            "parsed CSV: {} rows x {} columns, {} missing cells",
            df.row_count(),
            df.column_count(),
            df.total_null_count()
        );
        Ok(df)
    }

    // ── Internal ────────────────────────────────────────────────

    /// Checks if a trimmed value is a null marker.
    fn is_null(&self, value: &str) -> bool {
        self.null_markers.iter().any(|m| m == value)
    }

    /// Infers the column type and builds a typed Column.
    fn build_column(&self, raw_values: &[&str]) -> Column {
        let cells: Vec<Option<&str>> = raw_values
            .iter()
            .map(|s| s.trim())
            .map(|s| (!self.is_null(s)).then_some(s))
            .collect();

        let present: Vec<&str> = cells.iter().flatten().copied().collect();
        if present.is_empty() {
            return Column::text_from_options(&cells);
        }

        match infer_type(&present) {
            DataType::Numeric => Column::numeric_from_options(
                cells
                    .iter()
                    .map(|c| c.and_then(|s| s.parse::<f64>().ok()))
                    .collect(),
            ),
            DataType::Categorical => Column::categorical_from_options(&cells),
            DataType::Text => Column::text_from_options(&cells),
        }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Determines the most specific type that fits all present values.
fn infer_type(present: &[&str]) -> DataType {
    if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        return DataType::Numeric;
    }

    let unique: HashSet<&str> = present.iter().copied().collect();
    let ratio = unique.len() as f64 / present.len() as f64;
    if ratio < CATEGORICAL_THRESHOLD && unique.len() <= MAX_CATEGORICAL_UNIQUE {
        DataType::Categorical
    } else {
        DataType::Text
    }
}

fn csv_error(e: csv::Error) -> StatsError {
    if e.is_io_error() {
        return StatsError::Io(e.to_string());
    }
    StatsError::CsvParse {
        line: e.position().map_or(0, |p| p.line() as usize),
        message: e.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
