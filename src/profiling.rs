//! Dataset overview: per-column info and descriptive statistics.
//!
//! Like the rest of the crate this tolerates dirty data. Missing values are
//! counted, not rejected, and numeric summaries cover finite values only.
//!
//! # Example
//!
//! ```
//! use autostat::csv_parser::CsvParser;
//! use autostat::classify::classify_columns;
//! use autostat::profiling::{column_info, describe};
//!
//! let csv = "make,price\naudi,13950\nbmw,?\nvolvo,12940\nsaab,15040\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//!
//! let info = column_info(&df);
//! assert_eq!(info[1].null_count, 1);
//!
//! let classes = classify_columns(&df);
//! let summary = describe(&df, &classes.numeric).unwrap();
//! assert_eq!(summary[0].count, 3);
//! assert_eq!(summary[0].median, Some(13950.0));
//! ```

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::classify::{classify_column, ColumnKind};
use crate::dataframe::{Column, DataFrame, DataType};
use crate::error::Result;

// ── Column info ───────────────────────────────────────────────────────

/// Storage and completeness of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Storage kind.
    pub data_type: DataType,
    /// Analytical kind.
    pub kind: ColumnKind,
    /// Number of present values.
    pub non_null: usize,
    /// Number of missing values.
    pub null_count: usize,
}

/// Describes every column of `df`, in column order.
pub fn column_info(df: &DataFrame) -> Vec<ColumnInfo> {
    df.iter()
        .map(|(name, col)| ColumnInfo {
            name: name.to_string(),
            data_type: col.data_type(),
            kind: classify_column(col),
            non_null: col.valid_count(),
            null_count: col.null_count(),
        })
        .collect()
}

// ── Numeric summary ───────────────────────────────────────────────────

/// Descriptive statistics for one numeric column (finite values only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Column name.
    pub name: String,
    /// Number of present, finite values.
    pub count: usize,
    /// Number of present values left out for being NaN or ±∞.
    pub non_finite: usize,
    /// Arithmetic mean.
    pub mean: Option<f64>,
    /// Sample (n−1) standard deviation; `None` for fewer than 2 values.
    pub std: Option<f64>,
    /// Minimum value.
    pub min: Option<f64>,
    /// 25th percentile.
    pub q1: Option<f64>,
    /// 50th percentile.
    pub median: Option<f64>,
    /// 75th percentile.
    pub q3: Option<f64>,
    /// Maximum value.
    pub max: Option<f64>,
}

/// Summarizes each named column.
///
/// Quartiles interpolate linearly between order statistics. A column with
/// no finite values reports `count = 0` and `None` everywhere else.
///
/// Unlike pandas, ±∞ never reaches `mean`, `min` or `max`: every statistic
/// covers finite values only, and `non_finite` counts what was left out.
pub fn describe(df: &DataFrame, columns: &[String]) -> Result<Vec<NumericSummary>> {
    columns
        .iter()
        .map(|name| df.require_column(name).map(|col| summarize(name, col)))
        .collect()
}

fn summarize(name: &str, col: &Column) -> NumericSummary {
    let present: Vec<f64> = (0..col.len()).filter_map(|i| col.numeric_at(i)).collect();
    let mut values: Vec<f64> = present.iter().copied().filter(|v| v.is_finite()).collect();
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let quantile = |q: f64| (count > 0).then(|| sorted_quantile(&values, q));

    NumericSummary {
        name: name.to_string(),
        count,
        non_finite: present.len() - count,
        mean: (count > 0).then(|| values.iter().mean()),
        std: (count > 1).then(|| values.iter().std_dev()),
        min: values.first().copied(),
        q1: quantile(0.25),
        median: quantile(0.5),
        q3: quantile(0.75),
        max: values.last().copied(),
    }
}

/// Linear-interpolated quantile of non-empty, ascending `sorted`.
fn sorted_quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
