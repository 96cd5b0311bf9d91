//! Grouped aggregation and value counts.
//!
//! [`group_aggregate`] splits a frame by the distinct values of one column
//! and reports the mean, count and sample standard deviation of each
//! numeric column per group. Statistics are computed at full precision and
//! rounded only when written to the result.
//!
//! Degenerate groups never fail the call: a column with no usable values
//! in a group reports `mean = None`, and groups with fewer than two usable
//! values report `std = None`.
//!
//! ```
//! use autostat::csv_parser::CsvParser;
//! use autostat::grouping::{group_aggregate, AggregateConfig};
//!
//! let csv = "drive-wheels,price\nrwd,13495\nrwd,16500\nfwd,13950\nfwd,17450\n4wd,17450\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! let agg = group_aggregate(&df, "drive-wheels", &["price".to_string()], &AggregateConfig::default())
//!     .unwrap();
//!
//! assert_eq!(agg.groups.len(), 3);
//! let rwd = agg.group("rwd").unwrap().column("price").unwrap();
//! assert_eq!(rwd.mean, Some(14997.5));
//! assert_eq!(rwd.count, 2);
//! assert!(agg.group("4wd").unwrap().column("price").unwrap().std.is_none());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::dataframe::{Column, DataFrame};
use crate::error::Result;

// ── Grouped statistics ────────────────────────────────────────────────

/// Configuration for grouped aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Decimal places kept in reported statistics. Default: 2.
    pub precision: u32,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

/// Statistics of one numeric column within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAggregate {
    /// Numeric column name.
    pub column: String,
    /// Number of present, finite values in the group.
    pub count: usize,
    /// Mean, or `None` when `count == 0`.
    pub mean: Option<f64>,
    /// Sample (n−1) standard deviation, or `None` when `count < 2`.
    pub std: Option<f64>,
}

/// All statistics for one distinct value of the grouping column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Group value as displayed.
    pub key: String,
    /// Number of rows carrying this group value.
    pub row_count: usize,
    /// One entry per aggregated numeric column, in request order.
    pub columns: Vec<ColumnAggregate>,
}

impl GroupStats {
    /// Looks up the aggregate for `column`.
    pub fn column(&self, column: &str) -> Option<&ColumnAggregate> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Per-group statistics for a grouping column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    /// Grouping column name.
    pub group_by: String,
    /// Groups in order of first appearance.
    pub groups: Vec<GroupStats>,
}

impl GroupAggregate {
    /// Looks up the group with display value `key`.
    pub fn group(&self, key: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Total rows across all groups (= present values in the grouping column).
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|g| g.row_count).sum()
    }
}

/// Groups `df` by `group_by` and aggregates each column in `numeric`.
///
/// Rows with a missing group value are left out. If `group_by` itself is
/// listed in `numeric` it is skipped.
pub fn group_aggregate(
    df: &DataFrame,
    group_by: &str,
    numeric: &[String],
    config: &AggregateConfig,
) -> Result<GroupAggregate> {
    let key_col = df.require_column(group_by)?;
    let targets: Vec<(&str, &Column)> = numeric
        .iter()
        .filter(|name| name.as_str() != group_by)
        .map(|name| df.require_column(name).map(|c| (name.as_str(), c)))
        .collect::<Result<_>>()?;

    let buckets = partition_rows(key_col);

    let groups: Vec<GroupStats> = buckets
        .into_iter()
        .map(|(key, rows)| GroupStats {
            key,
            row_count: rows.len(),
            columns: targets
                .iter()
                .map(|&(name, col)| aggregate_column(name, col, &rows, config.precision))
                .collect(),
        })
        .collect();

    log::debug!(
        "grouped {} rows by '{group_by}' into {} groups over {} numeric columns",
        df.row_count(),
        groups.len(),
        targets.len()
    );

    Ok(GroupAggregate {
        group_by: group_by.to_string(),
        groups,
    })
}

/// Row indices per distinct present value, in first-seen order.
fn partition_rows(col: &Column) -> Vec<(String, Vec<usize>)> {
    let mut buckets: Vec<(String, Vec<usize>)> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();
    for i in 0..col.len() {
        let Some(key) = col.display_at(i) else {
            continue;
        };
        match position.get(&key) {
            Some(&b) => buckets[b].1.push(i),
            None => {
                position.insert(key.clone(), buckets.len());
                buckets.push((key, vec![i]));
            }
        }
    }
    buckets
}

fn aggregate_column(name: &str, col: &Column, rows: &[usize], precision: u32) -> ColumnAggregate {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|&i| col.numeric_at(i))
        .filter(|v| v.is_finite())
        .collect();

    let count = values.len();
    let mean = (count > 0).then(|| values.iter().mean());
    let std = (count > 1).then(|| values.iter().std_dev());

    ColumnAggregate {
        column: name.to_string(),
        count,
        mean: mean.map(|m| round_to(m, precision)),
        std: std.map(|s| round_to(s, precision)),
    }
}

/// Rounds half away from zero to `precision` decimal places.
fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !factor.is_finite() || !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

// ── Value counts ──────────────────────────────────────────────────────

/// Frequency of one distinct value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    /// Value as displayed.
    pub value: String,
    /// Number of rows holding it.
    pub count: usize,
}

/// Frequency table of `column`, most frequent first.
///
/// Ties keep the order in which values first appear. Missing values are
/// not counted.
///
/// ```
/// use autostat::csv_parser::CsvParser;
/// use autostat::grouping::value_counts;
///
/// let csv = "body-style\nsedan\nhatchback\nwagon\nhatchback\nsedan\nconvertible\n";
/// let df = CsvParser::new().parse_str(csv).unwrap();
/// let counts = value_counts(&df, "body-style").unwrap();
/// let order: Vec<&str> = counts.iter().map(|c| c.value.as_str()).collect();
/// assert_eq!(order, ["sedan", "hatchback", "wagon", "convertible"]);
/// ```
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<ValueCount>> {
    let col = df.require_column(column)?;
    let mut counts: Vec<ValueCount> = partition_rows(col)
        .into_iter()
        .map(|(value, rows)| ValueCount {
            value,
            count: rows.len(),
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

// ── Tests ─────────────────────────────────────────────────────────────
