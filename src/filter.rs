//! Inclusive numeric range filtering.
//!
//! A [`RangePredicate`] keeps the rows whose value in one column lies in
//! `[low, high]`. Rows whose value is missing or not a number are dropped.
//! Several predicates combine with AND by filtering sequentially.
//!
//! ```
//! use autostat::csv_parser::CsvParser;
//! use autostat::filter::{filter_range, RangePredicate};
//!
//! let csv = "make,price\naudi,13950\nbmw,?\nhonda,6479\nvolvo,22625\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! let pred = RangePredicate::new("price", 5000.0, 15000.0).unwrap();
//! let cheap = filter_range(&df, &pred).unwrap();
//! assert_eq!(cheap.row_count(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::dataframe::DataFrame;
use crate::error::{Result, StatsError};

/// Selects rows where `low <= column <= high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangePredicate {
    column: String,
    low: f64,
    high: f64,
}

impl RangePredicate {
    /// Creates a predicate, rejecting `low > high` and NaN bounds.
    pub fn new(column: impl Into<String>, low: f64, high: f64) -> Result<Self> {
        let column = column.into();
        if low.is_nan() || high.is_nan() {
            return Err(StatsError::InvalidArgument(format!(
                "range bounds for '{column}' must not be NaN"
            )));
        }
        if low > high {
            return Err(StatsError::InvalidArgument(format!(
                "range for '{column}' has low {low} > high {high}"
            )));
        }
        Ok(Self { column, low, high })
    }

    /// Column the predicate reads.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Inclusive lower bound.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Inclusive upper bound.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Returns `true` if `value` lies within the bounds.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Returns the indices of rows in `df` that satisfy `pred`, in row order.
pub fn matching_rows(df: &DataFrame, pred: &RangePredicate) -> Result<Vec<usize>> {
    let col = df.require_column(&pred.column)?;
    Ok((0..df.row_count())
        .filter(|&i| col.numeric_at(i).is_some_and(|v| pred.contains(v)))
        .collect())
}

/// Returns a new frame holding only the rows that satisfy `pred`.
pub fn filter_range(df: &DataFrame, pred: &RangePredicate) -> Result<DataFrame> {
    let rows = matching_rows(df, pred)?;
    log::debug!(
        "range filter on '{}' [{}, {}]: kept {} of {} rows",
        pred.column,
        pred.low,
        pred.high,
        rows.len(),
        df.row_count()
    );
    Ok(df.take_rows(&rows))
}

/// Applies every predicate in turn (logical AND).
///
/// An empty predicate list returns an unchanged copy of `df`.
pub fn filter_all(df: &DataFrame, preds: &[RangePredicate]) -> Result<DataFrame> {
    let mut current = df.clone();
    for pred in preds {
        current = filter_range(&current, pred)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataframe::Column;

    /// Ten cars, three priced within [5000, 10000] and one with no price.
    fn cars() -> DataFrame {
        let prices = vec![
            Some(13495.0),
            Some(5151.0),
            None,
            Some(10000.0),
            Some(16500.0),
            Some(4999.99),
            Some(5000.0),
            Some(f64::NAN),
            Some(41315.0),
            Some(f64::INFINITY),
        ];
        let hp = (0..10).map(|i| Some(60.0 + 10.0 * i as f64)).collect();
        let make = [
            "alfa-romero",
            "chevrolet",
            "dodge",
            "honda",
            "audi",
            "mitsubishi",
            "nissan",
            "toyota",
            "jaguar",
            "bmw",
        ]
        .map(Some);
        DataFrame::new()
            .with_column("price", Column::numeric_from_options(prices))
            .unwrap()
            .with_column("horsepower", Column::numeric_from_options(hp))
            .unwrap()
            .with_column("make", Column::text_from_options(&make))
            .unwrap()
    }

    #[test]
    fn rejects_inverted_and_nan_bounds() {
        assert!(matches!(
            RangePredicate::new("price", 10.0, 5.0),
            Err(StatsError::InvalidArgument(_))
        ));
        assert!(RangePredicate::new("price", f64::NAN, 5.0).is_err());
        assert!(RangePredicate::new("price", 5.0, 5.0).is_ok());
    }

    #[test]
    fn keeps_exactly_rows_in_inclusive_range() {
        let df = cars();
        let pred = RangePredicate::new("price", 5000.0, 10000.0).unwrap();
        assert_eq!(matching_rows(&df, &pred).unwrap(), vec![1, 3, 6]);

        let out = filter_range(&df, &pred).unwrap();
        assert_eq!(out.row_count(), 3);
        let price = out.column_by_name("price").unwrap();
        for i in 0..out.row_count() {
            let v = price.numeric_at(i).unwrap();
            assert!((5000.0..=10000.0).contains(&v));
        }
        let make = out.column_by_name("make").unwrap();
        assert_eq!(make.str_at(0), Some("chevrolet"));
        assert_eq!(make.str_at(2), Some("nissan"));
    }

    #[test]
    fn filtering_is_idempotent() {
        let df = cars();
        let pred = RangePredicate::new("price", 5000.0, 10000.0).unwrap();
        let once = filter_range(&df, &pred).unwrap();
        let twice = filter_range(&once, &pred).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn predicates_compose_with_and() {
        let df = cars();
        let preds = vec![
            RangePredicate::new("price", 5000.0, 10000.0).unwrap(),
            RangePredicate::new("horsepower", 90.0, 200.0).unwrap(),
        ];
        let out = filter_all(&df, &preds).unwrap();
        assert_eq!(out.row_count(), 2);
        let hp = out.column_by_name("horsepower").unwrap();
        assert_eq!(hp.numeric_at(0), Some(90.0));
        assert_eq!(hp.numeric_at(1), Some(120.0));

        let unchanged = filter_all(&df, &[]).unwrap();
        assert_eq!(unchanged.row_count(), df.row_count());
        assert_eq!(unchanged.column_names(), df.column_names());
    }

    #[test]
    fn unbounded_range_still_excludes_nan_and_missing() {
        let df = cars();
        let pred = RangePredicate::new("price", f64::NEG_INFINITY, f64::INFINITY).unwrap();
        let out = filter_range(&df, &pred).unwrap();
        assert_eq!(out.row_count(), 8);
    }

    #[test]
    fn text_column_values_are_parsed() {
        let df = DataFrame::new()
            .with_column(
                "bore",
                Column::text_from_options(&[Some("3.19"), Some("?"), Some("2.91"), None]),
            )
            .unwrap();
        let pred = RangePredicate::new("bore", 3.0, 4.0).unwrap();
        assert_eq!(matching_rows(&df, &pred).unwrap(), vec![0]);
    }

    #[test]
    fn unknown_column() {
        let df = cars();
        let pred = RangePredicate::new("mpg", 0.0, 1.0).unwrap();
        assert_eq!(
            filter_range(&df, &pred),
            Err(StatsError::ColumnNotFound { name: "mpg".into() })
        );
    }
}
