//! Column classification into numeric and categorical sets.
//!
//! Classification happens once per frame and is then consumed as a typed
//! partition, so downstream analysis never re-inspects column storage.
//!
//! A column is **numeric** when it has at least one present value and every
//! present value reads as a real number (numeric storage, or text that
//! parses as `f64`). Everything else, including all-missing columns, is
//! **categorical**.
//!
//! ```
//! use autostat::classify::classify_columns;
//! use autostat::csv_parser::CsvParser;
//!
//! let csv = "make,price,empty\naudi,13950,\nbmw,16430,\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! let classes = classify_columns(&df);
//!
//! assert_eq!(classes.numeric, vec!["price".to_string()]);
//! assert_eq!(classes.categorical, vec!["make".to_string(), "empty".to_string()]);
//! ```

use serde::{Deserialize, Serialize};

use crate::dataframe::{Column, DataFrame};

/// Analytical kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Every present value is a real number.
    Numeric,
    /// Anything else.
    Categorical,
}

/// Partition of a frame's column names; each name appears in exactly one set.
///
/// Both lists follow the frame's column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    /// Numeric column names.
    pub numeric: Vec<String>,
    /// Categorical column names.
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    /// Returns the kind recorded for `name`, or `None` if it was not classified.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        if self.numeric.iter().any(|n| n == name) {
            Some(ColumnKind::Numeric)
        } else if self.categorical.iter().any(|n| n == name) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    /// Returns `true` if `name` was classified numeric.
    pub fn is_numeric(&self, name: &str) -> bool {
        self.kind_of(name) == Some(ColumnKind::Numeric)
    }
}

/// Classifies every column of `df`.
pub fn classify_columns(df: &DataFrame) -> ColumnClassification {
    let mut out = ColumnClassification::default();
    for (name, col) in df.iter() {
        match classify_column(col) {
            ColumnKind::Numeric => out.numeric.push(name.to_string()),
            ColumnKind::Categorical => out.categorical.push(name.to_string()),
        }
    }
    log::debug!(
        "classified {} columns: {} numeric, {} categorical",
        df.column_count(),
        out.numeric.len(),
        out.categorical.len()
    );
    out
}

/// Classifies a single column.
pub fn classify_column(col: &Column) -> ColumnKind {
    if col.valid_count() == 0 {
        return ColumnKind::Categorical;
    }
    match col {
        Column::Numeric { .. } => ColumnKind::Numeric,
        Column::Categorical { .. } | Column::Text { .. } => {
            let all_parse = col
                .validity()
                .valid_indices()
                .all(|i| col.numeric_at(i).is_some());
            if all_parse {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            }
        }
    }
}
