//! Column-major DataFrame for tabular data.
//!
//! The [`DataFrame`] stores data in column-major order with typed columns
//! and a compact validity bitmap for tracking missing values. The engine
//! never mutates a frame it is given: filters and previews build new frames
//! through [`DataFrame::take_rows`].
//!
//! # Column Types
//!
//! | Type | Storage | Use case |
//! |------|---------|----------|
//! | [`Numeric`](Column::Numeric) | `Vec<f64>` + bitmap | Continuous/integer values |
//! | [`Categorical`](Column::Categorical) | Dictionary + `Vec<u32>` | Low-cardinality strings |
//! | [`Text`](Column::Text) | `Vec<String>` + bitmap | High-cardinality strings |
//!
//! # Example
//!
//! ```
//! use autostat::dataframe::{DataFrame, Column, ValidityBitmap};
//!
//! let mut df = DataFrame::new();
//! df.add_column(
//!     "horsepower".to_string(),
//!     Column::numeric(vec![111.0, 154.0, 102.0], ValidityBitmap::all_valid(3)),
//! ).unwrap();
//! assert_eq!(df.row_count(), 3);
//! assert_eq!(df.column_count(), 1);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

// ── ValidityBitmap ────────────────────────────────────────────────────

/// Bit-packed validity bitmap using `Vec<u64>`.
///
/// Each bit indicates whether the corresponding row is present (1) or
/// missing (0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityBitmap {
    bits: Vec<u64>,
    len: usize,
}

impl ValidityBitmap {
    /// Creates a bitmap where all `len` positions are valid.
    pub fn all_valid(len: usize) -> Self {
        let n_words = len.div_ceil(64);
        let mut bits = vec![u64::MAX; n_words];
        let trailing = len % 64;
        if trailing != 0 && n_words > 0 {
            bits[n_words - 1] = (1u64 << trailing) - 1;
        }
        Self { bits, len }
    }

    /// Creates a bitmap where all `len` positions are missing.
    pub fn all_invalid(len: usize) -> Self {
        Self {
            bits: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Creates an empty bitmap with no rows.
    pub fn empty() -> Self {
        Self {
            bits: Vec::new(),
            len: 0,
        }
    }

    /// Returns `true` if the value at `idx` is present.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        let (word, bit) = (idx / 64, idx % 64);
        (self.bits[word] >> bit) & 1 == 1
    }

    /// Appends a new position (valid or missing).
    pub fn push(&mut self, valid: bool) {
        let idx = self.len;
        self.len += 1;
        let (word, bit) = (idx / 64, idx % 64);
        if word >= self.bits.len() {
            self.bits.push(0);
        }
        if valid {
            self.bits[word] |= 1u64 << bit;
        }
    }

    /// Returns the total number of tracked positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap tracks zero positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts the number of missing positions.
    pub fn null_count(&self) -> usize {
        self.len - self.valid_count()
    }

    /// Counts the number of present positions.
    pub fn valid_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns an iterator over indices of present positions.
    pub fn valid_indices(&self) -> ValidIndicesIter<'_> {
        ValidIndicesIter {
            bitmap: self,
            current: 0,
        }
    }
}

/// Iterator over valid indices in a [`ValidityBitmap`].
pub struct ValidIndicesIter<'a> {
    bitmap: &'a ValidityBitmap,
    current: usize,
}

impl Iterator for ValidIndicesIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current < self.bitmap.len {
            let idx = self.current;
            self.current += 1;
            if self.bitmap.is_valid(idx) {
                return Some(idx);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.bitmap.len - self.current))
    }
}

// ── DataType ──────────────────────────────────────────────────────────

/// Storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// Continuous or integer numeric values (stored as `f64`).
    Numeric,
    /// Low-cardinality strings (dictionary-encoded).
    Categorical,
    /// High-cardinality or free-form text.
    Text,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "Numeric"),
            Self::Categorical => write!(f, "Categorical"),
            Self::Text => write!(f, "Text"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column with validity bitmap for missing values.
///
/// Missing positions hold a placeholder (0.0, empty string, or index 0)
/// that must be ignored. A present numeric value may still be NaN or ±∞.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Dense `f64` values. Missing positions hold `0.0`.
    Numeric {
        values: Vec<f64>,
        validity: ValidityBitmap,
    },
    /// Dictionary-encoded categorical column.
    ///
    /// `indices` maps each row to a `dictionary` entry. Missing positions
    /// have index `0` (ignored via the validity bit).
    Categorical {
        dictionary: Vec<String>,
        indices: Vec<u32>,
        validity: ValidityBitmap,
    },
    /// Free-form text column. Missing positions hold an empty string.
    Text {
        values: Vec<String>,
        validity: ValidityBitmap,
    },
}

impl Column {
    /// Creates a numeric column.
    pub fn numeric(values: Vec<f64>, validity: ValidityBitmap) -> Self {
        Self::Numeric { values, validity }
    }

    /// Creates a numeric column where `None` marks a missing value.
    ///
    /// ```
    /// use autostat::dataframe::Column;
    ///
    /// let col = Column::numeric_from_options(vec![Some(1.0), None, Some(f64::INFINITY)]);
    /// assert_eq!(col.null_count(), 1);
    /// assert_eq!(col.numeric_at(2), Some(f64::INFINITY));
    /// ```
    pub fn numeric_from_options(values: Vec<Option<f64>>) -> Self {
        let mut validity = ValidityBitmap::empty();
        let values = values
            .into_iter()
            .map(|v| {
                validity.push(v.is_some());
                v.unwrap_or(0.0)
            })
            .collect();
        Self::Numeric { values, validity }
    }

    /// Creates a categorical column from a dictionary and indices.
    pub fn categorical(
        dictionary: Vec<String>,
        indices: Vec<u32>,
        validity: ValidityBitmap,
    ) -> Self {
        Self::Categorical {
            dictionary,
            indices,
            validity,
        }
    }

    /// Dictionary-encodes string values; the dictionary follows first-seen order.
    pub fn categorical_from_options<S: AsRef<str>>(values: &[Option<S>]) -> Self {
        let mut dictionary: Vec<String> = Vec::new();
        let mut lookup: HashMap<String, u32> = HashMap::new();
        let mut indices = Vec::with_capacity(values.len());
        let mut validity = ValidityBitmap::empty();

        for value in values {
            match value {
                Some(s) => {
                    let s: &str = s.as_ref();
                    let idx = match lookup.get(s) {
                        Some(&idx) => idx,
                        None => {
                            let idx = dictionary.len() as u32;
                            dictionary.push(s.to_string());
                            lookup.insert(s.to_string(), idx);
                            idx
                        }
                    };
                    indices.push(idx);
                    validity.push(true);
                }
                None => {
                    indices.push(0);
                    validity.push(false);
                }
            }
        }

        Self::Categorical {
            dictionary,
            indices,
            validity,
        }
    }

    /// Creates a text column.
    pub fn text(values: Vec<String>, validity: ValidityBitmap) -> Self {
        Self::Text { values, validity }
    }

    /// Creates a text column where `None` marks a missing value.
    pub fn text_from_options<S: AsRef<str>>(values: &[Option<S>]) -> Self {
        let mut validity = ValidityBitmap::empty();
        let values = values
            .iter()
            .map(|v| {
                validity.push(v.is_some());
                match v {
                    Some(s) => {
                        let s: &str = s.as_ref();
                        s.to_string()
                    }
                    None => String::new(),
                }
            })
            .collect();
        Self::Text { values, validity }
    }

    /// Returns the storage kind of this column.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Numeric { .. } => DataType::Numeric,
            Self::Categorical { .. } => DataType::Categorical,
            Self::Text { .. } => DataType::Text,
        }
    }

    /// Returns the number of rows in this column.
    pub fn len(&self) -> usize {
        self.validity().len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the validity bitmap.
    pub fn validity(&self) -> &ValidityBitmap {
        match self {
            Self::Numeric { validity, .. }
            | Self::Categorical { validity, .. }
            | Self::Text { validity, .. } => validity,
        }
    }

    /// Returns the number of missing values.
    pub fn null_count(&self) -> usize {
        self.validity().null_count()
    }

    /// Returns the number of present values.
    pub fn valid_count(&self) -> usize {
        self.validity().valid_count()
    }

    /// Returns `true` if the value at `idx` is present.
    pub fn is_valid(&self, idx: usize) -> bool {
        self.validity().is_valid(idx)
    }

    /// Returns the string value at `idx` for categorical and text columns.
    pub fn str_at(&self, idx: usize) -> Option<&str> {
        if !self.is_valid(idx) {
            return None;
        }
        match self {
            Self::Numeric { .. } => None,
            Self::Categorical {
                dictionary,
                indices,
                ..
            } => dictionary.get(indices[idx] as usize).map(|s| s.as_str()),
            Self::Text { values, .. } => Some(&values[idx]),
        }
    }

    /// Reads the cell at `idx` as a number.
    ///
    /// Numeric cells are returned as stored (including NaN and ±∞). String
    /// cells are parsed, so numeric-looking text reads as a number.
    /// Missing or unparsable cells yield `None`.
    pub fn numeric_at(&self, idx: usize) -> Option<f64> {
        match self {
            Self::Numeric { values, validity } => validity.is_valid(idx).then(|| values[idx]),
            _ => self.str_at(idx).and_then(|s| s.trim().parse::<f64>().ok()),
        }
    }

    /// Renders the cell at `idx` as a display key, or `None` when missing.
    ///
    /// Numbers use Rust's shortest round-trip formatting (`4.0` → `"4"`).
    /// A NaN cell counts as missing and `-0.0` renders as `"0"`.
    pub fn display_at(&self, idx: usize) -> Option<String> {
        match self {
            Self::Numeric { values, validity } => {
                let v = values[idx];
                if !validity.is_valid(idx) || v.is_nan() {
                    return None;
                }
                Some(if v == 0.0 { 0.0 } else { v }.to_string())
            }
            _ => self.str_at(idx).map(str::to_string),
        }
    }

    /// Builds a new column holding the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Column {
        let mut validity = ValidityBitmap::empty();
        for &i in indices {
            validity.push(self.is_valid(i));
        }
        match self {
            Self::Numeric { values, .. } => Self::Numeric {
                values: indices.iter().map(|&i| values[i]).collect(),
                validity,
            },
            Self::Categorical {
                dictionary,
                indices: codes,
                ..
            } => Self::Categorical {
                dictionary: dictionary.clone(),
                indices: indices.iter().map(|&i| codes[i]).collect(),
                validity,
            },
            Self::Text { values, .. } => Self::Text {
                values: indices.iter().map(|&i| values[i].clone()).collect(),
                validity,
            },
        }
    }
}

// ── DataFrame ─────────────────────────────────────────────────────────

/// Column-major tabular data structure.
///
/// Stores named columns of typed data. All columns must have the same
/// number of rows and column names are unique. Row order is preserved by
/// every derived view.
///
/// # Example
///
/// ```
/// use autostat::dataframe::{DataFrame, Column, ValidityBitmap};
///
/// let mut df = DataFrame::new();
/// df.add_column(
///     "price".to_string(),
///     Column::numeric(vec![13495.0, 16500.0, 13950.0], ValidityBitmap::all_valid(3)),
/// ).unwrap();
/// df.add_column(
///     "make".to_string(),
///     Column::text(
///         vec!["alfa-romero".into(), "alfa-romero".into(), "audi".into()],
///         ValidityBitmap::all_valid(3),
///     ),
/// ).unwrap();
/// assert_eq!(df.row_count(), 3);
/// assert_eq!(df.column_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    /// Creates an empty DataFrame with no columns or rows.
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Adds a named column to the DataFrame.
    ///
    /// Returns an error if the column length doesn't match the existing
    /// row count (unless this is the first column) or the name is taken.
    pub fn add_column(&mut self, name: String, column: Column) -> Result<()> {
        if self.names.contains(&name) {
            return Err(StatsError::DuplicateColumn { name });
        }
        let col_len = column.len();
        if self.columns.is_empty() {
            self.row_count = col_len;
        } else if col_len != self.row_count {
            return Err(StatsError::DimensionMismatch {
                expected: self.row_count,
                actual: col_len,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style [`add_column`](Self::add_column).
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        self.add_column(name.into(), column)?;
        Ok(self)
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the DataFrame has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns column names.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Returns a reference to the column at `index`.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns a reference to the column with the given `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Like [`column_by_name`](Self::column_by_name) but reports a missing
    /// column as [`StatsError::ColumnNotFound`].
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column_by_name(name)
            .ok_or_else(|| StatsError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the index of the column with the given `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns an iterator over (name, column) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(|s| s.as_str()).zip(self.columns.iter())
    }

    /// Returns the total number of missing values across all columns.
    pub fn total_null_count(&self) -> usize {
        self.columns.iter().map(|c| c.null_count()).sum()
    }

    /// Builds a new DataFrame with the rows at `indices`, in that order.
    ///
    /// Indices must be in bounds.
    pub fn take_rows(&self, indices: &[usize]) -> DataFrame {
        DataFrame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            row_count: indices.len(),
        }
    }

    /// Returns the first `n` rows (fewer if the frame is shorter).
    pub fn head(&self, n: usize) -> DataFrame {
        let indices: Vec<usize> = (0..n.min(self.row_count)).collect();
        self.take_rows(&indices)
    }

    /// Builds a new DataFrame holding only the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<DataFrame> {
        let mut out = DataFrame::new();
        for &name in names {
            let column = self.require_column(name)?.clone();
            out.add_column(name.to_string(), column)?;
        }
        if out.is_empty() {
            out.row_count = self.row_count;
        }
        Ok(out)
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
