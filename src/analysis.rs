//! Correlation analysis that tolerates dirty numeric data.
//!
//! Every calculation here works on the rows that are usable for the pair
//! at hand and silently skips the rest: a row contributes to `corr(x, y)`
//! only when both `x` and `y` are present, finite numbers. A row that is
//! unusable for one pair may still count for another.
//!
//! When fewer than two usable rows remain (or a column is constant over
//! them) the result degrades to a neutral `r = 0, p = 1` instead of failing;
//! [`CorrelationResult::valid_pair_count`] lets callers flag such results.
//!
//! # Correlation Analysis
//!
//! ```
//! use autostat::analysis::{correlation_analysis, CorrelationConfig};
//! use autostat::csv_parser::CsvParser;
//!
//! let csv = "engine-size,horsepower,city-mpg\n\
//!            130,111,21\n152,154,19\n109,102,24\n136,115,18\n131,140,17\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! let result = correlation_analysis(&df, &CorrelationConfig::default()).unwrap();
//!
//! assert_eq!(result.matrix.size(), 3);
//! assert!(result.significant.pairs.iter().any(|p| {
//!     p.variable_a == "engine-size" && p.variable_b == "horsepower"
//! }));
//! ```

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use crate::classify::{classify_columns, ColumnClassification};
use crate::dataframe::{Column, DataFrame};
use crate::error::{Result, StatsError};

// ── Pairwise correlation ──────────────────────────────────────────────

/// Pearson correlation of two columns over their usable rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Pearson r in [-1, 1]; `0.0` when the pair carries no usable signal.
    pub coefficient: f64,
    /// Two-sided p-value in [0, 1] under H0: ρ = 0; `1.0` when undefined.
    pub p_value: f64,
    /// Number of rows where both values were present and finite.
    pub valid_pair_count: usize,
}

impl CorrelationResult {
    fn neutral(valid_pair_count: usize) -> Self {
        Self {
            coefficient: 0.0,
            p_value: 1.0,
            valid_pair_count,
        }
    }
}

/// Computes the Pearson correlation and its p-value between `x` and `y`.
///
/// Rows where either value is NaN or ±∞ are dropped. If the slices differ
/// in length only the common prefix is used.
///
/// ```
/// use autostat::analysis::pearson;
///
/// let x = [1.0, 2.0, f64::INFINITY, 4.0];
/// let y = [10.0, 20.0, 30.0, f64::NAN];
/// let r = pearson(&x, &y);
/// assert_eq!(r.valid_pair_count, 2);
/// assert!((r.coefficient - 1.0).abs() < 1e-12);
/// ```
pub fn pearson(x: &[f64], y: &[f64]) -> CorrelationResult {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();

    let n = pairs.len();
    if n < 2 {
        log::warn!("pearson: {n} usable rows, returning neutral correlation");
        return CorrelationResult::neutral(n);
    }

    // Scale each series into [-1, 1] so the sums of squares stay finite.
    let scale_x = pairs.iter().fold(0.0_f64, |m, p| m.max(p.0.abs()));
    let scale_y = pairs.iter().fold(0.0_f64, |m, p| m.max(p.1.abs()));
    if scale_x == 0.0 || scale_y == 0.0 {
        log::warn!("pearson: zero variance over {n} usable rows, returning neutral correlation");
        return CorrelationResult::neutral(n);
    }

    let mean_x = pairs.iter().map(|p| p.0 / scale_x).mean();
    let mean_y = pairs.iter().map(|p| p.1 / scale_y).mean();

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(a, b) in &pairs {
        let dx = a / scale_x - mean_x;
        let dy = b / scale_y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        log::warn!("pearson: zero variance over {n} usable rows, returning neutral correlation");
        return CorrelationResult::neutral(n);
    }

    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if !r.is_finite() {
        log::warn!("pearson: non-finite coefficient over {n} usable rows, returning neutral correlation");
        return CorrelationResult::neutral(n);
    }
    let r = r.clamp(-1.0, 1.0);

    CorrelationResult {
        coefficient: r,
        p_value: correlation_p_value(r, n),
        valid_pair_count: n,
    }
}

/// Pearson correlation between two frame columns.
///
/// Missing cells and text that does not parse as a number are treated as
/// unusable rows.
pub fn pearson_columns(x: &Column, y: &Column) -> CorrelationResult {
    pearson(&numeric_series(x), &numeric_series(y))
}

/// Two-sided p-value of Pearson r via t = r·√((n−2)/(1−r²)), df = n − 2.
fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return 0.0;
    }
    let t = r * (df / denom).sqrt();
    if t.is_nan() {
        return 1.0;
    }
    if t.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// Reads a column as `f64`, mapping unusable cells to NaN.
fn numeric_series(col: &Column) -> Vec<f64> {
    (0..col.len())
        .map(|i| col.numeric_at(i).unwrap_or(f64::NAN))
        .collect()
}

// ── Correlation matrix ────────────────────────────────────────────────

/// Square, symmetric correlation matrix over named numeric columns.
///
/// Cells are stored row-major. The diagonal is always `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    coefficients: Vec<f64>,
    p_values: Vec<f64>,
    valid_counts: Vec<usize>,
}

impl CorrelationMatrix {
    fn with_names(names: Vec<String>) -> Self {
        let n = names.len();
        let mut coefficients = vec![0.0; n * n];
        let mut p_values = vec![1.0; n * n];
        for i in 0..n {
            coefficients[i * n + i] = 1.0;
            p_values[i * n + i] = 0.0;
        }
        Self {
            names,
            coefficients,
            p_values,
            valid_counts: vec![0; n * n],
        }
    }

    /// Builds a matrix from precomputed row-major coefficients.
    ///
    /// The input must be `n × n`, exactly symmetric and carry `1.0` on the
    /// diagonal. P-values and counts are unknown and read as NaN and 0.
    pub fn from_coefficients(names: Vec<String>, coefficients: Vec<f64>) -> Result<Self> {
        let n = names.len();
        if coefficients.len() != n * n {
            return Err(StatsError::DimensionMismatch {
                expected: n * n,
                actual: coefficients.len(),
            });
        }
        for i in 0..n {
            if coefficients[i * n + i] != 1.0 {
                return Err(StatsError::InvalidArgument(format!(
                    "diagonal entry for '{}' must be 1.0",
                    names[i]
                )));
            }
            for j in (i + 1)..n {
                let (a, b) = (coefficients[i * n + j], coefficients[j * n + i]);
                if a.to_bits() != b.to_bits() {
                    return Err(StatsError::InvalidArgument(format!(
                        "matrix is not symmetric at ('{}', '{}')",
                        names[i], names[j]
                    )));
                }
            }
        }
        Ok(Self {
            names,
            coefficients,
            p_values: vec![f64::NAN; n * n],
            valid_counts: vec![0; n * n],
        })
    }

    fn set_pair(&mut self, i: usize, j: usize, result: CorrelationResult) {
        let n = self.names.len();
        for idx in [i * n + j, j * n + i] {
            self.coefficients[idx] = result.coefficient;
            self.p_values[idx] = result.p_value;
            self.valid_counts[idx] = result.valid_pair_count;
        }
    }

    /// Number of rows (= columns).
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` when the matrix covers no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of `name` in the matrix ordering.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Coefficient at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.coefficients[i * self.size() + j]
    }

    /// P-value at `(i, j)`.
    pub fn p_value(&self, i: usize, j: usize) -> f64 {
        self.p_values[i * self.size() + j]
    }

    /// Usable row count behind the cell at `(i, j)`.
    pub fn valid_count(&self, i: usize, j: usize) -> usize {
        self.valid_counts[i * self.size() + j]
    }

    /// Coefficient between two named columns.
    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.get(self.index_of(a)?, self.index_of(b)?))
    }

    /// Coefficients as nested rows, ready for a heatmap.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        let n = self.size();
        if n == 0 {
            return Vec::new();
        }
        self.coefficients.chunks(n).map(<[f64]>::to_vec).collect()
    }

    /// Restricts the matrix to `names`, in the given order.
    ///
    /// Typically fed with [`SignificantPairs::correlated_columns`] so a
    /// heatmap shows only the variables that matter.
    pub fn subset(&self, names: &[String]) -> Result<CorrelationMatrix> {
        let idx: Vec<usize> = names
            .iter()
            .map(|name| {
                self.index_of(name)
                    .ok_or_else(|| StatsError::ColumnNotFound { name: name.clone() })
            })
            .collect::<Result<_>>()?;

        let n = self.size();
        let m = idx.len();
        let mut out = CorrelationMatrix::with_names(names.to_vec());
        for (a, &i) in idx.iter().enumerate() {
            for (b, &j) in idx.iter().enumerate() {
                out.coefficients[a * m + b] = self.coefficients[i * n + j];
                out.p_values[a * m + b] = self.p_values[i * n + j];
                out.valid_counts[a * m + b] = self.valid_counts[i * n + j];
            }
        }
        Ok(out)
    }
}

/// Builds the correlation matrix over the numeric columns of `classes`.
pub fn correlation_matrix(
    df: &DataFrame,
    classes: &ColumnClassification,
) -> Result<CorrelationMatrix> {
    correlation_matrix_for(df, &classes.numeric)
}

/// Builds the correlation matrix over the named columns, in the given order.
///
/// Each unordered pair is computed once and written to both cells; the
/// diagonal is fixed at `1.0`.
pub fn correlation_matrix_for(df: &DataFrame, names: &[String]) -> Result<CorrelationMatrix> {
    let series: Vec<Vec<f64>> = names
        .iter()
        .map(|name| df.require_column(name).map(numeric_series))
        .collect::<Result<_>>()?;

    let mut matrix = CorrelationMatrix::with_names(names.to_vec());
    let n = names.len();
    for i in 0..n {
        let finite = series[i].iter().filter(|v| v.is_finite()).count();
        matrix.valid_counts[i * n + i] = finite;
        for j in (i + 1)..n {
            matrix.set_pair(i, j, pearson(&series[i], &series[j]));
        }
    }

    log::debug!("built {n}x{n} correlation matrix over {} rows", df.row_count());
    Ok(matrix)
}

// ── Significant pairs ─────────────────────────────────────────────────

/// Configuration for significant-pair extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Pairs must exceed this value (strictly). Default: 0.5.
    pub threshold: f64,
    /// Compare |r| instead of signed r against the threshold. Default: false.
    pub absolute: bool,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            absolute: false,
        }
    }
}

/// A distinct pair of columns whose correlation exceeds the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantPair {
    /// Column that comes first in matrix order.
    pub variable_a: String,
    /// Column that comes later in matrix order.
    pub variable_b: String,
    /// Correlation coefficient.
    pub coefficient: f64,
    /// P-value for the correlation (NaN when the matrix carries none).
    pub p_value: f64,
}

/// Deduplicated significant pairs plus the columns they involve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignificantPairs {
    /// One entry per unordered pair, in matrix order.
    pub pairs: Vec<SignificantPair>,
    /// Every column appearing in some pair, in matrix order.
    pub correlated_columns: Vec<String>,
}

impl SignificantPairs {
    /// Returns `true` when no pair passed the threshold.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Extracts the pairs of `matrix` whose coefficient exceeds the threshold.
///
/// Only the upper triangle is scanned, so `(a, b)` is kept with `a`
/// preceding `b` in matrix order and `(b, a)` never appears. Distinct
/// pairs sharing a coefficient are all kept.
///
/// ```
/// use autostat::analysis::{significant_pairs, CorrelationConfig, CorrelationMatrix};
///
/// let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
/// let m = CorrelationMatrix::from_coefficients(
///     names,
///     vec![1.0, 0.6, 0.6,
///          0.6, 1.0, 0.1,
///          0.6, 0.1, 1.0],
/// ).unwrap();
/// let sig = significant_pairs(&m, &CorrelationConfig::default()).unwrap();
/// assert_eq!(sig.pairs.len(), 2);
/// assert_eq!(sig.correlated_columns, vec!["A", "B", "C"]);
/// ```
pub fn significant_pairs(
    matrix: &CorrelationMatrix,
    config: &CorrelationConfig,
) -> Result<SignificantPairs> {
    if !config.threshold.is_finite() {
        return Err(StatsError::InvalidArgument(format!(
            "correlation threshold must be finite, got {}",
            config.threshold
        )));
    }

    let n = matrix.size();
    let mut pairs = Vec::new();
    let mut involved = vec![false; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let r = matrix.get(i, j);
            let score = if config.absolute { r.abs() } else { r };
            if score > config.threshold {
                involved[i] = true;
                involved[j] = true;
                pairs.push(SignificantPair {
                    variable_a: matrix.names[i].clone(),
                    variable_b: matrix.names[j].clone(),
                    coefficient: r,
                    p_value: matrix.p_value(i, j),
                });
            }
        }
    }

    let correlated_columns = matrix
        .names
        .iter()
        .zip(involved)
        .filter_map(|(name, hit)| hit.then(|| name.clone()))
        .collect();

    log::debug!(
        "{} of {} pairs above threshold {}",
        pairs.len(),
        n * n.saturating_sub(1) / 2,
        config.threshold
    );

    Ok(SignificantPairs {
        pairs,
        correlated_columns,
    })
}

// ── One-shot analysis ─────────────────────────────────────────────────

/// Classification, matrix and significant pairs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    /// Column partition the matrix was built from.
    pub classification: ColumnClassification,
    /// Matrix over the numeric columns.
    pub matrix: CorrelationMatrix,
    /// Pairs above the configured threshold.
    pub significant: SignificantPairs,
}

/// Classifies `df`, builds its numeric correlation matrix and extracts
/// significant pairs.
///
/// A frame without numeric columns yields an empty matrix and no pairs.
pub fn correlation_analysis(
    df: &DataFrame,
    config: &CorrelationConfig,
) -> Result<CorrelationAnalysis> {
    let classification = classify_columns(df);
    let matrix = correlation_matrix(df, &classification)?;
    let significant = significant_pairs(&matrix, config)?;
    Ok(CorrelationAnalysis {
        classification,
        matrix,
        significant,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn frame() -> DataFrame {
        DataFrame::new()
            .with_column(
                "a",
                Column::numeric_from_options(vec![
                    Some(1.0),
                    Some(2.0),
                    Some(3.0),
                    Some(4.0),
                    Some(5.0),
                    Some(f64::NAN),
                ]),
            )
            .unwrap()
            .with_column(
                "b",
                Column::numeric_from_options(vec![
                    Some(2.0),
                    Some(4.1),
                    Some(5.9),
                    None,
                    Some(10.2),
                    Some(12.0),
                ]),
            )
            .unwrap()
            .with_column(
                "c",
                Column::numeric_from_options(vec![
                    Some(5.0),
                    Some(3.0),
                    Some(f64::NEG_INFINITY),
                    Some(2.0),
                    Some(1.0),
                    Some(0.0),
                ]),
            )
            .unwrap()
            .with_column(
                "label",
                Column::text_from_options(&[
                    Some("x"),
                    Some("y"),
                    Some("z"),
                    Some("x"),
                    Some("y"),
                    Some("z"),
                ]),
            )
            .unwrap()
    }

    // ── pearson ──────────────────────────────────────────────────

    #[test]
    fn pearson_perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = pearson(&x, &[2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_relative_eq!(up.coefficient, 1.0, epsilon = 1e-12);
        assert!(up.p_value < 1e-10);

        let down = pearson(&x, &[5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_relative_eq!(down.coefficient, -1.0, epsilon = 1e-12);
        assert_eq!(down.valid_pair_count, 5);
    }

    #[test]
    fn pearson_known_value() {
        // r = 0.7745966692414834 for this textbook pair; t = 2.1213, df = 3.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let r = pearson(&x, &y);
        assert_relative_eq!(r.coefficient, 0.7745966692414834, epsilon = 1e-12);
        assert_relative_eq!(r.p_value, 0.1240, epsilon = 1e-3);
    }

    #[test]
    fn pearson_uses_only_rows_valid_in_both() {
        let x = [1.0, 2.0, f64::INFINITY, 4.0];
        let y = [10.0, 20.0, 30.0, f64::NAN];
        let r = pearson(&x, &y);
        assert_eq!(r.valid_pair_count, 2);
        assert_relative_eq!(r.coefficient, 1.0, epsilon = 1e-12);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn pearson_degrades_below_two_rows() {
        let r = pearson(&[1.0, f64::NAN], &[f64::NEG_INFINITY, 2.0]);
        assert_eq!(
            r,
            CorrelationResult {
                coefficient: 0.0,
                p_value: 1.0,
                valid_pair_count: 0
            }
        );

        let r = pearson(&[], &[]);
        assert_eq!(r.valid_pair_count, 0);
        assert_eq!(r.coefficient, 0.0);
    }

    #[test]
    fn pearson_constant_column_is_neutral() {
        let r = pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_eq!(r.coefficient, 0.0);
        assert_eq!(r.p_value, 1.0);
        assert_eq!(r.valid_pair_count, 3);
    }

    #[test]
    fn pearson_mismatched_lengths_use_common_prefix() {
        let r = pearson(&[1.0, 2.0, 3.0, 100.0], &[1.0, 2.0, 3.0]);
        assert_eq!(r.valid_pair_count, 3);
        assert_relative_eq!(r.coefficient, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn pearson_bounds_hold_on_noisy_data() {
        let x: Vec<f64> = (0..50).map(|i| ((i * 37) % 11) as f64).collect();
        let y: Vec<f64> = (0..50)
            .map(|i| if i % 7 == 0 { f64::NAN } else { ((i * 13) % 17) as f64 })
            .collect();
        let r = pearson(&x, &y);
        assert!(r.valid_pair_count >= 2);
        assert!((-1.0..=1.0).contains(&r.coefficient));
        assert!((0.0..=1.0).contains(&r.p_value));
    }

    #[test]
    fn pearson_survives_huge_magnitudes() {
        let x = [1e200, -1e200, 0.0, 5e199];
        let y = [2e200, -1e200, 1e199, 3e199];
        let big = pearson(&x, &y);
        let unit = pearson(&[1.0, -1.0, 0.0, 0.5], &[2.0, -1.0, 0.1, 0.3]);
        assert_eq!(big.valid_pair_count, 4);
        assert!((-1.0..=1.0).contains(&big.coefficient));
        assert!((0.0..=1.0).contains(&big.p_value));
        assert_relative_eq!(big.coefficient, unit.coefficient, epsilon = 1e-12);
        assert_relative_eq!(big.p_value, unit.p_value, epsilon = 1e-12);
    }

    #[test]
    fn pearson_bounds_hold_at_extremes() {
        let cases: [(&[f64], &[f64]); 4] = [
            (&[f64::MAX, -f64::MAX, 0.0], &[1.0, -1.0, 0.0]),
            (&[1e-300, 2e-300, 3e-300, 5e-300], &[1.0, 2.0, 4.0, 3.0]),
            (&[1.0, 1.0 + 1e-15, 1.0, 1.0 + 2e-15], &[1.0, 2.0, 3.0, 4.0]),
            (&[1e300, 1e300, 1e300, -1e300], &[f64::MIN_POSITIVE, 0.0, 1.0, 1e308]),
        ];
        for (x, y) in cases {
            let r = pearson(x, y);
            assert!(r.coefficient.is_finite());
            assert!((-1.0..=1.0).contains(&r.coefficient));
            assert!((0.0..=1.0).contains(&r.p_value));
        }
        let r = pearson(&[f64::MAX, -f64::MAX, 0.0], &[1.0, -1.0, 0.0]);
        assert_relative_eq!(r.coefficient, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn tiny_p_values_keep_precision() {
        let p = correlation_p_value(0.99, 100);
        assert!(p > 0.0);
        assert!(p < 1e-40);
        assert_eq!(correlation_p_value(f64::NAN, 10), 1.0);
    }

    #[test]
    fn pearson_columns_reads_numeric_text() {
        let x = Column::text_from_options(&[Some("1"), Some("2"), Some("oops"), Some("4")]);
        let y = Column::numeric_from_options(vec![Some(2.0), Some(4.0), Some(6.0), None]);
        let r = pearson_columns(&x, &y);
        assert_eq!(r.valid_pair_count, 2);
    }

    // ── matrix ───────────────────────────────────────────────────

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let df = frame();
        let m = correlation_matrix_for(&df, &names(&["a", "b", "c"])).unwrap();
        assert_eq!(m.size(), 3);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j).to_bits(), m.get(j, i).to_bits());
                assert_eq!(m.p_value(i, j).to_bits(), m.p_value(j, i).to_bits());
                assert_eq!(m.valid_count(i, j), m.valid_count(j, i));
            }
        }
    }

    #[test]
    fn matrix_masks_each_pair_independently() {
        let df = frame();
        let m = correlation_matrix_for(&df, &names(&["a", "b", "c"])).unwrap();
        // a/b: row 3 (b missing) and row 5 (a NaN) are dropped.
        assert_eq!(m.valid_count(0, 1), 4);
        // a/c: row 2 (c = -inf) and row 5 are dropped.
        assert_eq!(m.valid_count(0, 2), 4);
        // b/c: rows 2 and 3 are dropped.
        assert_eq!(m.valid_count(1, 2), 4);
        assert_eq!(m.valid_count(0, 0), 5);
        assert!(m.get(0, 1) > 0.99);
        assert!(m.get(0, 2) < -0.9);
    }

    #[test]
    fn matrix_from_classification_skips_text() {
        let df = frame();
        let classes = classify_columns(&df);
        let m = correlation_matrix(&df, &classes).unwrap();
        assert_eq!(m.names(), &["a", "b", "c"]);
    }

    #[test]
    fn empty_numeric_set_gives_empty_matrix() {
        let df = frame();
        let m = correlation_matrix_for(&df, &[]).unwrap();
        assert!(m.is_empty());
        assert!(m.to_rows().is_empty());
        let sig = significant_pairs(&m, &CorrelationConfig::default()).unwrap();
        assert!(sig.is_empty());
        assert!(sig.correlated_columns.is_empty());
    }

    #[test]
    fn matrix_unknown_column() {
        let df = frame();
        let err = correlation_matrix_for(&df, &names(&["a", "zzz"])).unwrap_err();
        assert_eq!(err, StatsError::ColumnNotFound { name: "zzz".into() });
    }

    #[test]
    fn from_coefficients_validates_shape() {
        let bad_len = CorrelationMatrix::from_coefficients(names(&["a", "b"]), vec![1.0, 0.2, 0.2]);
        assert!(matches!(bad_len, Err(StatsError::DimensionMismatch { .. })));

        let asym =
            CorrelationMatrix::from_coefficients(names(&["a", "b"]), vec![1.0, 0.2, 0.3, 1.0]);
        assert!(matches!(asym, Err(StatsError::InvalidArgument(_))));

        let diag =
            CorrelationMatrix::from_coefficients(names(&["a", "b"]), vec![0.9, 0.2, 0.2, 1.0]);
        assert!(matches!(diag, Err(StatsError::InvalidArgument(_))));
    }

    #[test]
    fn subset_reorders_and_keeps_values() {
        let df = frame();
        let m = correlation_matrix_for(&df, &names(&["a", "b", "c"])).unwrap();
        let sub = m.subset(&names(&["c", "a"])).unwrap();
        assert_eq!(sub.names(), &["c", "a"]);
        assert_eq!(sub.get(0, 1), m.get(2, 0));
        assert_eq!(sub.get(0, 0), 1.0);
        assert_eq!(sub.get_by_name("a", "c"), m.get_by_name("c", "a"));
        assert!(m.subset(&names(&["nope"])).is_err());
    }

    // ── significant pairs ────────────────────────────────────────

    fn abc_matrix() -> CorrelationMatrix {
        CorrelationMatrix::from_coefficients(
            names(&["A", "B", "C"]),
            vec![1.0, 0.6, 0.6, 0.6, 1.0, 0.1, 0.6, 0.1, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn equal_coefficients_on_distinct_pairs_are_both_kept() {
        let sig = significant_pairs(&abc_matrix(), &CorrelationConfig::default()).unwrap();
        let got: Vec<(&str, &str, f64)> = sig
            .pairs
            .iter()
            .map(|p| (p.variable_a.as_str(), p.variable_b.as_str(), p.coefficient))
            .collect();
        assert_eq!(got, vec![("A", "B", 0.6), ("A", "C", 0.6)]);
        assert_eq!(sig.correlated_columns, vec!["A", "B", "C"]);
    }

    #[test]
    fn no_mirrored_pairs() {
        let df = frame();
        let m = correlation_matrix_for(&df, &names(&["a", "b", "c"])).unwrap();
        let config = CorrelationConfig {
            threshold: -1.0,
            absolute: false,
        };
        let sig = significant_pairs(&m, &config).unwrap();
        assert_eq!(sig.pairs.len(), 3);
        for p in &sig.pairs {
            assert_ne!(p.variable_a, p.variable_b);
            let mirrored = sig
                .pairs
                .iter()
                .filter(|q| q.variable_a == p.variable_b && q.variable_b == p.variable_a)
                .count();
            assert_eq!(mirrored, 0);
        }
    }

    #[test]
    fn threshold_is_strict_and_signed_by_default() {
        let m = CorrelationMatrix::from_coefficients(
            names(&["x", "y", "z"]),
            vec![1.0, 0.5, -0.9, 0.5, 1.0, 0.2, -0.9, 0.2, 1.0],
        )
        .unwrap();

        let sig = significant_pairs(&m, &CorrelationConfig::default()).unwrap();
        assert!(sig.is_empty());

        let abs = CorrelationConfig {
            threshold: 0.5,
            absolute: true,
        };
        let sig = significant_pairs(&m, &abs).unwrap();
        assert_eq!(sig.pairs.len(), 1);
        assert_eq!(sig.pairs[0].variable_a, "x");
        assert_eq!(sig.pairs[0].variable_b, "z");
        assert_eq!(sig.correlated_columns, vec!["x", "z"]);
    }

    #[test]
    fn non_finite_threshold_rejected() {
        let config = CorrelationConfig {
            threshold: f64::NAN,
            absolute: false,
        };
        assert!(matches!(
            significant_pairs(&abc_matrix(), &config),
            Err(StatsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn analysis_end_to_end() {
        let df = frame();
        let result = correlation_analysis(&df, &CorrelationConfig::default()).unwrap();
        assert_eq!(result.classification.categorical, vec!["label"]);
        assert_eq!(result.matrix.size(), 3);
        assert_eq!(result.significant.pairs.len(), 1);
        assert_eq!(result.significant.pairs[0].variable_a, "a");
        assert_eq!(result.significant.pairs[0].variable_b, "b");
        assert!(result.significant.pairs[0].p_value < 0.05);
    }
}
