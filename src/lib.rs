//! # autostat
//!
//! Robust statistics engine for tabular data.
//!
//! autostat takes an in-memory dataset and computes what a dashboard needs
//! to show about it, without ever failing the whole analysis because of
//! local data quality problems:
//!
//! - **Classification** — split columns into numeric and categorical sets
//! - **Correlation** — NaN/Inf-safe Pearson r with p-values, a symmetric
//!   matrix, and deduplicated above-threshold pairs
//! - **Filtering** — inclusive numeric range predicates, combined with AND
//! - **Grouping** — per-group mean/count/std and value-count tables
//!
//! Every operation is a pure function of its inputs. Frames are never
//! mutated; filters return new frames.
//!
//! ## Modules
//!
//! - [`dataframe`] — Column-major tabular data model (DataFrame, Column, DataType)
//! - [`csv_parser`] — CSV loading with automatic type inference
//! - [`classify`] — Numeric/categorical column partition
//! - [`analysis`] — Safe Pearson correlation, correlation matrix, significant pairs
//! - [`filter`] — Range predicates and filtered views
//! - [`grouping`] — Grouped aggregates and value counts
//! - [`profiling`] — Column info and descriptive statistics
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use autostat::analysis::{correlation_analysis, CorrelationConfig};
//! use autostat::csv_parser::CsvParser;
//! use autostat::filter::{filter_range, RangePredicate};
//!
//! let csv = "make,horsepower,price\n\
//!            audi,102,13950\naudi,115,17450\nbmw,101,16430\n\
//!            honda,58,6479\nvolvo,114,12940\ntoyota,62,?\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//!
//! let pred = RangePredicate::new("price", 5000.0, 17000.0).unwrap();
//! let affordable = filter_range(&df, &pred).unwrap();
//! assert_eq!(affordable.row_count(), 4);
//!
//! let result = correlation_analysis(&affordable, &CorrelationConfig::default()).unwrap();
//! assert_eq!(result.classification.numeric, vec!["horsepower", "price"]);
//! assert_eq!(result.significant.pairs.len(), 1);
//! ```

pub mod analysis;
pub mod classify;
pub mod csv_parser;
pub mod dataframe;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod profiling;

pub use error::{Result, StatsError};
