//! csv2sql library crate
//!
//! This is the library component of csv2sql, containing the conversion
//! pipeline that turns delimiter-separated files into SQL scripts:
//!
//! - Field delimiter detection from the first line of a file
//! - Identifier normalization for table and column names
//! - Column type inference from a bounded sample of rows
//! - Dialect-aware literal escaping for MySQL and PostgreSQL
//! - `CREATE TABLE IF NOT EXISTS` and batched, transactional INSERT generation
//!
//! The pipeline reads the source twice (a short sample scan, then the full
//! stream) and never holds more than one batch of rows in memory.
//!
//! # Example
//!
//! ```
//! use csv2sql::config::ConvertConfig;
//! use csv2sql::convert::convert_rows;
//! use csv2sql::delimiter::Delimiter;
//! use csv2sql::dialect::Dialect;
//!
//! let config = ConvertConfig::new(Dialect::Postgres);
//! let rows = vec![vec!["1".to_string(), "Alice".to_string()]];
//! let mut out = Vec::<u8>::new();
//! let summary = convert_rows(
//!     &config, "people", Delimiter::Comma, &["id", "name"], rows, "people.csv", &mut out,
//! )
//! .unwrap();
//! assert_eq!(summary.record_count, 1);
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod delimiter;
pub mod dialect;
pub mod error;
pub mod escape;
pub mod generator;
pub mod inference;
pub mod logging;
pub mod normalize;
pub mod preview;
pub mod source;
pub mod table;
