//! Extraction and recovery pipeline for LLM data-analyst responses.
//!
//! An upstream text generator produces SQL queries, result narratives, and
//! chart configurations interleaved in prose, markdown fences, and near-JSON
//! snippets. This crate turns that stream into structured artifacts: the
//! column schema implied by a `SELECT`, materialized result rows, and a
//! deduplicated set of validated chart specs.
//!
//! Every public entry point is total over its input: malformed input degrades
//! to an empty or partial result, never an error or a panic.

pub mod charts;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod response;
pub mod rows;
pub mod sql;
pub mod table;

pub use charts::{extract_charts, is_valid_chart, merge_charts, ChartFingerprint};
pub use config::ExtractOptions;
pub use error::{Error, Result};
pub use pipeline::{AnalystResponse, ResponsePipeline};
pub use response::extract_description;
pub use rows::{materialize, parse_literal_rows, RawRow, ResultRow};
pub use sql::{extract_columns, extract_sql_from_text};
pub use table::extract_table_rows;
