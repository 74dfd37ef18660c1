//! SQL-side recovery: column-name extraction from a `SELECT` statement and
//! statement recovery from free-form response text.

pub mod columns;
pub mod statement;

pub use columns::{extract_columns, extract_columns_with};
pub use statement::extract_sql_from_text;
