//! The response pipeline: one call that turns a raw response turn into
//! structured artifacts.

use crate::charts::{extract_charts_with, merge_charts};
use crate::config::ExtractOptions;
use crate::response::extract_description_with;
use crate::rows::{materialize, parse_literal_rows, ResultRow};
use crate::sql::{extract_columns_with, extract_sql_from_text};
use crate::table::extract_table_rows;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Everything recovered from one response turn.
#[derive(Debug, Clone, Serialize)]
pub struct AnalystResponse {
    pub sql: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<ResultRow>,
    pub charts: Vec<Value>,
    pub description: String,
}

/// Runs every extractor over a response turn with one shared set of options.
#[derive(Debug, Clone, Default)]
pub struct ResponsePipeline {
    options: ExtractOptions,
}

impl ResponsePipeline {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extracts all artifacts from response text plus the raw rows the query
    /// executor produced. When no raw rows are available, rows fall back to
    /// the first markdown table in the text. Total: any input yields a
    /// response, possibly with empty parts.
    pub fn parse(&self, text: &str, raw_rows: &[Value]) -> AnalystResponse {
        let sql = extract_sql_from_text(text);
        let columns = sql
            .as_deref()
            .map(|statement| extract_columns_with(statement, &self.options))
            .unwrap_or_default();

        let rows = if raw_rows.is_empty() {
            debug!("no raw rows supplied, falling back to markdown table");
            extract_table_rows(text)
        } else {
            materialize(raw_rows, &columns)
        };

        let charts = merge_charts(&[extract_charts_with(text, &self.options)]);
        let description = extract_description_with(text, &self.options);

        AnalystResponse {
            sql,
            columns,
            rows,
            charts,
            description,
        }
    }

    /// Like [`parse`](Self::parse), but the rows arrive as the printed form
    /// of a Python-style literal (`[(1, 'a'), (2, 'b')]`). An unparseable
    /// literal degrades to the markdown-table fallback.
    pub fn parse_with_literal_rows(&self, text: &str, literal: &str) -> AnalystResponse {
        let raw_rows = parse_literal_rows(literal).unwrap_or_default();
        self.parse(text, &raw_rows)
    }
}
