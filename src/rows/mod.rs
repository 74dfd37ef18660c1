//! Row materialization: turning raw query-result rows into name-keyed rows.

mod literal;

pub use literal::parse_literal_rows;

use serde_json::{Map, Value};
use tracing::debug;

/// A name-keyed result row.
pub type ResultRow = Map<String, Value>;

/// Shape of one incoming raw row.
///
/// Raw rows arrive as whatever the executor produced: positional tuples,
/// already name-keyed mappings, or junk. Each variant is handled explicitly;
/// junk contributes nothing.
#[derive(Debug, Clone)]
pub enum RawRow {
    Tuple(Vec<Value>),
    Mapping(ResultRow),
    Unrecognized,
}

impl From<&Value> for RawRow {
    fn from(value: &Value) -> Self {
        match value {
            Value::Array(items) => RawRow::Tuple(items.clone()),
            Value::Object(map) => RawRow::Mapping(map.clone()),
            _ => RawRow::Unrecognized,
        }
    }
}

/// Materializes raw rows against a column schema.
///
/// Mapping rows pass through unchanged. Tuple rows zip positionally against
/// `columns`; when `columns` is empty, generic `Column_1..Column_N` names are
/// synthesized from the arity of the first tuple row. Ragged rows are
/// tolerated: values beyond the column count are dropped, columns beyond the
/// value count are omitted from that row.
pub fn materialize(raw_rows: &[Value], columns: &[String]) -> Vec<ResultRow> {
    let names = if columns.is_empty() {
        match raw_rows.iter().map(RawRow::from).find_map(|r| match r {
            RawRow::Tuple(items) => Some(synthesized_columns(items.len())),
            _ => None,
        }) {
            Some(generated) => generated,
            None => Vec::new(),
        }
    } else {
        columns.to_vec()
    };

    let rows: Vec<ResultRow> = raw_rows
        .iter()
        .map(RawRow::from)
        .filter_map(|raw| match raw {
            RawRow::Mapping(map) => Some(map),
            RawRow::Tuple(items) => Some(zip_row(&items, &names)),
            RawRow::Unrecognized => {
                debug!("skipping unrecognized raw row shape");
                None
            }
        })
        .collect();

    crate::metrics::record_rows_materialized(rows.len());
    rows
}

/// Generic 1-based column names for schemaless tuple rows.
pub fn synthesized_columns(arity: usize) -> Vec<String> {
    (1..=arity).map(|i| format!("Column_{}", i)).collect()
}

fn zip_row(items: &[Value], names: &[String]) -> ResultRow {
    names
        .iter()
        .zip(items.iter())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
