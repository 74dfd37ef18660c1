//! Markdown table extraction: the fallback row source when no raw result
//! rows accompany the response text.

use crate::rows::ResultRow;
use serde_json::Value;
use tracing::debug;

/// Parses the first markdown table in the text into name-keyed rows.
///
/// The first pipe-delimited line that is not a separator becomes the header;
/// the table is the contiguous run of pipe-delimited lines that follows.
/// Separator lines (only `|`, `-`, `:`, space) are skipped, and a data line
/// must carry at least as many cells as the header to count. Numeric-looking
/// cells are coerced after stripping `,` and `$`: values with a `.` parse as
/// floats, all-digit values as integers, anything else stays a string.
pub fn extract_table_rows(text: &str) -> Vec<ResultRow> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let Some(start) = lines.iter().position(|line| is_header_line(line)) else {
        debug!("no markdown table found in response text");
        return Vec::new();
    };

    let block: Vec<&str> = lines[start..]
        .iter()
        .take_while(|line| line.contains('|'))
        .copied()
        .collect();

    let headers = split_cells(block[0]);
    if headers.is_empty() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    for line in &block[1..] {
        if is_separator_line(line) {
            continue;
        }
        let values = split_cells(line);
        if values.len() < headers.len() {
            debug!("skipping ragged table row");
            continue;
        }
        let row: ResultRow = headers
            .iter()
            .zip(values.iter())
            .map(|(header, value)| (header.to_string(), coerce_cell(value)))
            .collect();
        rows.push(row);
    }

    rows
}

fn is_header_line(line: &str) -> bool {
    line.contains('|') && !is_separator_line(line)
}

fn is_separator_line(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| "|-: ".contains(c))
}

fn split_cells(line: &str) -> Vec<&str> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Coerces a numeric-looking cell; on any parse failure the original text
/// survives unchanged, currency signs and thousands separators included.
fn coerce_cell(value: &str) -> Value {
    let clean = value.replace([',', '$'], "");
    if clean.contains('.') {
        if let Ok(f) = clean.parse::<f64>() {
            return Value::from(f);
        }
    } else if !clean.is_empty() && clean.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(i) = clean.parse::<i64>() {
            return Value::from(i);
        }
    }
    Value::String(value.to_string())
}
