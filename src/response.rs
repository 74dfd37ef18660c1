//! Narrative description extraction from response text.

use crate::config::ExtractOptions;
use regex::Regex;
use std::sync::LazyLock;

static SQL_FENCE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```sql.*?```").expect("SQL_FENCE_BLOCK is valid"));

static ANY_FENCE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("ANY_FENCE_BLOCK is valid"));

static TOOL_CALL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Calling tool:.*?with args:.*?\n").expect("TOOL_CALL_LINE is valid")
});

static TOOL_RETURN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Tool.*?returned:.*?\n").expect("TOOL_RETURN_LINE is valid"));

const MIN_MEANINGFUL_LEN: usize = 10;

const DEFAULT_DESCRIPTION: &str = "Query executed successfully";

/// Reduces a response to its narrative with default options.
pub fn extract_description(text: &str) -> String {
    extract_description_with(text, &ExtractOptions::default())
}

/// Reduces a response to its narrative: code fences, tool-call chatter, and
/// markdown table lines are stripped, short fragments dropped, and the
/// survivors joined into one line capped at the configured length. Never
/// empty; when nothing meaningful survives, a stock success line is returned.
pub fn extract_description_with(text: &str, options: &ExtractOptions) -> String {
    let cleaned = SQL_FENCE_BLOCK.replace_all(text, "");
    let cleaned = ANY_FENCE_BLOCK.replace_all(&cleaned, "");
    let cleaned = TOOL_CALL_LINE.replace_all(&cleaned, "");
    let cleaned = TOOL_RETURN_LINE.replace_all(&cleaned, "");

    let meaningful: Vec<&str> = cleaned
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.chars().count() > MIN_MEANINGFUL_LEN
                && !line.starts_with("Calling tool")
                && !line.starts_with("Tool")
                && !line.starts_with("```")
                && !line.starts_with('|')
        })
        .collect();

    let description = meaningful.join(" ");
    if description.is_empty() {
        return DEFAULT_DESCRIPTION.to_string();
    }
    truncate_chars(&description, options.max_description_len)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
