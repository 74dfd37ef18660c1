use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static SQL_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```sql\s*\n(.*?)\n\s*```").expect("SQL_FENCE is valid"));

static BARE_FENCE_SELECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```\s*\n(SELECT.*?);?\n\s*```").expect("BARE_FENCE_SELECT is valid")
});

static BARE_SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bSELECT\b.*").expect("BARE_SELECT is valid"));

static QUERY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bQuery:\s*(SELECT\b.*)").expect("QUERY_PREFIX is valid")
});

static SQL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\bSQL:\s*(SELECT\b.*)").expect("SQL_PREFIX is valid"));

static HERE_IS_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Here is the query:\s*(SELECT\b.*)").expect("HERE_IS_PREFIX is valid")
});

/// Recovers the SQL statement from free-form response text.
///
/// Patterns are tried in order and the first match wins: a fenced ```sql
/// block, a bare fenced block starting with SELECT, a `Query:` / `SQL:` /
/// `Here is the query:` prefixed span, then any inline `SELECT ...` span.
/// Inline spans end at the first blank line, table pipe, or end of text.
pub fn extract_sql_from_text(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }

    if let Some(caps) = SQL_FENCE.captures(text) {
        let sql = caps[1].trim();
        if !sql.is_empty() {
            debug!("SQL recovered from fenced sql block");
            return Some(sql.to_string());
        }
    }

    if let Some(caps) = BARE_FENCE_SELECT.captures(text) {
        debug!("SQL recovered from bare fenced block");
        return Some(caps[1].trim().to_string());
    }

    for pattern in [&QUERY_PREFIX, &SQL_PREFIX, &HERE_IS_PREFIX] {
        if let Some(caps) = pattern.captures(text) {
            debug!("SQL recovered from prefixed span");
            return Some(cut_at_terminator(&caps[1]));
        }
    }

    if let Some(m) = BARE_SELECT.find(text) {
        debug!("SQL recovered from inline SELECT span");
        return Some(cut_at_terminator(m.as_str()));
    }

    debug!("no SQL statement found in response text");
    None
}

/// Truncates an inline SQL span at the first blank line or markdown table
/// pipe, then drops any trailing semicolon.
fn cut_at_terminator(span: &str) -> String {
    let end = ["\n\n", "\n|"]
        .iter()
        .filter_map(|t| span.find(t))
        .min()
        .unwrap_or(span.len());

    span[..end].trim().trim_end_matches(';').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_sql_block() {
        let text = "Here you go:\n```sql\nSELECT a FROM t\n```\nDone.";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a FROM t".to_string())
        );
    }

    #[test]
    fn test_fenced_sql_block_uppercase_tag() {
        let text = "```SQL\nSELECT a FROM t\n```";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a FROM t".to_string())
        );
    }

    #[test]
    fn test_fenced_block_preferred_over_inline() {
        let text = "First SELECT x FROM y inline.\n```sql\nSELECT a FROM t\n```";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a FROM t".to_string())
        );
    }

    #[test]
    fn test_bare_fence_with_select() {
        let text = "```\nSELECT a, b FROM t;\n```";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a, b FROM t".to_string())
        );
    }

    #[test]
    fn test_inline_select_cut_at_blank_line() {
        let text = "The query is SELECT a FROM t WHERE x = 1\n\nAnd the results show...";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a FROM t WHERE x = 1".to_string())
        );
    }

    #[test]
    fn test_inline_select_cut_at_table_pipe() {
        let text = "SELECT a FROM t\n| a |\n|---|\n| 1 |";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a FROM t".to_string())
        );
    }

    #[test]
    fn test_inline_select_trailing_semicolon_dropped() {
        let text = "Run SELECT a FROM t;";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a FROM t".to_string())
        );
    }

    #[test]
    fn test_multiline_statement_in_fence() {
        let text = "```sql\nSELECT a,\n       b\nFROM t\n```";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a,\n       b\nFROM t".to_string())
        );
    }

    #[test]
    fn test_prefixed_query_wins_over_earlier_prose_select() {
        let text = "We select carefully.\nQuery: SELECT a FROM t";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a FROM t".to_string())
        );
    }

    #[test]
    fn test_no_sql() {
        assert_eq!(extract_sql_from_text("There were no results."), None);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extract_sql_from_text(""), None);
        assert_eq!(extract_sql_from_text("  \n "), None);
    }

    #[test]
    fn test_empty_fenced_block_falls_through() {
        let text = "```sql\n\n```\nSELECT a FROM t";
        assert_eq!(
            extract_sql_from_text(text),
            Some("SELECT a FROM t".to_string())
        );
    }

    #[test]
    fn test_cut_at_terminator_no_terminator() {
        assert_eq!(cut_at_terminator("SELECT 1"), "SELECT 1");
    }
}
