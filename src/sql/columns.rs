use crate::config::ExtractOptions;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--[^\n]*").expect("LINE_COMMENT pattern is valid"));

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("BLOCK_COMMENT pattern is valid"));

static SELECT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bSELECT\s+(.*?)\s+FROM\b").expect("SELECT_FROM pattern is valid")
});

static SELECT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bSELECT\b").expect("SELECT_KEYWORD pattern is valid"));

static FROM_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+FROM\b").expect("FROM_KEYWORD pattern is valid"));

static AS_ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)\s+AS\s+(.+)$").expect("AS_ALIAS pattern is valid"));

static SQL_FUNCTION_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(SUM|COUNT|AVG|MIN|MAX|COALESCE|CASE|WHEN|THEN|ELSE|END)\b")
        .expect("SQL_FUNCTION_KEYWORDS pattern is valid")
});

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()/*+\-]").expect("PUNCTUATION pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN pattern is valid"));

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("IDENTIFIER pattern is valid")
});

/// Keywords that disqualify a trailing token from being an implicit alias.
const TRAILING_KEYWORDS: [&str; 7] = ["AND", "OR", "NOT", "IS", "NULL", "LIKE", "IN"];

/// Keywords that can never be a derived column name.
const NAME_KEYWORDS: [&str; 10] = [
    "AS", "FROM", "WHERE", "AND", "OR", "NOT", "IS", "NULL", "LIKE", "IN",
];

const OPERATOR_CHARS: &[char] = &['(', ')', '/', '*', '+', '-', '=', '<', '>'];

/// Extracts the ordered column names implied by a `SELECT` statement.
///
/// Handles CTEs, subqueries, quoted literals, and function calls. Total over
/// its input: empty/blank SQL, `SELECT *`, and anything unrecognizable all
/// yield `[]` so callers can synthesize `Column_<i>` names from row arity.
pub fn extract_columns(sql: &str) -> Vec<String> {
    extract_columns_with(sql, &ExtractOptions::default())
}

pub fn extract_columns_with(sql: &str, options: &ExtractOptions) -> Vec<String> {
    if sql.trim().is_empty() {
        return Vec::new();
    }

    let projection = match find_main_projection(sql.trim()) {
        Some(p) => p,
        None => {
            debug!("no main SELECT projection found");
            return Vec::new();
        }
    };

    if projection.trim() == "*" {
        return Vec::new();
    }

    let columns: Vec<String> = split_projection(&projection)
        .into_iter()
        .filter(|fragment| !fragment.trim().is_empty())
        .map(|fragment| derive_column_name(fragment.trim(), options.max_alias_len))
        .collect();

    debug!(count = columns.len(), "extracted column names");
    crate::metrics::record_columns_extracted(columns.len());
    columns
}

/// Finds the projection list of the final, top-level `SELECT ... FROM`.
fn find_main_projection(sql: &str) -> Option<String> {
    let stripped = strip_comments(sql);
    let query = stripped.trim();

    if query.to_uppercase().starts_with("WITH") {
        final_projection_after_cte(query)
    } else {
        SELECT_FROM
            .captures(query)
            .map(|caps| caps[1].to_string())
    }
}

fn strip_comments(sql: &str) -> String {
    let without_line = LINE_COMMENT.replace_all(sql, "");
    BLOCK_COMMENT.replace_all(&without_line, "").into_owned()
}

/// Scans `SELECT` split points from last to first; the first whose preceding
/// text has a paren balance of exactly zero is the outermost SELECT. CTE
/// bodies and subqueries sit inside unclosed parens at their split point, so
/// their balance is non-zero and they are skipped.
fn final_projection_after_cte(query: &str) -> Option<String> {
    let parts: Vec<&str> = SELECT_KEYWORD.split(query).collect();
    if parts.len() < 2 {
        return None;
    }

    for i in (1..parts.len()).rev() {
        let balance: i64 = parts[..i]
            .iter()
            .map(|part| {
                part.chars().filter(|&c| c == '(').count() as i64
                    - part.chars().filter(|&c| c == ')').count() as i64
            })
            .sum();

        if balance == 0 {
            if let Some(from) = FROM_KEYWORD.find(parts[i]) {
                return Some(parts[i][..from.start()].to_string());
            }
        }
    }

    None
}

/// Splits a projection list on commas, but only at paren depth zero and
/// outside `"` `'` `` ` `` quoted literals.
fn split_projection(projection: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut paren_depth: i32 = 0;
    let mut quote_char: Option<char> = None;

    for c in projection.chars() {
        match quote_char {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote_char = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => {
                    quote_char = Some(c);
                    current.push(c);
                }
                '(' => {
                    paren_depth += 1;
                    current.push(c);
                }
                ')' => {
                    paren_depth -= 1;
                    current.push(c);
                }
                ',' if paren_depth == 0 => {
                    parts.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Derives a column name from one projection fragment.
///
/// Priority order is policy, not accident — downstream behavior depends on
/// these exact tie-breaks:
///   1. explicit `AS alias`
///   2. implicit trailing-token alias
///   3. bare `table.column` reference
///   4. first identifier left after stripping aggregates and punctuation
///   5. slugified fragment, or the literal `column`
///
/// Rule 2 knowingly misreads `price * quantity` (no alias) as aliasing
/// `quantity`; kept as-is.
fn derive_column_name(fragment: &str, max_alias_len: usize) -> String {
    if let Some(caps) = AS_ALIAS.captures(fragment) {
        return strip_quotes(caps[1].trim()).to_string();
    }

    if let Some(alias) = implicit_trailing_alias(fragment) {
        return alias;
    }

    if fragment.contains('.') && !fragment.contains(['(', ')', '/', '*', '+', '-']) {
        if let Some(last) = fragment.rsplit('.').next() {
            return strip_quotes(last.trim()).to_string();
        }
    }

    if let Some(name) = first_identifier_token(fragment) {
        return name;
    }

    slugify(fragment, max_alias_len)
}

fn implicit_trailing_alias(fragment: &str) -> Option<String> {
    let words: Vec<&str> = fragment.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }

    let last = words[words.len() - 1];
    if last.contains(OPERATOR_CHARS)
        || TRAILING_KEYWORDS.contains(&last.to_uppercase().as_str())
        || last.starts_with('\'')
        || last.starts_with('"')
    {
        return None;
    }

    // A token right after a closing or opening paren is part of the
    // expression, not an alias.
    let before = words[..words.len() - 1].join(" ");
    if before.ends_with('(') || before.ends_with(')') {
        return None;
    }

    Some(strip_quotes(last).to_string())
}

fn first_identifier_token(fragment: &str) -> Option<String> {
    let cleaned = SQL_FUNCTION_KEYWORDS.replace_all(fragment, "");
    let cleaned = PUNCTUATION.replace_all(&cleaned, " ");
    let cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ");

    for word in cleaned.trim().split(' ') {
        let word = strip_quotes(word);
        if !word.is_empty()
            && !NAME_KEYWORDS.contains(&word.to_uppercase().as_str())
            && !word.chars().all(|c| c.is_ascii_digit())
            && IDENTIFIER.is_match(word)
        {
            return Some(word.to_string());
        }
    }

    None
}

fn slugify(fragment: &str, max_alias_len: usize) -> String {
    let cleaned = PUNCTUATION.replace_all(fragment, "");
    let slug = WHITESPACE_RUN
        .replace_all(cleaned.trim(), "_")
        .into_owned();

    if slug.is_empty() {
        return "column".to_string();
    }
    slug.chars().take(max_alias_len).collect()
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}
