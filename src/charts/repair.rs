use crate::error::Result;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TOOLTIP_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""tooltip"\s*:\s*\{"#).expect("TOOLTIP_OPEN is valid"));

static TOOLTIP_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",?\s*"tooltip"\s*:\s*\{"#).expect("TOOLTIP_MEMBER is valid"));

static CALLBACKS_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#",?\s*"callbacks"\s*:\s*\{"#).expect("CALLBACKS_MEMBER is valid")
});

static FUNCTION_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)function\s*\([^)]*\)\s*\{[^}]*\}").expect("FUNCTION_BODY is valid")
});

static PROPERTY_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"[^"]*"\s*:\s*function[^,}]*[,}]"#).expect("PROPERTY_FUNCTION is valid")
});

static DOUBLE_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*,").expect("DOUBLE_COMMA is valid"));

static COMMA_BEFORE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("COMMA_BEFORE_CLOSE is valid"));

static COMMA_AFTER_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*,").expect("COMMA_AFTER_OPEN is valid"));

static DANGLING_COLON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*,").expect("DANGLING_COLON is valid"));

/// Tier 1: light cleaning, then a strict parse.
///
/// LLMs decorate chart configs with JavaScript (`tooltip.callbacks` handlers,
/// bare `function` bodies) and sloppy commas. This collapses those to valid
/// JSON without touching the chart data itself.
pub fn clean_and_parse(block: &str) -> Result<Value> {
    let parsed = serde_json::from_str(&clean_for_parsing(block))?;
    Ok(parsed)
}

pub(crate) fn clean_for_parsing(block: &str) -> String {
    let cleaned = collapse_tooltip_subtrees(block);
    let cleaned = FUNCTION_BODY.replace_all(&cleaned, "null");
    // Can eat the member's trailing delimiter; tiers 2 and 3 are the net.
    let cleaned = PROPERTY_FUNCTION.replace_all(&cleaned, "");
    let cleaned = DOUBLE_COMMA.replace_all(&cleaned, ",");
    let cleaned = COMMA_BEFORE_CLOSE.replace_all(&cleaned, "$1");
    let cleaned = COMMA_AFTER_OPEN.replace_all(&cleaned, "{");
    let cleaned = DANGLING_COLON.replace_all(&cleaned, ": null,");
    cleaned.into_owned()
}

/// Replaces every `"tooltip": {...}` subtree that carries callback functions
/// with `"tooltip": {}`, walking braces so nested function bodies are
/// consumed whole.
fn collapse_tooltip_subtrees(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut rest = block;

    while let Some(m) = TOOLTIP_OPEN.find(rest) {
        let open = m.end() - 1;
        let Some(close) = matching_brace(rest, open) else {
            break;
        };
        let subtree = &rest[open..=close];
        if subtree.contains("callbacks") && subtree.contains("function") {
            out.push_str(&rest[..m.start()]);
            out.push_str(r#""tooltip": {}"#);
        } else {
            out.push_str(&rest[..=close]);
        }
        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Tier 2: aggressive repair, then a strict parse.
///
/// Strips whole `tooltip`/`callbacks` members outright, drops any line range
/// that a running brace counter attributes to a `function` body, and
/// re-cleans the commas the surgery leaves behind.
pub fn repair_and_parse(block: &str) -> Result<Value> {
    let repaired = strip_member_subtrees(block, &TOOLTIP_MEMBER);
    let repaired = strip_member_subtrees(&repaired, &CALLBACKS_MEMBER);
    let repaired = FUNCTION_BODY.replace_all(&repaired, "null");
    let repaired = drop_function_lines(&repaired);

    let repaired = DOUBLE_COMMA.replace_all(&repaired, ",");
    let repaired = COMMA_BEFORE_CLOSE.replace_all(&repaired, "$1");
    let repaired = COMMA_AFTER_OPEN.replace_all(&repaired, "{");

    let parsed = serde_json::from_str(&repaired)?;
    Ok(parsed)
}

/// Removes whole `"name": {...}` members (with any leading comma) wherever
/// `member_open` matches, again walking braces to find the subtree end.
fn strip_member_subtrees(block: &str, member_open: &Regex) -> String {
    let mut out = String::with_capacity(block.len());
    let mut rest = block;

    while let Some(m) = member_open.find(rest) {
        let open = m.end() - 1;
        let Some(close) = matching_brace(rest, open) else {
            break;
        };
        out.push_str(&rest[..m.start()]);
        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    out
}

fn matching_brace(s: &str, open: usize) -> Option<usize> {
    let mut depth: i32 = 0;
    for (i, c) in s[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drops every line belonging to a `function` body. The counter starts on the
/// line where `function` appears and the body ends when the running brace
/// balance returns to zero or below.
fn drop_function_lines(block: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_function = false;
    let mut brace_count: i64 = 0;

    for line in block.lines() {
        let delta = line.matches('{').count() as i64 - line.matches('}').count() as i64;
        if in_function {
            brace_count += delta;
            if brace_count <= 0 {
                in_function = false;
            }
        } else if line.contains("function") {
            in_function = true;
            brace_count = delta;
            if brace_count <= 0 {
                in_function = false;
            }
        } else {
            kept.push(line);
        }
    }

    kept.join("\n")
}
