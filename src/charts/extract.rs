use crate::charts::repair::{clean_and_parse, repair_and_parse};
use crate::charts::salvage::salvage_chart;
use crate::charts::validate::is_valid_chart;
use crate::config::ExtractOptions;
use crate::metrics::{record_chart_discarded, record_chart_recovered};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").expect("JSON_FENCE is valid"));

static INLINE_CHART_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\{\s*["']?type["']?\s*:\s*["'](bar|line|pie|doughnut|radar|polarArea|scatter|bubble)["']"#,
    )
    .expect("INLINE_CHART_START is valid")
});

/// Terminators that end an unfenced chart block: blank line, fence opener,
/// or markdown heading.
const INLINE_TERMINATORS: [&str; 3] = ["\n\n", "\n```", "\n#"];

/// Harvests every chart config from response text with default options.
pub fn extract_charts(text: &str) -> Vec<Value> {
    extract_charts_with(text, &ExtractOptions::default())
}

/// Harvests every chart config from response text.
///
/// Candidate blocks are fenced ```json blocks plus unfenced objects that open
/// with a whitelisted `"type":` key; the unfenced scan skips anything already
/// inside a fence. Each block runs the recovery tiers independently, so one
/// hopeless block never costs its siblings. Total: malformed input yields a
/// shorter list, never an error.
pub fn extract_charts_with(text: &str, options: &ExtractOptions) -> Vec<Value> {
    let mut charts = Vec::new();

    let mut fence_spans: Vec<(usize, usize)> = Vec::new();
    for caps in JSON_FENCE.captures_iter(text) {
        if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
            fence_spans.push((whole.start(), whole.end()));
            charts.extend(recover_chart(inner.as_str(), options));
        }
    }

    for m in INLINE_CHART_START.find_iter(text) {
        if fence_spans
            .iter()
            .any(|&(start, end)| m.start() >= start && m.start() < end)
        {
            continue;
        }
        let block = cut_inline_block(&text[m.start()..]);
        charts.extend(recover_chart(block, options));
    }

    charts
}

fn cut_inline_block(span: &str) -> &str {
    let end = INLINE_TERMINATORS
        .iter()
        .filter_map(|t| span.find(t))
        .min()
        .unwrap_or(span.len());
    span[..end].trim()
}

/// Runs one block through the recovery tiers: clean & parse, aggressive
/// repair, then regex salvage. A tier's output counts only when it passes
/// validation. Blocks that defeat all three tiers are dropped.
pub(crate) fn recover_chart(block: &str, options: &ExtractOptions) -> Option<Value> {
    if let Ok(chart) = clean_and_parse(block) {
        if is_valid_chart(&chart) {
            record_chart_recovered("tier1");
            return Some(chart);
        }
        debug!("cleaned block parsed but failed validation");
    }

    if let Ok(chart) = repair_and_parse(block) {
        if is_valid_chart(&chart) {
            debug!("chart recovered by aggressive repair");
            record_chart_recovered("tier2");
            return Some(chart);
        }
        debug!("repaired block parsed but failed validation");
    }

    if let Some(chart) = salvage_chart(block, options) {
        if is_valid_chart(&chart) {
            debug!("chart recovered by regex salvage");
            record_chart_recovered("salvage");
            return Some(chart);
        }
        debug!("salvaged block failed validation");
    }

    debug!("discarding unrecoverable chart block");
    record_chart_discarded();
    None
}
