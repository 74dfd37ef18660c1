use crate::config::ExtractOptions;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;

static TYPE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""type"\s*:\s*"([^"]*)""#).expect("TYPE_VALUE is valid"));

static LABELS_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"labels"\s*:\s*\[(.*?)\]"#).expect("LABELS_ARRAY is valid")
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("QUOTED is valid"));

static DATA_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""data"\s*:\s*\[([\d\s,.\-]+)\]"#).expect("DATA_ARRAY is valid")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d.\-]+").expect("NUMBER is valid"));

static LABEL_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""label"\s*:\s*"([^"]*)""#).expect("LABEL_VALUE is valid"));

static BG_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""backgroundColor"\s*:\s*"([^"]*)""#).expect("BG_VALUE is valid")
});

const PALETTE: [&str; 10] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#34495e", "#e67e22",
    "#95a5a6", "#f1c40f",
];

/// Tier 3: rebuild a minimal chart from a block no parser will ever accept.
///
/// Each part is pulled out independently: the first `"type"` value, the
/// quoted strings of the first `"labels"` array, every numeric `"data"`
/// array, and the `"label"`/`"backgroundColor"` values, zipped positionally
/// in extraction order. When labels are missing but numeric data exists,
/// generic `Item_1..Item_N` labels are synthesized from the first dataset.
/// Returns `None` when neither labels nor datasets could be found.
pub fn salvage_chart(block: &str, options: &ExtractOptions) -> Option<Value> {
    let chart_type = match TYPE_VALUE.captures(block) {
        Some(caps) => caps[1].to_string(),
        None => options.fallback_chart_type.clone(),
    };
    if chart_type.is_empty() {
        return None;
    }

    let mut labels: Vec<String> = LABELS_ARRAY
        .captures(block)
        .map(|caps| {
            QUOTED
                .captures_iter(&caps[1])
                .map(|q| q[1].to_string())
                .collect()
        })
        .unwrap_or_default();

    let dataset_labels: Vec<String> = LABEL_VALUE
        .captures_iter(block)
        .map(|caps| caps[1].to_string())
        .collect();
    let colors: Vec<String> = BG_VALUE
        .captures_iter(block)
        .map(|caps| caps[1].to_string())
        .collect();

    let datasets: Vec<Value> = DATA_ARRAY
        .captures_iter(block)
        .enumerate()
        .filter_map(|(i, caps)| {
            let values: Vec<Value> = NUMBER
                .find_iter(&caps[1])
                .filter_map(|m| parse_number(m.as_str()))
                .collect();
            if values.is_empty() {
                return None;
            }
            let label = dataset_labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("Dataset {}", i + 1));
            let color = colors
                .get(i)
                .map(String::as_str)
                .unwrap_or(PALETTE[0])
                .to_string();
            Some(json!({
                "label": label,
                "data": values,
                "backgroundColor": color,
            }))
        })
        .collect();

    if labels.is_empty() && datasets.is_empty() {
        return None;
    }

    if labels.is_empty() {
        let arity = datasets[0]["data"].as_array().map(Vec::len).unwrap_or(0);
        labels = (1..=arity).map(|i| format!("Item_{}", i)).collect();
    }

    Some(json!({
        "type": chart_type,
        "data": {
            "labels": labels,
            "datasets": datasets,
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "title": {
                    "display": true,
                    "text": format!("{} Chart", title_case(&chart_type)),
                }
            }
        }
    }))
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::from(i));
    }
    text.parse::<f64>().ok().map(Value::from)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
