use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// The chart types a spec may carry. Anything else is discarded.
pub const CHART_TYPES: [&str; 8] = [
    "bar",
    "line",
    "pie",
    "doughnut",
    "radar",
    "polarArea",
    "scatter",
    "bubble",
];

/// Gate applied to every recovery tier's output: the object must be a map,
/// `type` must be a whitelisted string, and `data` must itself be a map.
/// Labels and datasets are not required for validity, only for usefulness.
pub fn is_valid_chart(config: &Value) -> bool {
    let Some(obj) = config.as_object() else {
        return false;
    };
    let Some(chart_type) = obj.get("type").and_then(Value::as_str) else {
        return false;
    };
    if !CHART_TYPES.contains(&chart_type) {
        return false;
    }
    matches!(obj.get("data"), Some(Value::Object(_)))
}

/// Structural identity of a chart, independent of the pass that produced it.
///
/// Numbers are keyed by their JSON rendition, so `1` and `1.0` differ; both
/// sides of a real duplicate come from the same serializer, so renditions
/// agree in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartFingerprint {
    chart_type: String,
    labels: Vec<String>,
    datasets: Vec<(String, Vec<String>)>,
}

impl ChartFingerprint {
    pub fn of(chart: &Value) -> Self {
        let chart_type = chart
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let data = chart.get("data");

        let labels = data
            .and_then(|d| d.get("labels"))
            .and_then(Value::as_array)
            .map(|items| items.iter().map(render_scalar).collect())
            .unwrap_or_default();

        let datasets = data
            .and_then(|d| d.get("datasets"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|dataset| {
                        let label = dataset
                            .get("label")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        let points = dataset
                            .get("data")
                            .and_then(Value::as_array)
                            .map(|values| values.iter().map(render_scalar).collect())
                            .unwrap_or_default();
                        (label, points)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            chart_type,
            labels,
            datasets,
        }
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Merges chart lists harvested across generation passes, dropping structural
/// duplicates. Lists are concatenated in call order and the first occurrence
/// of each fingerprint wins, so the merged order is first-seen order.
pub fn merge_charts(chart_lists: &[Vec<Value>]) -> Vec<Value> {
    let mut seen: HashSet<ChartFingerprint> = HashSet::new();
    let mut merged = Vec::new();

    for list in chart_lists {
        for chart in list {
            if seen.insert(ChartFingerprint::of(chart)) {
                merged.push(chart.clone());
            } else {
                debug!("dropping duplicate chart across passes");
                crate::metrics::record_duplicate_chart_dropped();
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_chart() -> Value {
        json!({
            "type": "bar",
            "data": {
                "labels": ["A", "B"],
                "datasets": [{"label": "S", "data": [1, 2]}]
            }
        })
    }

    #[test]
    fn test_valid_chart() {
        assert!(is_valid_chart(&sample_chart()));
    }

    #[test]
    fn test_all_whitelisted_types_valid() {
        for chart_type in CHART_TYPES {
            let chart = json!({"type": chart_type, "data": {}});
            assert!(is_valid_chart(&chart), "type {} should be valid", chart_type);
        }
    }

    #[test]
    fn test_unsupported_type_invalid() {
        assert!(!is_valid_chart(&json!({"type": "unsupported", "data": {}})));
    }

    #[test]
    fn test_missing_data_invalid() {
        assert!(!is_valid_chart(&json!({"type": "bar"})));
    }

    #[test]
    fn test_data_not_object_invalid() {
        assert!(!is_valid_chart(&json!({"type": "bar", "data": [1, 2]})));
        assert!(!is_valid_chart(&json!({"type": "bar", "data": "x"})));
    }

    #[test]
    fn test_non_object_invalid() {
        assert!(!is_valid_chart(&json!([1, 2])));
        assert!(!is_valid_chart(&json!("bar")));
        assert!(!is_valid_chart(&json!(null)));
    }

    #[test]
    fn test_type_not_string_invalid() {
        assert!(!is_valid_chart(&json!({"type": 1, "data": {}})));
    }

    #[test]
    fn test_type_case_sensitive() {
        assert!(!is_valid_chart(&json!({"type": "Bar", "data": {}})));
        assert!(is_valid_chart(&json!({"type": "polarArea", "data": {}})));
    }

    #[test]
    fn test_fingerprint_equal_for_identical_charts() {
        assert_eq!(
            ChartFingerprint::of(&sample_chart()),
            ChartFingerprint::of(&sample_chart())
        );
    }

    #[test]
    fn test_fingerprint_ignores_options() {
        let mut with_options = sample_chart();
        with_options["options"] = json!({"responsive": true});
        assert_eq!(
            ChartFingerprint::of(&sample_chart()),
            ChartFingerprint::of(&with_options)
        );
    }

    #[test]
    fn test_fingerprint_differs_on_type() {
        let mut other = sample_chart();
        other["type"] = json!("line");
        assert_ne!(
            ChartFingerprint::of(&sample_chart()),
            ChartFingerprint::of(&other)
        );
    }

    #[test]
    fn test_fingerprint_differs_on_data() {
        let mut other = sample_chart();
        other["data"]["datasets"][0]["data"] = json!([1, 3]);
        assert_ne!(
            ChartFingerprint::of(&sample_chart()),
            ChartFingerprint::of(&other)
        );
    }

    #[test]
    fn test_fingerprint_differs_on_labels() {
        let mut other = sample_chart();
        other["data"]["labels"] = json!(["A", "C"]);
        assert_ne!(
            ChartFingerprint::of(&sample_chart()),
            ChartFingerprint::of(&other)
        );
    }

    #[test]
    fn test_merge_drops_cross_pass_duplicate() {
        let merged = merge_charts(&[vec![sample_chart()], vec![sample_chart()]]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_preserves_first_seen_order() {
        let mut second = sample_chart();
        second["type"] = json!("line");
        let merged = merge_charts(&[
            vec![sample_chart(), second.clone()],
            vec![second.clone(), sample_chart()],
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0]["type"], json!("bar"));
        assert_eq!(merged[1]["type"], json!("line"));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_charts(&[]).is_empty());
        assert!(merge_charts(&[vec![], vec![]]).is_empty());
    }

    #[test]
    fn test_merge_dedups_within_single_pass() {
        let merged = merge_charts(&[vec![sample_chart(), sample_chart()]]);
        assert_eq!(merged.len(), 1);
    }
}
