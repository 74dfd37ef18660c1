//! Chart config recovery: harvesting Chart.js-style configs from response
//! text through escalating repair tiers, then validating and deduplicating.

mod extract;
mod repair;
mod salvage;
mod validate;

pub use extract::{extract_charts, extract_charts_with};
pub use validate::{is_valid_chart, merge_charts, ChartFingerprint, CHART_TYPES};
