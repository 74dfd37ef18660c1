use metrics::counter;

pub fn record_columns_extracted(count: usize) {
    counter!("sql_columns_extracted_total").increment(count as u64);
}

pub fn record_chart_recovered(tier: &'static str) {
    counter!("charts_recovered_total", "tier" => tier).increment(1);
}

pub fn record_chart_discarded() {
    counter!("charts_discarded_total").increment(1);
}

pub fn record_duplicate_chart_dropped() {
    counter!("charts_duplicates_dropped_total").increment(1);
}

pub fn record_rows_materialized(count: usize) {
    counter!("rows_materialized_total").increment(count as u64);
}
