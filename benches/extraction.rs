use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use analyst_extract::{extract_charts, extract_columns, materialize, ResponsePipeline};

const SIMPLE_SQL: &str = "SELECT id, name, total FROM orders";

const CTE_SQL: &str = "WITH monthly AS (SELECT month, SUM(amount) AS total FROM sales GROUP BY month), \
     ranked AS (SELECT month, total, RANK() OVER (ORDER BY total DESC) AS rnk FROM monthly) \
     SELECT month, total, rnk FROM ranked WHERE rnk <= 10";

const COMPLEX_SQL: &str = "SELECT o.id, c.name customer, COALESCE(o.discount, 0) AS discount, \
     SUM(o.amount) AS total, COUNT(*) AS n, CASE WHEN o.amount > 100 THEN 'big' ELSE 'small' END AS bucket \
     FROM orders o JOIN customers c ON o.customer_id = c.id GROUP BY o.id, c.name, o.discount, o.amount";

const CLEAN_CHART: &str = "```json\n{\"type\": \"bar\", \"data\": {\"labels\": [\"A\", \"B\", \"C\"], \
     \"datasets\": [{\"label\": \"s\", \"data\": [1, 2, 3]}]}}\n```";

const BROKEN_CHART: &str = "```json\n{\n  \"type\": \"line\",\n  \"data\": {\"labels\": [\"A\", \"B\"], \
     \"datasets\": [{\"label\": \"s\", \"data\": [1, 2],}],},\n  \"options\": {\"plugins\": {\"tooltip\": \
     {\"callbacks\": {\"label\": function(ctx) { return ctx.label; }}}}}\n}\n```";

fn bench_column_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_extraction");

    for (name, sql) in [
        ("simple", SIMPLE_SQL),
        ("cte", CTE_SQL),
        ("complex", COMPLEX_SQL),
    ] {
        group.bench_with_input(BenchmarkId::new("extract_columns", name), sql, |b, sql| {
            b.iter(|| black_box(extract_columns(sql)))
        });
    }

    group.finish();
}

fn bench_chart_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_recovery");

    for (name, text) in [("clean", CLEAN_CHART), ("broken", BROKEN_CHART)] {
        group.bench_with_input(BenchmarkId::new("extract_charts", name), text, |b, text| {
            b.iter(|| black_box(extract_charts(text)))
        });
    }

    group.finish();
}

fn bench_row_materialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_materialization");

    let columns: Vec<String> = ["id", "name", "score", "active"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    for row_count in [100, 1000, 10000] {
        let raw: Vec<serde_json::Value> = (0..row_count)
            .map(|i| json!([i, format!("name_{}", i), i as f64 * 1.5, i % 2 == 0]))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("materialize", row_count),
            &raw,
            |b, raw| b.iter(|| black_box(materialize(raw, &columns))),
        );
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let text = format!(
        "The figures are in.\n\n```sql\n{}\n```\n\n| month | total |\n|---|---|\n| Jan | 100 |\n| Feb | 200 |\n\n{}\n\n{}",
        CTE_SQL, CLEAN_CHART, BROKEN_CHART
    );
    let pipeline = ResponsePipeline::default();

    c.bench_function("pipeline_parse", |b| {
        b.iter(|| black_box(pipeline.parse(&text, &[])))
    });
}

criterion_group!(
    benches,
    bench_column_extraction,
    bench_chart_recovery,
    bench_row_materialization,
    bench_full_pipeline
);
criterion_main!(benches);
