use criterion::{criterion_group, criterion_main, Criterion};
use fitmetrics::{
    rank_sales, sales_breakdown, sales_trend, AnalyticsConfig, Period, SalesDimension,
    SalesRankingMetric, SalesRecord,
};

fn synthetic_sales(count: usize) -> Vec<SalesRecord> {
    let categories = ["Memberships", "Classes", "Apparel", "Supplements"];
    let locations = ["Bandra", "Juhu", "Powai"];

    (0..count)
        .map(|i| SalesRecord {
            payment_date: format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
            customer_email: Some(format!("customer{}@example.com", i % 500)),
            cleaned_category: Some(categories[i % categories.len()].to_string()),
            calculated_location: Some(locations[i % locations.len()].to_string()),
            payment_value: (i % 900) as f64 + 100.0,
            discount_amount: if i % 3 == 0 { Some((i % 200) as f64) } else { None },
            ..Default::default()
        })
        .collect()
}

fn benchmark_category_breakdown(c: &mut Criterion) {
    let records = synthetic_sales(20_000);
    let config = AnalyticsConfig::default();

    c.bench_function("sales_breakdown_by_category_20k", |b| {
        b.iter(|| sales_breakdown(&records, SalesDimension::Category, &config))
    });
}

fn benchmark_breakdown_and_ranking(c: &mut Criterion) {
    let records = synthetic_sales(20_000);
    let config = AnalyticsConfig::default();

    c.bench_function("breakdown_then_rank_20k", |b| {
        b.iter(|| {
            let rows = sales_breakdown(&records, SalesDimension::Location, &config);
            rank_sales(&rows, SalesRankingMetric::Revenue, 10)
        })
    });
}

fn benchmark_monthly_trend(c: &mut Criterion) {
    let records = synthetic_sales(20_000);
    let config = AnalyticsConfig::default();

    c.bench_function("sales_trend_monthly_20k", |b| {
        b.iter(|| sales_trend(&records, Period::Monthly, &config))
    });
}

criterion_group!(
    benches,
    benchmark_category_breakdown,
    benchmark_breakdown_and_ranking,
    benchmark_monthly_trend
);
criterion_main!(benches);
