use costcast_core::model::{Action, CustomerMetrics, Request, Settings};
use costcast_core::pricing::default_pricing;
use costcast_core::projection::{calculate_paygo_projection, calculate_ptu_projection, estimate};
use costcast_core::view::{View, export_view, import_view};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn action() -> Action {
    Action::new("triage ticket")
        .request(Request::new("GPT-4.1 2025-02-01 Global mini").tokens(3000.0, 400.0))
        .request(Request::new("GPT-5 2025-08-07 Global nano").tokens(800.0, 100.0).count(3))
        .reranker(true)
}

fn metrics() -> CustomerMetrics {
    CustomerMetrics {
        new_customers_per_year: vec![10.0, 25.0, 60.0, 120.0, 200.0],
        avg_users_per_customer: 250.0,
        adoption_rate_by_year: vec![10.0, 25.0, 45.0, 60.0],
        avg_actions_per_user: 12.0,
    }
}

fn bench_paygo_projection(c: &mut Criterion) {
    let (action, pricing, metrics, settings) = (action(), default_pricing(), metrics(), Settings::default());
    c.bench_function("paygo_projection", |b| {
        b.iter(|| {
            calculate_paygo_projection(black_box(&action), &pricing, black_box(&metrics), &settings);
        });
    });
}

fn bench_ptu_projection(c: &mut Criterion) {
    let (action, pricing, metrics, settings) = (action(), default_pricing(), metrics(), Settings::default());
    c.bench_function("ptu_projection", |b| {
        b.iter(|| {
            calculate_ptu_projection(black_box(&action), &pricing, black_box(&metrics), &settings);
        });
    });
}

fn bench_full_estimate(c: &mut Criterion) {
    let (action, pricing, metrics, settings) = (action(), default_pricing(), metrics(), Settings::default());
    c.bench_function("full_estimate", |b| {
        b.iter(|| {
            estimate(black_box(&action), &pricing, black_box(&metrics), &settings);
        });
    });
}

fn bench_view_export_import(c: &mut Criterion) {
    let view = View::new("bench", action(), default_pricing(), metrics(), Settings::default());
    c.bench_function("view_export_import", |b| {
        b.iter(|| {
            let json = export_view(black_box(&view)).unwrap();
            import_view(&json).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_paygo_projection,
    bench_ptu_projection,
    bench_full_estimate,
    bench_view_export_import,
);
criterion_main!(benches);
