use costcast_core::model::{Action, CustomerMetrics, ModelPricing, PricingTable, Request, Settings};
use costcast_core::projection::*;
use pretty_assertions::assert_eq;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn pricing() -> PricingTable {
    PricingTable::new()
        .with_model("model-a", ModelPricing::new(10.0, 30.0))
        .with_model("model-fast", ModelPricing::new(1.0, 2.0).ptu_capacity(8000.0))
}

fn action(use_reranker: bool) -> Action {
    Action::new("summarize")
        .request(Request::new("model-a").tokens(1000.0, 500.0))
        .reranker(use_reranker)
}

fn single_cohort() -> CustomerMetrics {
    CustomerMetrics {
        new_customers_per_year: vec![1.0],
        avg_users_per_customer: 100.0,
        adoption_rate_by_year: vec![10.0],
        avg_actions_per_user: 10.0,
    }
}

fn no_customers() -> CustomerMetrics {
    CustomerMetrics {
        new_customers_per_year: vec![0.0],
        ..single_cohort()
    }
}

// ---- PayGo ----

#[test]
fn test_paygo_end_to_end() {
    // 25% cached at 75% off, 20% PayGo discount, no reranker.
    let result = calculate_paygo_projection(&action(false), &pricing(), &single_cohort(), &Settings::default());

    let breakdown = result.action_cost_breakdown.unwrap();
    assert_close(breakdown.raw_token_cost, 0.008125 + 0.015);
    assert_close(breakdown.token_cost, 0.0185);
    assert_eq!(breakdown.reranker_cost, 0.0);
    assert_eq!(breakdown.paygo_discount, 20.0);

    assert_eq!(result.yearly_breakdown.len(), 1);
    let year = &result.yearly_breakdown[0];
    assert_eq!(year.year, 1);
    assert_eq!(year.active_users, 10);
    assert_close(year.total_actions_per_month, 3000.0);
    assert_close(year.monthly_cost, 55.5);
    assert_close(year.yearly_cost, 666.0);
    assert_close(year.per_customer_monthly, 55.5);
    assert_close(year.per_customer_yearly, 666.0);
    assert!(year.ptu.is_none());

    assert_close(result.per_action_cost, 0.0185);
    assert_close(result.per_user_monthly, 5.55);
    assert_close(result.per_user_yearly, 66.6);
}

#[test]
fn test_paygo_discount_skips_reranker() {
    let settings = Settings {
        reranker_cost_per_action: 0.5,
        paygo_discount_percent: 50.0,
        ..Settings::default()
    };
    let result = calculate_paygo_projection(&action(true), &pricing(), &single_cohort(), &settings);
    let breakdown = result.action_cost_breakdown.unwrap();

    assert_close(breakdown.reranker_cost, 0.5);
    assert_close(breakdown.token_cost, 0.023125 * 0.5);
    assert_close(result.per_action_cost, 0.023125 * 0.5 + 0.5);
}

#[test]
fn test_paygo_request_breakdowns_are_undiscounted() {
    let result = calculate_paygo_projection(&action(false), &pricing(), &single_cohort(), &Settings::default());
    assert_eq!(result.request_breakdowns.len(), 1);
    assert_close(result.request_breakdowns[0].total_cost, 0.023125);
}

#[test]
fn test_paygo_zero_customers_falls_back_to_baseline() {
    let result = calculate_paygo_projection(&action(false), &pricing(), &no_customers(), &Settings::default());

    let year = &result.yearly_breakdown[0];
    assert_eq!(year.active_users, 0);
    assert_eq!(year.per_customer_monthly, 0.0);
    assert_eq!(year.per_customer_yearly, 0.0);

    assert_close(result.per_action_cost, 0.0185);
    assert_close(result.per_user_monthly, 0.0185 * 10.0 * 30.0);
    assert_close(result.per_user_yearly, 0.0185 * 10.0 * 30.0 * 12.0);
}

#[test]
fn test_paygo_empty_horizon() {
    let metrics = CustomerMetrics {
        new_customers_per_year: vec![],
        adoption_rate_by_year: vec![],
        ..single_cohort()
    };
    let result = calculate_paygo_projection(&action(false), &pricing(), &metrics, &Settings::default());
    assert!(result.yearly_breakdown.is_empty());
    assert_close(result.per_action_cost, 0.0185);
}

#[test]
fn test_paygo_report_uses_final_year() {
    let metrics = CustomerMetrics {
        new_customers_per_year: vec![1.0, 2.0, 3.0],
        adoption_rate_by_year: vec![10.0, 20.0, 40.0],
        ..single_cohort()
    };
    let result = calculate_paygo_projection(&action(false), &pricing(), &metrics, &Settings::default());

    assert_eq!(result.yearly_breakdown.len(), 3);
    let last = result.final_year().unwrap();
    assert_eq!(last.year, 3);
    // 1×40 + 2×20 + 3×10 users
    assert_eq!(last.active_users, 110);
    assert_eq!(last.total_customers, 6.0);
    assert_close(result.per_user_monthly, last.monthly_cost / 110.0);
    assert_close(result.per_action_cost, 0.0185);
}

// ---- PTU ----

#[test]
fn test_required_ptus_increment_rounding() {
    assert_eq!(required_ptus(8050.0, 4000.0, 25), 25);
    assert_eq!(required_ptus(8050.0, 4000.0, 1), 3);
}

#[test]
fn test_ptu_projection_survives_extreme_volume() {
    let metrics = CustomerMetrics {
        new_customers_per_year: vec![1e12],
        avg_users_per_customer: 1e6,
        adoption_rate_by_year: vec![100.0],
        avg_actions_per_user: 1e12,
    };
    let heavy = Action::new("heavy").request(Request::new("model-a").tokens(1e9, 1e9));
    let result = calculate_ptu_projection(&heavy, &pricing(), &metrics, &Settings::default());

    let ptu = result.yearly_breakdown[0].ptu.unwrap();
    assert_eq!(ptu.required_ptus % 25, 0);
    assert!(ptu.required_ptus > 0);
    assert!(ptu.ptu_yearly_cost.is_finite());
}

#[test]
fn test_weighted_ptu_capacity() {
    let mixed = Action::new("mixed")
        .request(Request::new("model-a").tokens(500.0, 500.0))
        .request(Request::new("model-fast").tokens(2000.0, 1000.0));
    // (1000 × 4000 + 3000 × 8000) / 4000
    assert_close(weighted_ptu_capacity(&mixed, &pricing()), 7000.0);

    let unknown = Action::new("u").request(Request::new("nope").tokens(100.0, 0.0));
    assert_close(weighted_ptu_capacity(&unknown, &pricing()), 4000.0);

    let empty = Action::new("e").request(Request::new("model-fast"));
    assert_close(weighted_ptu_capacity(&empty, &pricing()), 4000.0);
}

#[test]
fn test_ptu_end_to_end() {
    let result = calculate_ptu_projection(&action(false), &pricing(), &single_cohort(), &Settings::default());

    let year = &result.yearly_breakdown[0];
    let ptu = year.ptu.unwrap();
    // 3000 actions × 1500 tokens over a 30-day month, doubled for peak.
    assert_close(ptu.tokens_per_second, 3000.0 * 1500.0 / 2_592_000.0 * 2.0);
    assert_eq!(ptu.required_ptus, 25);
    assert_close(ptu.ptu_yearly_cost, 66_300.0);
    assert_close(ptu.ptu_monthly_cost, 5_525.0);
    assert_eq!(ptu.reranker_monthly_cost, 0.0);
    assert_close(year.monthly_cost, 5_525.0);
    assert_close(year.yearly_cost, 66_300.0);

    assert_close(result.per_action_cost, 5_525.0 / 3000.0);
    assert_close(result.per_user_monthly, 552.5);
    assert_close(result.per_user_yearly, 6_630.0);
    assert!(result.action_cost_breakdown.is_none());
}

#[test]
fn test_ptu_reranker_scales_with_volume() {
    let result = calculate_ptu_projection(&action(true), &pricing(), &single_cohort(), &Settings::default());
    let ptu = result.yearly_breakdown[0].ptu.unwrap();
    assert_close(ptu.reranker_monthly_cost, 3000.0 * 0.001);
    assert_close(ptu.reranker_yearly_cost, 36.0);
    assert_close(result.yearly_breakdown[0].monthly_cost, 5_525.0 + 3.0);
}

#[test]
fn test_ptu_grows_in_increments() {
    let metrics = CustomerMetrics {
        new_customers_per_year: vec![3000.0],
        adoption_rate_by_year: vec![100.0],
        ..single_cohort()
    };
    let result = calculate_ptu_projection(&action(false), &pricing(), &metrics, &Settings::default());
    let ptu = result.yearly_breakdown[0].ptu.unwrap();
    // ~104k tokens/sec needs 27 PTUs, bought as two blocks of 25.
    assert_eq!(result.yearly_breakdown[0].active_users, 300_000);
    assert_eq!(ptu.required_ptus, 50);
}

#[test]
fn test_ptu_zero_customers_reports_zero() {
    let result = calculate_ptu_projection(&action(true), &pricing(), &no_customers(), &Settings::default());
    let year = &result.yearly_breakdown[0];
    assert_eq!(year.ptu.unwrap().required_ptus, 0);
    assert_eq!(year.monthly_cost, 0.0);
    assert_eq!(year.per_customer_monthly, 0.0);
    assert_eq!(result.per_action_cost, 0.0);
    assert_eq!(result.per_user_monthly, 0.0);
    assert_eq!(result.per_user_yearly, 0.0);
}

// ---- Comparison & estimate ----

#[test]
fn test_compare_projections() {
    let paygo = calculate_paygo_projection(&action(false), &pricing(), &single_cohort(), &Settings::default());
    let ptu = calculate_ptu_projection(&action(false), &pricing(), &single_cohort(), &Settings::default());
    let rows = compare_projections(&paygo, &ptu);

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.year, 1);
    assert_eq!(row.active_users, 10);
    assert_eq!(row.cheaper, PricingModel::PayGo);
    assert_close(row.paygo_action_cost, 0.0185);
    assert_close(row.ptu_per_user_monthly, 552.5);
    assert_close(row.yearly_savings, 66_300.0 - 666.0);
}

#[test]
fn test_estimate_is_deterministic() {
    let metrics = CustomerMetrics {
        new_customers_per_year: vec![1.0, 4.0, 9.0],
        adoption_rate_by_year: vec![5.0, 25.0],
        ..single_cohort()
    };
    let first = estimate(&action(true), &pricing(), &metrics, &Settings::default());
    let second = estimate(&action(true), &pricing(), &metrics, &Settings::default());

    assert_eq!(first, second);
    assert_eq!(first.comparison.len(), 3);
    assert_eq!(first.costs_by_model.len(), 1);
    assert_eq!(first.costs_by_model["model-a"].request_count, 1);
}
