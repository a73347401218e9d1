//! Multi-year cost projections for the two pricing models.
//!
//! Both projections walk the same cohort curve. PayGo prices every action at
//! the discounted token rate; PTU sizes reserved capacity from peak throughput
//! and bills it in whole purchase increments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cohort;
use crate::cost::{self, ModelCostSummary, RequestCostResult};
use crate::model::{Action, CustomerMetrics, DEFAULT_PTU_CAPACITY, PricingTable, Settings};
use crate::resolve::{percent, ratio, ratio_or};

/// Daily action rates are scaled by a fixed 30-day month.
pub const DAYS_PER_MONTH: f64 = 30.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;
pub const SECONDS_PER_MONTH: f64 = DAYS_PER_MONTH * 24.0 * 60.0 * 60.0;
/// Peak throughput is sized at this multiple of the monthly average.
pub const PEAK_TO_AVERAGE_RATIO: f64 = 2.0;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// PTU sizing detail for one projection year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PtuYearDetail {
    pub tokens_per_second: f64,
    #[serde(rename = "requiredPTUs")]
    pub required_ptus: u64,
    pub ptu_monthly_cost: f64,
    pub ptu_yearly_cost: f64,
    pub reranker_monthly_cost: f64,
    pub reranker_yearly_cost: f64,
}

/// One row of a projection timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyCostEntry {
    /// 1-based.
    pub year: usize,
    pub total_customers: f64,
    pub active_users: u64,
    pub total_actions_per_month: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    pub per_customer_monthly: f64,
    pub per_customer_yearly: f64,
    /// Present on PTU timelines only.
    #[serde(flatten)]
    pub ptu: Option<PtuYearDetail>,
}

/// How the PayGo per-action price was built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCostBreakdown {
    /// Token cost after the PayGo discount.
    pub token_cost: f64,
    pub reranker_cost: f64,
    /// Token cost before the PayGo discount.
    pub raw_token_cost: f64,
    #[serde(rename = "payGoDiscount")]
    pub paygo_discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub per_action_cost: f64,
    pub per_user_monthly: f64,
    pub per_user_yearly: f64,
    pub yearly_breakdown: Vec<YearlyCostEntry>,
    pub request_breakdowns: Vec<RequestCostResult>,
    /// Set by the PayGo projection only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_cost_breakdown: Option<ActionCostBreakdown>,
}

impl ProjectionResult {
    pub fn final_year(&self) -> Option<&YearlyCostEntry> {
        self.yearly_breakdown.last()
    }
}

// ---------------------------------------------------------------------------
// Shared per-year arithmetic
// ---------------------------------------------------------------------------

/// Actions per month for the given active-user count.
pub fn actions_per_month(active_users: u64, avg_actions_per_user: f64) -> f64 {
    active_users as f64 * avg_actions_per_user * DAYS_PER_MONTH
}

fn entry(
    year: usize,
    metrics: &CustomerMetrics,
    active_users: u64,
    total_actions_per_month: f64,
    monthly_cost: f64,
    yearly_cost: f64,
) -> YearlyCostEntry {
    let total_customers = cohort::total_customers(metrics, year);
    YearlyCostEntry {
        year: year + 1,
        total_customers,
        active_users,
        total_actions_per_month,
        monthly_cost,
        yearly_cost,
        per_customer_monthly: ratio(monthly_cost, total_customers),
        per_customer_yearly: ratio(yearly_cost, total_customers),
        ptu: None,
    }
}

// ---------------------------------------------------------------------------
// PayGo
// ---------------------------------------------------------------------------

/// Project PayGo spend across the cohort horizon.
///
/// The discount applies to token cost only; the reranker surcharge is added
/// after it. Report-level per-action and per-user figures come from the final
/// year, falling back to the baseline per-action price when that year has no
/// actions or users.
pub fn calculate_paygo_projection(
    action: &Action,
    pricing: &PricingTable,
    metrics: &CustomerMetrics,
    settings: &Settings,
) -> ProjectionResult {
    let action_cost = cost::calculate_action_cost(action, pricing, settings);
    let discounted_token_cost =
        action_cost.total_token_cost * (1.0 - percent(settings.paygo_discount_percent));
    let baseline_per_action = discounted_token_cost + action_cost.reranker_cost;
    let baseline_per_user_monthly =
        baseline_per_action * metrics.avg_actions_per_user * DAYS_PER_MONTH;

    let active_users = cohort::active_users_by_year(metrics);
    debug!(
        horizon = active_users.len(),
        per_action = baseline_per_action,
        "Projecting PayGo costs"
    );

    let yearly_breakdown: Vec<YearlyCostEntry> = active_users
        .iter()
        .enumerate()
        .map(|(year, &users)| {
            let actions = actions_per_month(users, metrics.avg_actions_per_user);
            let monthly_cost = actions * baseline_per_action;
            entry(year, metrics, users, actions, monthly_cost, monthly_cost * MONTHS_PER_YEAR)
        })
        .collect();

    let (per_action_cost, per_user_monthly, per_user_yearly) = match yearly_breakdown.last() {
        Some(last) => (
            ratio_or(last.monthly_cost, last.total_actions_per_month, baseline_per_action),
            ratio_or(last.monthly_cost, last.active_users as f64, baseline_per_user_monthly),
            ratio_or(
                last.yearly_cost,
                last.active_users as f64,
                baseline_per_user_monthly * MONTHS_PER_YEAR,
            ),
        ),
        None => (
            baseline_per_action,
            baseline_per_user_monthly,
            baseline_per_user_monthly * MONTHS_PER_YEAR,
        ),
    };

    ProjectionResult {
        per_action_cost,
        per_user_monthly,
        per_user_yearly,
        yearly_breakdown,
        action_cost_breakdown: Some(ActionCostBreakdown {
            token_cost: discounted_token_cost,
            reranker_cost: action_cost.reranker_cost,
            raw_token_cost: action_cost.total_token_cost,
            paygo_discount: settings.paygo_discount_percent,
        }),
        request_breakdowns: action_cost.request_breakdowns,
    }
}

// ---------------------------------------------------------------------------
// PTU
// ---------------------------------------------------------------------------

/// Token-weighted mean PTU capacity over the action's requests.
///
/// Requests on unpriced models count at the default capacity; an action with
/// no tokens at all gets the default.
pub fn weighted_ptu_capacity(action: &Action, pricing: &PricingTable) -> f64 {
    let (tokens, weighted) = action.requests.iter().fold((0.0, 0.0), |(tokens, weighted), req| {
        let req_tokens = req.total_tokens();
        let capacity = pricing
            .get(&req.model)
            .map(|p| p.effective_ptu_capacity())
            .unwrap_or(DEFAULT_PTU_CAPACITY);
        (tokens + req_tokens, weighted + req_tokens * capacity)
    });
    ratio_or(weighted, tokens, DEFAULT_PTU_CAPACITY)
}

/// Peak tokens/sec needed to serve a month's volume.
pub fn peak_tokens_per_second(tokens_per_month: f64) -> f64 {
    (tokens_per_month / SECONDS_PER_MONTH) * PEAK_TO_AVERAGE_RATIO
}

/// PTUs to buy: enough capacity for `tokens_per_second`, rounded up to a whole
/// number of purchase increments.
pub fn required_ptus(tokens_per_second: f64, tokens_per_ptu: f64, increments: u32) -> u64 {
    let capacity = if tokens_per_ptu > 0.0 {
        tokens_per_ptu
    } else {
        DEFAULT_PTU_CAPACITY
    };
    let needed = (tokens_per_second / capacity).ceil();
    if !needed.is_finite() || needed <= 0.0 {
        return 0;
    }
    let increment = u64::from(increments.max(1));
    // Saturate at the largest whole number of increments a u64 can hold.
    (needed as u64)
        .div_ceil(increment)
        .checked_mul(increment)
        .unwrap_or(u64::MAX / increment * increment)
}

/// Project reserved-capacity spend across the cohort horizon.
///
/// The reranker is billed per action volume on top of the PTU reservation.
/// Report-level figures come from the final year only and are 0 when it has
/// no actions or users.
pub fn calculate_ptu_projection(
    action: &Action,
    pricing: &PricingTable,
    metrics: &CustomerMetrics,
    settings: &Settings,
) -> ProjectionResult {
    let action_cost = cost::calculate_action_cost(action, pricing, settings);
    let tokens_per_action = action.total_tokens();
    let capacity = weighted_ptu_capacity(action, pricing);
    let reranker_per_action = settings.reranker_cost(action);

    let active_users = cohort::active_users_by_year(metrics);
    debug!(
        horizon = active_users.len(),
        tokens_per_action,
        capacity,
        "Projecting PTU costs"
    );

    let yearly_breakdown: Vec<YearlyCostEntry> = active_users
        .iter()
        .enumerate()
        .map(|(year, &users)| {
            let actions = actions_per_month(users, metrics.avg_actions_per_user);
            let tokens_per_second = peak_tokens_per_second(actions * tokens_per_action);
            let ptus = required_ptus(tokens_per_second, capacity, settings.ptu_increments);

            let ptu_yearly_cost = ptus as f64 * settings.yearly_ptu_cost;
            let ptu_monthly_cost = ptu_yearly_cost / MONTHS_PER_YEAR;
            let reranker_monthly_cost = actions * reranker_per_action;
            let reranker_yearly_cost = reranker_monthly_cost * MONTHS_PER_YEAR;

            let mut row = entry(
                year,
                metrics,
                users,
                actions,
                ptu_monthly_cost + reranker_monthly_cost,
                ptu_yearly_cost + reranker_yearly_cost,
            );
            row.ptu = Some(PtuYearDetail {
                tokens_per_second,
                required_ptus: ptus,
                ptu_monthly_cost,
                ptu_yearly_cost,
                reranker_monthly_cost,
                reranker_yearly_cost,
            });
            row
        })
        .collect();

    let (per_action_cost, per_user_monthly) = yearly_breakdown
        .last()
        .map(|last| {
            (
                ratio(last.monthly_cost, last.total_actions_per_month),
                ratio(last.monthly_cost, last.active_users as f64),
            )
        })
        .unwrap_or_default();

    ProjectionResult {
        per_action_cost,
        per_user_monthly,
        per_user_yearly: per_user_monthly * MONTHS_PER_YEAR,
        yearly_breakdown,
        request_breakdowns: action_cost.request_breakdowns,
        action_cost_breakdown: None,
    }
}

// ---------------------------------------------------------------------------
// Side-by-side comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    PayGo,
    Ptu,
}

impl std::fmt::Display for PricingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayGo => write!(f, "PayGo"),
            Self::Ptu => write!(f, "PTU"),
        }
    }
}

/// One year of PayGo against PTU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub year: usize,
    pub active_users: u64,
    pub paygo_action_cost: f64,
    pub ptu_action_cost: f64,
    pub paygo_per_user_monthly: f64,
    pub ptu_per_user_monthly: f64,
    pub paygo_monthly_cost: f64,
    pub ptu_monthly_cost: f64,
    pub paygo_yearly_cost: f64,
    pub ptu_yearly_cost: f64,
    /// PayGo wins ties.
    pub cheaper: PricingModel,
    /// Yearly amount saved by picking `cheaper`.
    pub yearly_savings: f64,
}

/// Pair the two timelines year by year; a year missing on one side counts as zero.
pub fn compare_projections(paygo: &ProjectionResult, ptu: &ProjectionResult) -> Vec<ComparisonRow> {
    let years = paygo.yearly_breakdown.len().max(ptu.yearly_breakdown.len());
    (0..years)
        .map(|i| {
            let p = paygo.yearly_breakdown.get(i);
            let r = ptu.yearly_breakdown.get(i);
            let active_users = p.or(r).map(|e| e.active_users).unwrap_or(0);

            let per_action = |e: Option<&YearlyCostEntry>| {
                e.map(|e| ratio(e.monthly_cost, e.total_actions_per_month)).unwrap_or(0.0)
            };
            let per_user = |e: Option<&YearlyCostEntry>| {
                e.map(|e| ratio(e.monthly_cost, e.active_users as f64)).unwrap_or(0.0)
            };
            let monthly = |e: Option<&YearlyCostEntry>| e.map(|e| e.monthly_cost).unwrap_or(0.0);
            let yearly = |e: Option<&YearlyCostEntry>| e.map(|e| e.yearly_cost).unwrap_or(0.0);

            let (paygo_yearly, ptu_yearly) = (yearly(p), yearly(r));
            let cheaper = if paygo_yearly <= ptu_yearly {
                PricingModel::PayGo
            } else {
                PricingModel::Ptu
            };

            ComparisonRow {
                year: i + 1,
                active_users,
                paygo_action_cost: per_action(p),
                ptu_action_cost: per_action(r),
                paygo_per_user_monthly: per_user(p),
                ptu_per_user_monthly: per_user(r),
                paygo_monthly_cost: monthly(p),
                ptu_monthly_cost: monthly(r),
                paygo_yearly_cost: paygo_yearly,
                ptu_yearly_cost: ptu_yearly,
                cheaper,
                yearly_savings: (paygo_yearly - ptu_yearly).abs(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Full estimate
// ---------------------------------------------------------------------------

/// Everything a report needs for one input tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub paygo: ProjectionResult,
    pub ptu: ProjectionResult,
    pub comparison: Vec<ComparisonRow>,
    pub costs_by_model: BTreeMap<String, ModelCostSummary>,
}

/// Run both projections, the comparison and the per-model grouping.
pub fn estimate(
    action: &Action,
    pricing: &PricingTable,
    metrics: &CustomerMetrics,
    settings: &Settings,
) -> Estimate {
    let paygo = calculate_paygo_projection(action, pricing, metrics, settings);
    let ptu = calculate_ptu_projection(action, pricing, metrics, settings);
    let comparison = compare_projections(&paygo, &ptu);
    let costs_by_model = cost::costs_by_model(&action.requests, &paygo.request_breakdowns);
    Estimate {
        paygo,
        ptu,
        comparison,
        costs_by_model,
    }
}
