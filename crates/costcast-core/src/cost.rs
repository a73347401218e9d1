//! Per-request and per-action token pricing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Action, PricingTable, Request, Settings};
use crate::resolve::percent;

/// Cost of one request entry, already multiplied by its request count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCostResult {
    pub input_cost: f64,
    pub input_cached_cost: f64,
    pub input_uncached_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub cached_input_tokens: f64,
    pub uncached_input_tokens: f64,
    pub num_requests: u32,
}

impl RequestCostResult {
    /// All-zero cost for a request whose model has no price card.
    pub fn zero(num_requests: u32) -> Self {
        Self {
            num_requests,
            ..Self::default()
        }
    }
}

/// Cost of one execution of an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCostResult {
    /// Positionally parallel to `Action::requests`.
    pub request_breakdowns: Vec<RequestCostResult>,
    pub total_token_cost: f64,
    pub reranker_cost: f64,
    pub total_cost: f64,
}

/// Per-model roll-up of request breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCostSummary {
    pub input_cost: f64,
    pub input_cached_cost: f64,
    pub input_uncached_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    /// Number of request entries (not calls) that used the model.
    pub request_count: usize,
}

fn calc_usd(tokens: f64, per_million: f64) -> f64 {
    (tokens / 1_000_000.0) * per_million
}

/// USD for `tokens` at `per_million`, with `cached_discount` percent off when cached.
pub fn token_cost(tokens: f64, per_million: f64, cached: bool, cached_discount: f64) -> f64 {
    let base = calc_usd(tokens, per_million);
    if cached {
        base * (1.0 - percent(cached_discount))
    } else {
        base
    }
}

/// Price one request entry.
///
/// `caching_percent` of the input tokens are billed at the cached rate;
/// output tokens never are. An unknown model yields a zero-cost result.
pub fn calculate_request_cost(
    request: &Request,
    pricing: &PricingTable,
    caching_percent: f64,
    cached_discount: f64,
) -> RequestCostResult {
    let num_requests = request.request_count.max(1);
    let Some(price) = pricing.get(&request.model) else {
        warn!(model = %request.model, "No pricing for model, costing request at zero");
        return RequestCostResult::zero(num_requests);
    };

    let cached_tokens = request.avg_input_tokens * percent(caching_percent);
    let uncached_tokens = request.avg_input_tokens * (1.0 - percent(caching_percent));

    let input_cached_cost = token_cost(cached_tokens, price.input_per_million, true, cached_discount);
    let input_uncached_cost = token_cost(uncached_tokens, price.input_per_million, false, 0.0);
    let input_cost = input_cached_cost + input_uncached_cost;
    let output_cost = token_cost(request.avg_output_tokens, price.output_per_million, false, 0.0);

    let n = request.multiplier();
    RequestCostResult {
        input_cost: input_cost * n,
        input_cached_cost: input_cached_cost * n,
        input_uncached_cost: input_uncached_cost * n,
        output_cost: output_cost * n,
        total_cost: (input_cost + output_cost) * n,
        cached_input_tokens: cached_tokens * n,
        uncached_input_tokens: uncached_tokens * n,
        num_requests,
    }
}

/// Price one execution of `action`, including the flat reranker surcharge.
pub fn calculate_action_cost(
    action: &Action,
    pricing: &PricingTable,
    settings: &Settings,
) -> ActionCostResult {
    let request_breakdowns: Vec<RequestCostResult> = action
        .requests
        .iter()
        .map(|request| {
            calculate_request_cost(
                request,
                pricing,
                settings.input_token_caching_percent,
                settings.cached_token_discount_percent,
            )
        })
        .collect();

    let total_token_cost = request_breakdowns.iter().map(|b| b.total_cost).sum::<f64>();
    let reranker_cost = settings.reranker_cost(action);

    ActionCostResult {
        request_breakdowns,
        total_token_cost,
        reranker_cost,
        total_cost: total_token_cost + reranker_cost,
    }
}

/// Group request breakdowns by model.
///
/// `requests[i]` pairs with `breakdowns[i]`; entries without a partner are ignored.
pub fn costs_by_model(
    requests: &[Request],
    breakdowns: &[RequestCostResult],
) -> BTreeMap<String, ModelCostSummary> {
    let mut by_model: BTreeMap<String, ModelCostSummary> = BTreeMap::new();
    for (request, breakdown) in requests.iter().zip(breakdowns) {
        let summary = by_model.entry(request.model.clone()).or_default();
        summary.input_cost += breakdown.input_cost;
        summary.input_cached_cost += breakdown.input_cached_cost;
        summary.input_uncached_cost += breakdown.input_uncached_cost;
        summary.output_cost += breakdown.output_cost;
        summary.total_cost += breakdown.total_cost;
        summary.request_count += 1;
    }
    by_model
}
