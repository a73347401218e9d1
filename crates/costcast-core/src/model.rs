//! Input data model: pricing table, action, customer metrics, settings.
//!
//! Field names serialize in camelCase so saved views and scenario files stay
//! interchangeable with the browser calculator's JSON exports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tokens/sec a single PTU sustains when the pricing entry does not say.
pub const DEFAULT_PTU_CAPACITY: f64 = 4000.0;

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Per-model price card. Prices are USD per one million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPricing {
    #[serde(rename = "input")]
    pub input_per_million: f64,
    #[serde(rename = "output")]
    pub output_per_million: f64,
    /// Tokens per second one PTU of this model can serve.
    #[serde(default = "default_ptu_capacity")]
    pub ptu_capacity: f64,
}

fn default_ptu_capacity() -> f64 {
    DEFAULT_PTU_CAPACITY
}

impl ModelPricing {
    pub fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
            ptu_capacity: DEFAULT_PTU_CAPACITY,
        }
    }

    pub fn ptu_capacity(mut self, tokens_per_second: f64) -> Self {
        self.ptu_capacity = tokens_per_second;
        self
    }

    /// Capacity usable as a divisor; non-positive values fall back to the default.
    pub fn effective_ptu_capacity(&self) -> f64 {
        if self.ptu_capacity > 0.0 {
            self.ptu_capacity
        } else {
            DEFAULT_PTU_CAPACITY
        }
    }
}

/// Model identifier → price card.
///
/// Lookups that miss return `None`; the cost calculator turns a miss into a
/// zero-cost request instead of an error, so half-edited configurations still
/// produce numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingTable(BTreeMap<String, ModelPricing>);

impl PricingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>, pricing: ModelPricing) -> Self {
        self.0.insert(model.into(), pricing);
        self
    }

    pub fn insert(&mut self, model: impl Into<String>, pricing: ModelPricing) -> Option<ModelPricing> {
        self.0.insert(model.into(), pricing)
    }

    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.0.get(model)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.0.contains_key(model)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelPricing)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take prices from `live` while keeping this table's PTU capacities.
    ///
    /// The result lists exactly the models in `live`. A model keeps its capacity
    /// here when set, else the live one, else the default.
    pub fn with_live_prices(&self, live: &PricingTable) -> PricingTable {
        live.iter()
            .map(|(model, latest)| {
                let capacity = self
                    .get(model)
                    .map(|p| p.ptu_capacity)
                    .filter(|c| *c > 0.0)
                    .unwrap_or_else(|| latest.effective_ptu_capacity());
                (model.to_string(), latest.ptu_capacity(capacity))
            })
            .collect()
    }
}

impl FromIterator<(String, ModelPricing)> for PricingTable {
    fn from_iter<I: IntoIterator<Item = (String, ModelPricing)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// One API call pattern inside an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default = "new_id")]
    pub id: String,
    pub model: String,
    /// How many times this call is made per action.
    #[serde(rename = "numRequests", default = "default_request_count")]
    pub request_count: u32,
    #[serde(default)]
    pub avg_input_tokens: f64,
    #[serde(default)]
    pub avg_output_tokens: f64,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_request_count() -> u32 {
    1
}

impl Request {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            model: model.into(),
            request_count: 1,
            avg_input_tokens: 0.0,
            avg_output_tokens: 0.0,
        }
    }

    pub fn tokens(mut self, avg_input: f64, avg_output: f64) -> Self {
        self.avg_input_tokens = avg_input;
        self.avg_output_tokens = avg_output;
        self
    }

    pub fn count(mut self, request_count: u32) -> Self {
        self.request_count = request_count;
        self
    }

    /// Batch multiplier; a stored count of 0 is read as 1.
    pub fn multiplier(&self) -> f64 {
        f64::from(self.request_count.max(1))
    }

    /// Input plus output tokens across every repetition of this request.
    pub fn total_tokens(&self) -> f64 {
        (self.avg_input_tokens + self.avg_output_tokens) * self.multiplier()
    }
}

/// A logical user-facing operation made of one or more requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub use_reranker: bool,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: Vec::new(),
            use_reranker: false,
        }
    }

    pub fn request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    pub fn reranker(mut self, enabled: bool) -> Self {
        self.use_reranker = enabled;
        self
    }

    /// Tokens consumed by one execution of the action.
    pub fn total_tokens(&self) -> f64 {
        self.requests.iter().map(Request::total_tokens).sum()
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::new("New AI Action")
            .request(Request::new("GPT-4.1 2025-02-01 Global mini").tokens(1000.0, 500.0))
    }
}

// ---------------------------------------------------------------------------
// Customer metrics
// ---------------------------------------------------------------------------

/// Adoption inputs for the cohort model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMetrics {
    /// Index 0 is the cohort acquired in year 1.
    #[serde(default)]
    pub new_customers_per_year: Vec<f64>,
    #[serde(default)]
    pub avg_users_per_customer: f64,
    /// Percent of a cohort's users active, indexed by tenure in years.
    #[serde(default)]
    pub adoption_rate_by_year: Vec<f64>,
    /// Actions per active user per day.
    #[serde(default)]
    pub avg_actions_per_user: f64,
}

impl Default for CustomerMetrics {
    fn default() -> Self {
        Self {
            new_customers_per_year: vec![1.0],
            avg_users_per_customer: 100.0,
            adoption_rate_by_year: vec![10.0],
            avg_actions_per_user: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Global knobs shared by both pricing models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Credits per dollar.
    pub ai_credit_conversion_rate: f64,
    pub reranker_cost_per_action: f64,
    #[serde(rename = "payGoDiscountPercent")]
    pub paygo_discount_percent: f64,
    pub input_token_caching_percent: f64,
    pub cached_token_discount_percent: f64,
    #[serde(rename = "yearlyPTUCost")]
    pub yearly_ptu_cost: f64,
    #[serde(rename = "ptuIncrements")]
    pub ptu_increments: u32,
    /// Informational only; no cost formula reads it.
    pub context_window: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_credit_conversion_rate: 200.0,
            reranker_cost_per_action: 0.001,
            paygo_discount_percent: 20.0,
            input_token_caching_percent: 25.0,
            cached_token_discount_percent: 75.0,
            yearly_ptu_cost: 2652.0,
            ptu_increments: 25,
            context_window: 1_000_000,
        }
    }
}

impl Settings {
    /// Reranker charge for one action, or 0 when the action skips reranking.
    pub fn reranker_cost(&self, action: &Action) -> f64 {
        if action.use_reranker {
            self.reranker_cost_per_action
        } else {
            0.0
        }
    }
}
