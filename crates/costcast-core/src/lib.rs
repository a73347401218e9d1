//! # Costcast Core
//!
//! Cost projection engine for AI workloads billed either per token
//! (Pay-as-You-Go) or by reserved capacity (Provisioned Throughput Units).
//!
//! The calculation modules (`cohort`, `cost`, `projection`, `credits`) are
//! pure functions over immutable inputs and never fail: missing prices,
//! empty sequences and zero denominators resolve to defined zero values.
//! Only the collaborator boundaries (`config`, `pricing`, `store`, `view`)
//! return [`Result`](error::Result).

pub mod cohort;
pub mod config;
pub mod cost;
pub mod credits;
pub mod error;
pub mod model;
pub mod pricing;
pub mod projection;
pub mod resolve;
pub mod store;
pub mod view;

pub use config::ScenarioConfig;
pub use cost::{ActionCostResult, ModelCostSummary, RequestCostResult};
pub use error::CostcastError;
pub use model::{Action, CustomerMetrics, ModelPricing, PricingTable, Request, Settings};
pub use pricing::{PricingClient, default_pricing, fetch_pricing_with_fallback};
pub use projection::{
    ComparisonRow, Estimate, PricingModel, ProjectionResult, YearlyCostEntry,
    calculate_paygo_projection, calculate_ptu_projection,
};
pub use store::{FileViewStore, InMemoryViewStore, ViewStore};
pub use view::View;
