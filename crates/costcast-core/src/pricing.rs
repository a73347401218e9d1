//! Pricing sources: the built-in deployment price list and a best-effort
//! lookup against the Azure retail prices API.
//!
//! [`fetch_pricing_with_fallback`] never fails: any network, status, parse or
//! empty-result problem yields [`default_pricing`].

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{self, CostcastError};
use crate::model::{DEFAULT_PTU_CAPACITY, ModelPricing, PricingTable};

const DEFAULT_BASE_URL: &str = "https://prices.azure.com/api/retail/prices";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// (deployment, input $/1M, output $/1M, PTU tokens/sec)
const DEFAULT_PRICES: &[(&str, f64, f64, f64)] = &[
    ("GPT-4 2024-05-13 Global", 30.0, 60.0, 4000.0),
    ("GPT-4 2024-05-13 Global mini", 0.15, 0.6, 8000.0),
    ("GPT-4 2024-05-13 Global nano", 0.075, 0.3, 12000.0),
    ("GPT-4 2024-05-13 Global chat", 30.0, 60.0, 4000.0),
    ("GPT-4.1 2025-02-01 Global", 10.0, 30.0, 4500.0),
    ("GPT-4.1 2025-02-01 Global mini", 0.15, 0.6, 9000.0),
    ("GPT-4.1 2025-02-01 Global nano", 0.075, 0.3, 13000.0),
    ("GPT-4.1 2025-02-01 Global chat", 10.0, 30.0, 4500.0),
    ("GPT-5 2025-08-07 Global", 15.0, 45.0, 4200.0),
    ("GPT-5 2025-08-07 Global mini", 0.2, 0.8, 8500.0),
    ("GPT-5 2025-08-07 Global nano", 0.1, 0.4, 12500.0),
    ("GPT-5 2025-08-07 Global chat", 15.0, 45.0, 4200.0),
];

/// How each deployment is recognised among retail price items.
struct MeterMatch {
    deployment: &'static str,
    search: &'static [&'static str],
    exclude: &'static [&'static str],
}

const METER_MATCHES: &[MeterMatch] = &[
    MeterMatch {
        deployment: "GPT-4 2024-05-13 Global",
        search: &["gpt-4o", "gpt-4", "2024-05-13"],
        exclude: &["mini", "nano", "turbo", "vision", "32k"],
    },
    MeterMatch {
        deployment: "GPT-4 2024-05-13 Global mini",
        search: &["gpt-4o-mini", "gpt-4-mini", "2024-05-13", "mini"],
        exclude: &["nano"],
    },
    MeterMatch {
        deployment: "GPT-4 2024-05-13 Global nano",
        search: &["gpt-4-nano", "nano", "2024-05-13"],
        exclude: &[],
    },
    MeterMatch {
        deployment: "GPT-4 2024-05-13 Global chat",
        search: &["gpt-4", "chat", "2024-05-13"],
        exclude: &["mini", "nano", "turbo", "vision"],
    },
    MeterMatch {
        deployment: "GPT-4.1 2025-02-01 Global",
        search: &["gpt-4.1", "2025-02-01"],
        exclude: &["mini", "nano"],
    },
    MeterMatch {
        deployment: "GPT-4.1 2025-02-01 Global mini",
        search: &["gpt-4.1-mini", "gpt-4.1", "mini", "2025-02-01"],
        exclude: &["nano"],
    },
    MeterMatch {
        deployment: "GPT-4.1 2025-02-01 Global nano",
        search: &["gpt-4.1-nano", "gpt-4.1", "nano", "2025-02-01"],
        exclude: &[],
    },
    MeterMatch {
        deployment: "GPT-4.1 2025-02-01 Global chat",
        search: &["gpt-4.1", "chat", "2025-02-01"],
        exclude: &["mini", "nano"],
    },
    MeterMatch {
        deployment: "GPT-5 2025-08-07 Global",
        search: &["gpt-5", "2025-08-07"],
        exclude: &["mini", "nano"],
    },
    MeterMatch {
        deployment: "GPT-5 2025-08-07 Global mini",
        search: &["gpt-5-mini", "gpt-5", "mini", "2025-08-07"],
        exclude: &["nano"],
    },
    MeterMatch {
        deployment: "GPT-5 2025-08-07 Global nano",
        search: &["gpt-5-nano", "gpt-5", "nano", "2025-08-07"],
        exclude: &[],
    },
    MeterMatch {
        deployment: "GPT-5 2025-08-07 Global chat",
        search: &["gpt-5", "chat", "2025-08-07"],
        exclude: &["mini", "nano"],
    },
];

/// Built-in price list used whenever nothing better is available.
pub fn default_pricing() -> PricingTable {
    DEFAULT_PRICES
        .iter()
        .map(|&(name, input, output, capacity)| {
            (
                name.to_string(),
                ModelPricing::new(input, output).ptu_capacity(capacity),
            )
        })
        .collect()
}

/// Deployment names in the built-in price list, in catalogue order.
pub fn available_models() -> Vec<&'static str> {
    DEFAULT_PRICES.iter().map(|(name, ..)| *name).collect()
}

fn default_capacity_for(deployment: &str) -> f64 {
    DEFAULT_PRICES
        .iter()
        .find(|(name, ..)| *name == deployment)
        .map(|&(.., capacity)| capacity)
        .unwrap_or(DEFAULT_PTU_CAPACITY)
}

// ---------------------------------------------------------------------------
// Retail prices API
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RetailPriceResponse {
    #[serde(rename = "Items", default)]
    items: Vec<RetailPriceItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetailPriceItem {
    #[serde(default)]
    product_name: String,
    #[serde(default)]
    meter_name: String,
    #[serde(default)]
    retail_price: f64,
}

impl RetailPriceItem {
    fn mentions(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.product_name.to_lowercase().contains(&term)
            || self.meter_name.to_lowercase().contains(&term)
    }

    fn meter_mentions_any(&self, terms: &[&str]) -> bool {
        let meter = self.meter_name.to_lowercase();
        terms.iter().any(|t| meter.contains(t))
    }
}

/// HTTP client for the retail prices API.
#[derive(Debug, Clone)]
pub struct PricingClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl PricingClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Fetch OpenAI deployment prices for `region`.
    ///
    /// Only deployments with at least one matching input or output meter are
    /// returned; PTU capacity comes from the built-in list.
    pub async fn fetch(&self, region: &str) -> error::Result<PricingTable> {
        let filter =
            format!("serviceName eq 'Cognitive Services' and armRegionName eq '{region}'");
        debug!(url = %self.base_url, region, "Fetching retail prices");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("$filter", filter.as_str())])
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| CostcastError::Pricing {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
                source: Some(Box::new(e)),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CostcastError::Pricing {
                message: format!("Failed to fetch pricing: HTTP {status}"),
                status: Some(status.as_u16()),
                source: None,
            });
        }

        let body: RetailPriceResponse = resp
            .json()
            .await
            .map_err(|e| CostcastError::pricing(format!("Failed to parse pricing response: {e}")))?;

        Ok(parse_retail_items(&body.items))
    }
}

impl Default for PricingClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_retail_items(items: &[RetailPriceItem]) -> PricingTable {
    let openai_items: Vec<&RetailPriceItem> = items
        .iter()
        .filter(|item| {
            let product = item.product_name.to_lowercase();
            product.contains("openai") || product.contains("gpt")
        })
        .collect();

    let mut table = PricingTable::new();
    for m in METER_MATCHES {
        let matching: Vec<&RetailPriceItem> = openai_items
            .iter()
            .copied()
            .filter(|item| {
                m.search.iter().any(|t| item.mentions(t)) && !m.exclude.iter().any(|t| item.mentions(t))
            })
            .collect();

        let input = matching
            .iter()
            .find(|item| item.meter_mentions_any(&["input", "prompt"]));
        let output = matching
            .iter()
            .find(|item| item.meter_mentions_any(&["output", "completion"]));

        if input.is_none() && output.is_none() {
            continue;
        }

        table.insert(
            m.deployment,
            ModelPricing::new(
                input.map(|i| i.retail_price).unwrap_or(0.0),
                output.map(|o| o.retail_price).unwrap_or(0.0),
            )
            .ptu_capacity(default_capacity_for(m.deployment)),
        );
    }
    table
}

/// Fetch live prices, falling back to [`default_pricing`] on any failure or
/// when the API returns nothing usable.
pub async fn fetch_pricing_with_fallback(client: &PricingClient, region: &str) -> PricingTable {
    match client.fetch(region).await {
        Ok(table) if table.is_empty() => {
            warn!(region, "No pricing data from retail API, using built-in prices");
            default_pricing()
        }
        Ok(table) => table,
        Err(e) => {
            warn!(region, error = %e, "Retail pricing lookup failed, using built-in prices");
            default_pricing()
        }
    }
}
