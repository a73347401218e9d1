//! Declarative scenario files in YAML/TOML/JSON.
//!
//! A scenario is one calculation input: the action, customer metrics and
//! settings, plus an optional pricing table. Omitted sections take the
//! built-in defaults.

use serde::{Deserialize, Serialize};

use crate::error::{self, CostcastError};
use crate::model::{Action, CustomerMetrics, PricingTable, Settings};
use crate::pricing::default_pricing;
use crate::projection::{self, Estimate};
use crate::view::View;

/// Top-level scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub action: Action,
    #[serde(default)]
    pub customer_metrics: CustomerMetrics,
    #[serde(default)]
    pub settings: Settings,
    /// Overrides the built-in price list when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_pricing: Option<PricingTable>,
}

fn default_name() -> String {
    "Untitled Estimation".to_string()
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            action: Action::default(),
            customer_metrics: CustomerMetrics::default(),
            settings: Settings::default(),
            model_pricing: None,
        }
    }
}

impl ScenarioConfig {
    /// Parse from YAML string.
    #[cfg(feature = "config-yaml")]
    pub fn from_yaml(yaml: &str) -> error::Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| CostcastError::config(format!("Invalid YAML scenario: {e}")))
    }

    /// Parse from TOML string.
    #[cfg(feature = "config-toml")]
    pub fn from_toml(toml: &str) -> error::Result<Self> {
        toml::from_str(toml)
            .map_err(|e| CostcastError::config(format!("Invalid TOML scenario: {e}")))
    }

    /// Parse from JSON string.
    pub fn from_json(json: &str) -> error::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CostcastError::config(format!("Invalid JSON scenario: {e}")))
    }

    /// Detect format from file extension and parse.
    pub fn from_file(path: &str) -> error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CostcastError::config(format!("Failed to read scenario file '{path}': {e}"))
        })?;

        if path.ends_with(".json") {
            Self::from_json(&content)
        } else {
            #[cfg(feature = "config-yaml")]
            if path.ends_with(".yaml") || path.ends_with(".yml") {
                return Self::from_yaml(&content);
            }
            #[cfg(feature = "config-toml")]
            if path.ends_with(".toml") {
                return Self::from_toml(&content);
            }
            // Default: try JSON
            Self::from_json(&content)
        }
    }

    /// The pricing table in effect: the scenario's own, else the built-in list.
    pub fn pricing(&self) -> PricingTable {
        self.model_pricing.clone().unwrap_or_else(default_pricing)
    }

    pub fn estimate(&self) -> Estimate {
        projection::estimate(
            &self.action,
            &self.pricing(),
            &self.customer_metrics,
            &self.settings,
        )
    }

    /// Wrap the scenario in a new saved view.
    pub fn into_view(self) -> View {
        let pricing = self.pricing();
        View::new(
            self.name,
            self.action,
            pricing,
            self.customer_metrics,
            self.settings,
        )
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> error::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CostcastError::config(format!("Failed to serialize scenario: {e}")))
    }
}

impl From<&View> for ScenarioConfig {
    fn from(view: &View) -> Self {
        Self {
            name: view.name.clone(),
            action: view.action.clone(),
            customer_metrics: view.customer_metrics.clone(),
            settings: view.settings.clone(),
            model_pricing: Some(view.model_pricing.clone()),
        }
    }
}
