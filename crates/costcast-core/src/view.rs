//! Saved estimation views and their JSON export envelope.
//!
//! A view bundles one complete calculation input with identity metadata.
//! Exports wrap either one view or many in `{version, exportDate, view(s)}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{self, CostcastError};
use crate::model::{Action, CustomerMetrics, PricingTable, Settings};
use crate::pricing::default_pricing;
use crate::projection::{self, Estimate};

pub const EXPORT_VERSION: &str = "1.0";
const IMPORTED_SUFFIX: &str = " (Imported)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub model_pricing: PricingTable,
    pub action: Action,
    pub customer_metrics: CustomerMetrics,
    pub settings: Settings,
}

impl View {
    /// Fresh view built from the given inputs.
    pub fn new(
        name: impl Into<String>,
        action: Action,
        model_pricing: PricingTable,
        customer_metrics: CustomerMetrics,
        settings: Settings,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: now,
            last_modified: now,
            model_pricing,
            action,
            customer_metrics,
            settings,
        }
    }

    /// "Untitled Estimation" with built-in pricing and default inputs.
    pub fn new_default() -> Self {
        Self::new(
            "Untitled Estimation",
            Action::default(),
            default_pricing(),
            CustomerMetrics::default(),
            Settings::default(),
        )
    }

    /// Run every projection over this view's inputs.
    pub fn estimate(&self) -> Estimate {
        projection::estimate(
            &self.action,
            &self.model_pricing,
            &self.customer_metrics,
            &self.settings,
        )
    }

    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Replace this view's prices with `live` ones, keeping its PTU capacities.
    pub fn refresh_pricing(&mut self, live: &PricingTable) {
        self.model_pricing = self.model_pricing.with_live_prices(live);
        self.touch();
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SingleExport<'a> {
    version: &'a str,
    export_date: DateTime<Utc>,
    view: &'a View,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MultiExport<'a> {
    version: &'a str,
    export_date: DateTime<Utc>,
    views: &'a [View],
}

/// Pretty-printed envelope holding one view.
pub fn export_view(view: &View) -> error::Result<String> {
    serde_json::to_string_pretty(&SingleExport {
        version: EXPORT_VERSION,
        export_date: Utc::now(),
        view,
    })
    .map_err(|e| CostcastError::internal(format!("Failed to serialize view: {e}")))
}

/// Pretty-printed envelope holding several views.
pub fn export_views(views: &[View]) -> error::Result<String> {
    serde_json::to_string_pretty(&MultiExport {
        version: EXPORT_VERSION,
        export_date: Utc::now(),
        views,
    })
    .map_err(|e| CostcastError::internal(format!("Failed to serialize views: {e}")))
}

fn parse_envelope(json: &str) -> error::Result<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| CostcastError::import(format!("Invalid JSON: {e}")))?;
    let has_version = value
        .get("version")
        .is_some_and(|v| !v.is_null() && v.as_str() != Some(""));
    if !has_version {
        return Err(CostcastError::import("Missing export version"));
    }
    Ok(value)
}

/// Parse a single-view envelope. The view must carry a non-empty id and name.
pub fn import_view(json: &str) -> error::Result<View> {
    let mut envelope = parse_envelope(json)?;
    let raw = match envelope.get_mut("view") {
        Some(v) if !v.is_null() => v.take(),
        _ => return Err(CostcastError::import("Envelope has no view")),
    };

    let non_empty = |field: &str| raw.get(field).and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty());
    if !non_empty("id") || !non_empty("name") {
        return Err(CostcastError::import("View is missing an id or name"));
    }

    serde_json::from_value(raw).map_err(|e| CostcastError::import(format!("Invalid view data: {e}")))
}

/// Parse a multi-view envelope.
pub fn import_views(json: &str) -> error::Result<Vec<View>> {
    let mut envelope = parse_envelope(json)?;
    let raw = match envelope.get_mut("views") {
        Some(v) if v.is_array() => v.take(),
        _ => return Err(CostcastError::import("Envelope has no views array")),
    };
    serde_json::from_value(raw).map_err(|e| CostcastError::import(format!("Invalid view data: {e}")))
}

/// [`import_view`] with failures logged and reported as `None`.
pub fn try_import_view(json: &str) -> Option<View> {
    import_view(json)
        .inspect_err(|e| debug!(error = %e, "Single-view import rejected"))
        .ok()
}

/// [`import_views`] with failures logged and reported as an empty list.
pub fn try_import_views(json: &str) -> Vec<View> {
    import_views(json)
        .inspect_err(|e| debug!(error = %e, "Multi-view import rejected"))
        .unwrap_or_default()
}

/// Accept any export: a single-view envelope first, then a multi-view one.
pub fn import_any(json: &str) -> error::Result<Vec<View>> {
    if let Some(view) = try_import_view(json) {
        return Ok(vec![view]);
    }
    let views = import_views(json)?;
    if views.is_empty() {
        return Err(CostcastError::import("Export contains no views"));
    }
    Ok(views)
}

/// Give an imported view a new identity so it never overwrites a saved one.
/// Both timestamps restart at the import time.
pub fn prepare_import(mut view: View) -> View {
    view.id = uuid::Uuid::new_v4().to_string();
    view.name.push_str(IMPORTED_SUFFIX);
    view.touch();
    view.created_at = view.last_modified;
    view
}
