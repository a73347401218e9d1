use std::fs;
use std::path::Path;

use costcast_core::ScenarioConfig;

/// Write a sample scenario to `path`, in the format its extension names.
pub fn scaffold_scenario(path: &str) -> Result<(), String> {
    let target = Path::new(path);
    if target.exists() {
        return Err(format!("File '{path}' already exists"));
    }

    let content = match target.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => sample_yaml(),
        Some("toml") => sample_toml(),
        _ => ScenarioConfig::default()
            .to_json()
            .map_err(|e| e.to_string())?,
    };

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| format!("{}: {e}", parent.display()))?;
    }
    fs::write(target, content).map_err(|e| format!("{path}: {e}"))?;

    println!("Created scenario '{path}'");
    println!();
    println!("  costcast estimate {path}");
    println!("  costcast views save {path}");
    println!();
    Ok(())
}

fn sample_yaml() -> String {
    r#"# Costcast scenario
name: Support assistant

action:
  name: Answer a ticket
  useReranker: true
  requests:
    - model: GPT-4.1 2025-02-01 Global mini
      numRequests: 1
      avgInputTokens: 3000
      avgOutputTokens: 500
    - model: GPT-5 2025-08-07 Global nano
      numRequests: 2
      avgInputTokens: 800
      avgOutputTokens: 100

# One entry per year; cohorts age along the adoption curve.
customerMetrics:
  newCustomersPerYear: [10, 25, 50]
  avgUsersPerCustomer: 100
  adoptionRateByYear: [10, 30, 50]
  avgActionsPerUser: 10

settings:
  aiCreditConversionRate: 200
  rerankerCostPerAction: 0.001
  payGoDiscountPercent: 20
  inputTokenCachingPercent: 25
  cachedTokenDiscountPercent: 75
  yearlyPTUCost: 2652
  ptuIncrements: 25

# Uncomment to override the built-in price list.
# modelPricing:
#   GPT-4.1 2025-02-01 Global mini: { input: 0.4, output: 1.6, ptuCapacity: 5000 }
"#
    .to_string()
}

fn sample_toml() -> String {
    r#"# Costcast scenario
name = "Support assistant"

[action]
name = "Answer a ticket"
useReranker = true

[[action.requests]]
model = "GPT-4.1 2025-02-01 Global mini"
numRequests = 1
avgInputTokens = 3000.0
avgOutputTokens = 500.0

[[action.requests]]
model = "GPT-5 2025-08-07 Global nano"
numRequests = 2
avgInputTokens = 800.0
avgOutputTokens = 100.0

[customerMetrics]
newCustomersPerYear = [10.0, 25.0, 50.0]
avgUsersPerCustomer = 100.0
adoptionRateByYear = [10.0, 30.0, 50.0]
avgActionsPerUser = 10.0

[settings]
aiCreditConversionRate = 200.0
rerankerCostPerAction = 0.001
payGoDiscountPercent = 20.0
inputTokenCachingPercent = 25.0
cachedTokenDiscountPercent = 75.0
yearlyPTUCost = 2652.0
ptuIncrements = 25
"#
    .to_string()
}
