//! Plain-text estimate tables. Dollar columns are paired with credit columns
//! at the scenario's conversion rate.

use clap::ValueEnum;
use costcast_core::credits::{format_count, format_credits, format_usd};
use costcast_core::model::{ModelPricing, Settings};
use costcast_core::projection::{Estimate, ProjectionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Paygo,
    Ptu,
    Both,
}

impl Mode {
    fn shows_paygo(self) -> bool {
        matches!(self, Self::Paygo | Self::Both)
    }

    fn shows_ptu(self) -> bool {
        matches!(self, Self::Ptu | Self::Both)
    }
}

pub fn print_pricing<'a>(rows: impl IntoIterator<Item = (&'a str, &'a ModelPricing)>) {
    println!(
        "{:<36} {:>11} {:>11} {:>13}",
        "Model", "Input $/M", "Output $/M", "PTU tokens/s"
    );
    for (model, p) in rows {
        println!(
            "{model:<36} {:>11.3} {:>11.3} {:>13}",
            p.input_per_million,
            p.output_per_million,
            format_count(p.effective_ptu_capacity())
        );
    }
}

pub fn print_estimate(name: &str, estimate: &Estimate, settings: &Settings, mode: Mode) {
    let rate = settings.ai_credit_conversion_rate;
    println!("Scenario: {name}");

    if mode.shows_paygo() {
        print_projection("Pay-as-You-Go", &estimate.paygo, rate);
        print_costs_by_model(estimate, rate);
    }
    if mode.shows_ptu() {
        print_projection("Provisioned Throughput (PTU)", &estimate.ptu, rate);
    }
    if mode == Mode::Both {
        print_comparison(estimate);
    }
}

fn print_projection(title: &str, result: &ProjectionResult, rate: f64) {
    println!();
    println!("{title}");
    println!(
        "  Cost per action:    {} ({})",
        format_usd(result.per_action_cost),
        format_credits(result.per_action_cost, rate)
    );
    println!(
        "  Cost per user / mo: {} ({})",
        format_usd(result.per_user_monthly),
        format_credits(result.per_user_monthly, rate)
    );
    println!(
        "  Cost per user / yr: {} ({})",
        format_usd(result.per_user_yearly),
        format_credits(result.per_user_yearly, rate)
    );
    if let Some(b) = &result.action_cost_breakdown {
        println!(
            "  Token cost:         {} (before {}% discount: {})",
            format_usd(b.token_cost),
            b.paygo_discount,
            format_usd(b.raw_token_cost)
        );
        println!("  Reranker:           {}", format_usd(b.reranker_cost));
    }

    if result.yearly_breakdown.is_empty() {
        println!("  No projection years.");
        return;
    }

    let has_ptu = result.yearly_breakdown.iter().any(|y| y.ptu.is_some());
    println!();
    print!(
        "  {:>4} {:>10} {:>12} {:>14}",
        "Year", "Customers", "Active users", "Actions / mo"
    );
    if has_ptu {
        print!(" {:>6}", "PTUs");
    }
    println!(
        " {:>14} {:>24} {:>14} {:>26}",
        "Monthly", "Monthly credits", "Yearly", "Yearly credits"
    );

    for y in &result.yearly_breakdown {
        print!(
            "  {:>4} {:>10} {:>12} {:>14}",
            y.year,
            format_count(y.total_customers),
            format_count(y.active_users as f64),
            format_count(y.total_actions_per_month)
        );
        if let Some(ptu) = &y.ptu {
            print!(" {:>6}", ptu.required_ptus);
        }
        println!(
            " {:>14} {:>24} {:>14} {:>26}",
            format_usd(y.monthly_cost),
            format_credits(y.monthly_cost, rate),
            format_usd(y.yearly_cost),
            format_credits(y.yearly_cost, rate)
        );
    }
}

fn print_costs_by_model(estimate: &Estimate, rate: f64) {
    if estimate.costs_by_model.is_empty() {
        return;
    }
    println!();
    println!("  Cost by model, per action (before discount)");
    println!(
        "  {:<36} {:>8} {:>10} {:>10} {:>10} {:>10} {:>22}",
        "Model", "Entries", "Cached", "Uncached", "Output", "Total", "Credits"
    );
    for (model, s) in &estimate.costs_by_model {
        println!(
            "  {model:<36} {:>8} {:>10} {:>10} {:>10} {:>10} {:>22}",
            s.request_count,
            format_usd(s.input_cached_cost),
            format_usd(s.input_uncached_cost),
            format_usd(s.output_cost),
            format_usd(s.total_cost),
            format_credits(s.total_cost, rate)
        );
    }
}

fn print_comparison(estimate: &Estimate) {
    if estimate.comparison.is_empty() {
        return;
    }
    println!();
    println!("PayGo vs PTU");
    println!(
        "  {:>4} {:>12} {:>16} {:>16} {:>8} {:>16}",
        "Year", "Active users", "PayGo / yr", "PTU / yr", "Cheaper", "Savings / yr"
    );
    for row in &estimate.comparison {
        println!(
            "  {:>4} {:>12} {:>16} {:>16} {:>8} {:>16}",
            row.year,
            format_count(row.active_users as f64),
            format_usd(row.paygo_yearly_cost),
            format_usd(row.ptu_yearly_cost),
            row.cheaper.to_string(),
            format_usd(row.yearly_savings)
        );
    }
}
