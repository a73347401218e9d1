mod init;
mod report;
mod views;

use std::path::PathBuf;

use clap::Parser;
use costcast_core::ScenarioConfig;
use costcast_core::pricing::{
    PricingClient, available_models, default_pricing, fetch_pricing_with_fallback,
};
use tracing_subscriber::EnvFilter;

use crate::report::Mode;
use crate::views::ViewCommands;

#[derive(Parser)]
#[command(name = "costcast", about = "Costcast: AI workload cost projection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show version information
    Version,
    /// List the built-in model price list
    Models,
    /// Project PayGo and PTU costs for a scenario file (JSON, YAML or TOML)
    Estimate {
        file: String,
        /// Which pricing model to report
        #[arg(short, long, value_enum, default_value_t = Mode::Both)]
        mode: Mode,
        /// Print the raw estimate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch current prices from the Azure retail prices API
    Pricing {
        #[arg(short, long, default_value = "eastus")]
        region: String,
        #[arg(long)]
        json: bool,
    },
    /// Write a sample scenario file
    Init { file: String },
    /// Manage saved views
    Views {
        /// JSON file holding the saved views
        #[arg(short, long, default_value = "costcast-views.json")]
        store: PathBuf,
        #[command(subcommand)]
        command: ViewCommands,
    },
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Version => {
            println!("costcast {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Models => {
            let pricing = default_pricing();
            report::print_pricing(
                available_models()
                    .into_iter()
                    .filter_map(|m| pricing.get(m).map(|p| (m, p))),
            );
        }
        Commands::Estimate { file, mode, json } => {
            let config = ScenarioConfig::from_file(&file).map_err(|e| e.to_string())?;
            let estimate = config.estimate();
            if json {
                let out = match mode {
                    Mode::Paygo => to_json(&estimate.paygo)?,
                    Mode::Ptu => to_json(&estimate.ptu)?,
                    Mode::Both => to_json(&estimate)?,
                };
                println!("{out}");
            } else {
                report::print_estimate(&config.name, &estimate, &config.settings, mode);
            }
        }
        Commands::Pricing { region, json } => {
            let client = PricingClient::new();
            let pricing = fetch_pricing_with_fallback(&client, &region).await;
            if json {
                println!("{}", to_json(&pricing)?);
            } else {
                println!("Prices for region '{region}'");
                println!();
                report::print_pricing(pricing.iter());
            }
        }
        Commands::Init { file } => init::scaffold_scenario(&file)?,
        Commands::Views { store, command } => views::run(&store, command).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
