//! `costcast views`: saved views in a local JSON file.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use costcast_core::ScenarioConfig;
use costcast_core::pricing::{PricingClient, fetch_pricing_with_fallback};
use costcast_core::store::{FileViewStore, ViewStore};
use costcast_core::view;

use crate::report::{self, Mode};

#[derive(Subcommand)]
pub enum ViewCommands {
    /// List saved views
    List,
    /// Print the estimate for a saved view
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Save a scenario file as a new view
    Save { scenario: String },
    /// Delete a saved view
    Delete { id: String },
    /// Export one view, or every view when no id is given
    Export {
        id: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import views from an export file
    Import { file: PathBuf },
    /// Apply current retail prices to a saved view, keeping its PTU capacities
    RefreshPricing {
        id: String,
        #[arg(short, long, default_value = "eastus")]
        region: String,
    },
}

pub async fn run(store_path: &Path, command: ViewCommands) -> Result<(), String> {
    let store = FileViewStore::new(store_path);

    match command {
        ViewCommands::List => {
            let views = store.list().await.map_err(|e| e.to_string())?;
            if views.is_empty() {
                println!("No saved views in {}", store.path().display());
                return Ok(());
            }
            println!("{:<36}  {:<32}  Last modified", "ID", "Name");
            for v in &views {
                println!(
                    "{:<36}  {:<32}  {}",
                    v.id,
                    v.name,
                    v.last_modified.format("%Y-%m-%d %H:%M UTC")
                );
            }
        }
        ViewCommands::Show { id, json } => {
            let view = store
                .get(&id)
                .await
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("No view with id '{id}'"))?;
            let estimate = view.estimate();
            if json {
                let out = serde_json::to_string_pretty(&estimate).map_err(|e| e.to_string())?;
                println!("{out}");
            } else {
                report::print_estimate(&view.name, &estimate, &view.settings, Mode::Both);
            }
        }
        ViewCommands::Save { scenario } => {
            let config = ScenarioConfig::from_file(&scenario).map_err(|e| e.to_string())?;
            let saved = store
                .save(config.into_view())
                .await
                .map_err(|e| e.to_string())?;
            println!("Saved '{}' as {}", saved.name, saved.id);
        }
        ViewCommands::Delete { id } => {
            if !store.delete(&id).await.map_err(|e| e.to_string())? {
                return Err(format!("No view with id '{id}'"));
            }
            println!("Deleted {id}");
        }
        ViewCommands::Export { id, output } => {
            let json = match id {
                Some(id) => {
                    let view = store
                        .get(&id)
                        .await
                        .map_err(|e| e.to_string())?
                        .ok_or_else(|| format!("No view with id '{id}'"))?;
                    view::export_view(&view)
                }
                None => view::export_views(&store.list().await.map_err(|e| e.to_string())?),
            }
            .map_err(|e| e.to_string())?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json).map_err(|e| format!("{}: {e}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        ViewCommands::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .map_err(|e| format!("{}: {e}", file.display()))?;
            let views = view::import_any(&content).map_err(|e| e.to_string())?;

            for imported in views {
                let exists = store
                    .get(&imported.id)
                    .await
                    .map_err(|e| e.to_string())?
                    .is_some();
                let imported = if exists {
                    view::prepare_import(imported)
                } else {
                    imported
                };
                let saved = store.save(imported).await.map_err(|e| e.to_string())?;
                println!("Imported '{}' as {}", saved.name, saved.id);
            }
        }
        ViewCommands::RefreshPricing { id, region } => {
            let mut view = store
                .get(&id)
                .await
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("No view with id '{id}'"))?;
            let live = fetch_pricing_with_fallback(&PricingClient::new(), &region).await;
            view.refresh_pricing(&live);
            let saved = store.save(view).await.map_err(|e| e.to_string())?;
            println!(
                "Updated prices for '{}' ({} models, region '{region}')",
                saved.name,
                saved.model_pricing.len()
            );
        }
    }
    Ok(())
}
