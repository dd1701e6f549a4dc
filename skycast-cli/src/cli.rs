use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use skycast_core::{
    Config, FileCityStore, HomeController, LocationCandidate, WeatherApiClient,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com API key.
    Configure,

    /// Show the 7-day forecast for a city.
    Show {
        /// City name; if absent, the last viewed city (or the configured
        /// default) is used.
        city: Option<String>,
    },

    /// Interactive city search: type a query, pick a match, see the
    /// forecast. The picked city becomes the new last-viewed city.
    Search,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(city).await,
            Command::Search => search().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(key.trim().to_string());

    config.save()?;
    println!("Saved config to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_controller(config: &Config) -> Result<HomeController> {
    let client = Arc::new(WeatherApiClient::from_config(config)?);
    let store = Arc::new(FileCityStore::at_default_location()?);
    Ok(HomeController::new(client, store, config))
}

async fn show(city: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let controller = build_controller(&config)?;

    match city {
        Some(city) => {
            // An explicit city behaves like picking it from search results:
            // it becomes the remembered city.
            controller
                .select_candidate(&LocationCandidate {
                    name: city,
                    country: None,
                })
                .await;
        }
        None => controller.initialize().await,
    }

    let state = controller.state();
    if let Some(err) = state.error {
        bail!("Forecast fetch failed: {err}");
    }

    render::print_state(&state);
    Ok(())
}

async fn search() -> Result<()> {
    let config = Config::load()?;
    let controller = build_controller(&config)?;

    controller.initialize().await;
    render::print_state(&controller.state());

    loop {
        let query = inquire::Text::new("Search city (empty to quit):")
            .prompt()
            .context("Failed to read search input")?;
        if query.trim().is_empty() {
            break;
        }

        controller.toggle_search();
        let candidates = lookup(&controller, &config, query).await;
        if candidates.is_empty() {
            println!("No matching locations.");
            controller.toggle_search();
            continue;
        }

        let names: Vec<String> = candidates.iter().map(|c| c.display_name()).collect();
        let picked = inquire::Select::new("Pick a location:", names.clone())
            .prompt()
            .context("Failed to read selection")?;
        let index = names.iter().position(|n| *n == picked).unwrap_or(0);

        controller.select_candidate(&candidates[index]).await;

        let state = controller.state();
        if let Some(err) = &state.error {
            eprintln!("Forecast fetch failed: {err}");
            continue;
        }
        render::print_state(&state);
    }

    Ok(())
}

/// Feed the query through the controller's debounced search path and wait
/// for the candidate list to arrive. The controller publishes exactly one
/// snapshot once the lookup settles, success or failure, so the first
/// change is the answer; a failed or empty lookup yields an empty list.
async fn lookup(
    controller: &HomeController,
    config: &Config,
    query: String,
) -> Vec<LocationCandidate> {
    let mut rx = controller.subscribe();
    controller.on_search_input(query);

    let deadline =
        config.debounce_interval() + config.request_timeout() + Duration::from_secs(1);

    match tokio::time::timeout(deadline, rx.changed()).await {
        Ok(Ok(())) => rx.borrow_and_update().candidates.clone(),
        Ok(Err(_)) => Vec::new(),
        Err(_) => {
            tracing::warn!("location lookup did not settle before the deadline");
            Vec::new()
        }
    }
}
