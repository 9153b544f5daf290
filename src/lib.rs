pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::price::PriceProvider;
use crate::core::record::PurchaseDraft;
use crate::providers::{adafruit::AdafruitFeedStore, coingecko::CoinGeckoProvider, util};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    /// List supported assets matching a query
    Assets { query: String },
    /// Convert amounts read from stdin into coin quantities
    Quote { asset_id: String },
    /// Quote, validate and log a purchase
    Purchase(PurchaseDraft),
    /// List logged purchases, optionally valued at live prices
    Review { query: String, with_values: bool },
}

fn price_provider(config: &AppConfig) -> Result<CoinGeckoProvider> {
    let client = util::build_client(config.timeout())?;
    Ok(CoinGeckoProvider::new(
        &config.providers.coingecko.base_url,
        client,
    ))
}

fn record_store(config: &AppConfig) -> Result<AdafruitFeedStore> {
    let adafruit = config.adafruit()?;
    let api_key = adafruit.resolve_api_key()?;
    let client = util::build_client(config.timeout())?;
    Ok(AdafruitFeedStore::new(
        &adafruit.base_url,
        &adafruit.username,
        &adafruit.feed_key,
        &api_key,
        client,
    ))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("cryptex starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        currency = %config.currency,
        timeout_secs = config.timeout_secs,
        debounce_ms = config.debounce_ms,
        "Loaded config"
    );

    match command {
        AppCommand::Assets { query } => cli::assets::run(&query),
        AppCommand::Quote { asset_id } => {
            let provider = Arc::new(price_provider(&config)?);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::quote::run(
                provider,
                &config.currency,
                config.debounce_window(),
                &asset_id,
                stdin,
            )
            .await
            .map(|_| ())
        }
        AppCommand::Purchase(draft) => {
            let provider = price_provider(&config)?;
            let store = record_store(&config)?;
            cli::purchase::run(&provider, &store, &config.currency, draft)
                .await
                .map(|_| ())
        }
        AppCommand::Review { query, with_values } => {
            let store = record_store(&config)?;
            let provider = if with_values {
                Some(price_provider(&config)?)
            } else {
                None
            };
            cli::review::run(
                &store,
                provider.as_ref().map(|p| p as &dyn PriceProvider),
                &config.currency,
                &query,
            )
            .await
        }
    }
}
