use super::util::ensure_success;
use crate::core::error::TrackerError;
use crate::core::price::{PriceProvider, PriceQuote};
use crate::core::record::normalize_asset_id;
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, error, instrument};

/// Spot prices from CoinGecko's `/simple/price` endpoint.
pub struct CoinGeckoProvider {
    base_url: String,
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, client: Client) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn price_url(&self, asset_id: &str, currency: &str) -> Result<Url, TrackerError> {
        Url::parse_with_params(
            &format!("{}/simple/price", self.base_url),
            &[("ids", asset_id), ("vs_currencies", currency)],
        )
        .map_err(|e| TrackerError::Network(format!("Invalid price API URL: {e}")))
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoPriceFetch",
        skip(self),
        fields(asset_id = %asset_id, currency = %currency)
    )]
    async fn get_price(&self, asset_id: &str, currency: &str) -> Result<f64, TrackerError> {
        let asset_id = normalize_asset_id(asset_id);
        let currency = currency.trim().to_lowercase();
        if asset_id.is_empty() {
            return Err(TrackerError::Validation("asset id must not be empty".into()));
        }
        if currency.is_empty() {
            return Err(TrackerError::Validation("currency must not be empty".into()));
        }

        let url = self.price_url(&asset_id, &currency)?;
        debug!("Requesting price from {}", url);

        let response = self.client.get(url).send().await?;
        let response = ensure_success(response, "price API")?;
        let text = response.text().await?;

        let quote: PriceQuote = match serde_json::from_str(&text) {
            Ok(quote) => quote,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse price response");
                return Err(e.into());
            }
        };

        quote
            .price(&asset_id, &currency)
            .ok_or(TrackerError::NotFound { asset_id, currency })
    }
}
