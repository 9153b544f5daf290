//! Pricing abstractions and core types

use crate::core::error::TrackerError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// Quote map as returned by the price API: asset id → currency → unit price.
///
/// Lives only as long as the lookup that fetched it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PriceQuote(pub HashMap<String, HashMap<String, f64>>);

impl PriceQuote {
    pub fn price(&self, asset_id: &str, currency: &str) -> Option<f64> {
        self.0.get(asset_id).and_then(|prices| prices.get(currency)).copied()
    }
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Unit price of `asset_id` in `currency`.
    async fn get_price(&self, asset_id: &str, currency: &str) -> Result<f64, TrackerError>;
}
