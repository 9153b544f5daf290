//! Debounced conversion of a typed investment amount into a coin quantity.

use crate::core::debounce::Debouncer;
use crate::core::price::PriceProvider;
use crate::core::record::{coin_amount_text, normalize_asset_id, parse_investment};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Outcome of one settled input.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteUpdate {
    /// Number of the edit that produced this update, counting from 1.
    pub generation: u64,
    pub asset_id: String,
    /// Amount text the lookup was made for.
    pub input: String,
    /// Formatted coin quantity, `None` when there is nothing to show.
    pub coin_amount: Option<String>,
}

/// Tracks one purchase form: every edit reschedules the price lookup and
/// results arrive on the receiver returned by [`QuoteSession::new`].
pub struct QuoteSession {
    provider: Arc<dyn PriceProvider>,
    currency: String,
    debouncer: Debouncer,
    generation: u64,
    updates: mpsc::UnboundedSender<QuoteUpdate>,
}

impl QuoteSession {
    pub fn new(
        provider: Arc<dyn PriceProvider>,
        currency: &str,
        window: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<QuoteUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            provider,
            currency: currency.to_string(),
            debouncer: Debouncer::new(window),
            generation: 0,
            updates: tx,
        };
        (session, rx)
    }

    /// Records an edit of the asset or the amount.
    pub fn on_input(&mut self, asset_id: &str, amount: &str) {
        self.generation += 1;
        let generation = self.generation;
        let provider = Arc::clone(&self.provider);
        let currency = self.currency.clone();
        let updates = self.updates.clone();
        let asset_id = normalize_asset_id(asset_id);
        let input = amount.to_string();

        self.debouncer.schedule(async move {
            let coin_amount = match parse_investment(&input) {
                Some(_) if !asset_id.is_empty() => {
                    match provider.get_price(&asset_id, &currency).await {
                        Ok(price) => Some(coin_amount_text(&input, Some(price))),
                        Err(e) => {
                            debug!(error = %e, asset_id = %asset_id, "Quote unavailable");
                            None
                        }
                    }
                }
                _ => None,
            }
            .filter(|text| !text.is_empty());

            // The receiver may be gone if the form was closed.
            let _ = updates.send(QuoteUpdate {
                generation,
                asset_id,
                input,
                coin_amount,
            });
        });
    }

    /// Number of edits seen so far; the latest update carries this value.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops a pending lookup without delivering anything.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}
