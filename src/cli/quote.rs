use super::ui;
use crate::core::price::PriceProvider;
use crate::core::quote::{QuoteSession, QuoteUpdate};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

fn describe(update: &QuoteUpdate, currency: &str) -> String {
    let amount = format!("{} {}", update.input, currency.to_uppercase());
    match &update.coin_amount {
        Some(coins) => format!(
            "{amount} → {} {}",
            ui::style_text(coins, ui::StyleType::Success),
            update.asset_id
        ),
        None => format!(
            "{amount} → {}",
            ui::style_text("no quote", ui::StyleType::Subtle)
        ),
    }
}

/// Treats every line of `input` as an edit of the investment amount and
/// prints the coin quantity for each amount that stayed put long enough.
///
/// Returns the updates in the order they were printed.
pub async fn run<R>(
    provider: Arc<dyn PriceProvider>,
    currency: &str,
    window: Duration,
    asset_id: &str,
    input: R,
) -> Result<Vec<QuoteUpdate>>
where
    R: AsyncBufRead + Unpin,
{
    let (mut session, mut updates) = QuoteSession::new(provider, currency, window);
    let mut lines = input.lines();
    let mut delivered = Vec::new();
    let mut last_seen = 0;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read investment amount")? {
                    Some(amount) => session.on_input(asset_id, amount.trim()),
                    None => break,
                }
            }
            Some(update) = updates.recv() => {
                last_seen = update.generation;
                println!("{}", describe(&update, currency));
                delivered.push(update);
            }
        }
    }

    // Input is closed; wait for the lookup of the final amount.
    while last_seen < session.generation() {
        let Some(update) = updates.recv().await else {
            break;
        };
        last_seen = update.generation;
        println!("{}", describe(&update, currency));
        delivered.push(update);
    }

    debug!(lookups = delivered.len(), "Quote input closed");
    Ok(delivered)
}
