use super::ui;
use crate::core::calculator::Valuation;
use crate::core::error::TrackerError;
use crate::core::filter::filter_by_asset;
use crate::core::price::PriceProvider;
use crate::core::record::{StoredRecord, normalize_asset_id};
use crate::core::store::RecordStore;
use anyhow::{Result, anyhow};
use comfy_table::Cell;
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

type PriceResults = HashMap<String, Result<f64, TrackerError>>;

fn text_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

/// Renders purchases, with live valuation columns when `prices` is given.
pub fn render(records: &[&StoredRecord], prices: Option<&PriceResults>, currency: &str) -> String {
    let code = currency.to_uppercase();
    let mut table = ui::new_styled_table();

    let mut header = vec![
        ui::header_cell("Cryptocurrency"),
        ui::header_cell("Amount"),
        ui::header_cell(&format!("Investment ({code})")),
        ui::header_cell("Percentage"),
        ui::header_cell("Days"),
        ui::header_cell("Logged"),
    ];
    if prices.is_some() {
        header.extend([
            ui::header_cell("Unit Price Paid"),
            ui::header_cell("Unit Price Now"),
            ui::header_cell(&format!("Value ({code})")),
            ui::header_cell("Change"),
        ]);
    }
    table.set_header(header);

    for stored in records {
        let record = &stored.record;
        let mut row = vec![
            Cell::new(text_or(&record.cryptocurrency, "-")),
            ui::number_cell(text_or(&record.initial_purchase_price, "-")),
            ui::number_cell(text_or(&record.investment_amount, "0.00")),
            ui::number_cell(format!("{}%", text_or(&record.percentage_to_market, "?"))),
            ui::number_cell(format!("{} Days", text_or(&record.holding_time, "?"))),
            ui::format_optional_cell(stored.created_at, |ts| {
                ts.format("%Y-%m-%d %H:%M").to_string()
            }),
        ];

        if let Some(prices) = prices {
            let asset_id = normalize_asset_id(&record.cryptocurrency);
            let price = prices.get(&asset_id);
            let current_price = price.and_then(|p| p.as_ref().ok().copied());
            let has_error = matches!(price, Some(Err(_)));
            let valuation = Valuation::of(record, current_price);

            row.push(ui::number_cell(format!("{:.2}", valuation.original_unit_value)));
            row.push(match valuation.current_unit_value {
                Some(p) => ui::number_cell(format!("{p:.2}")),
                None => ui::na_cell(has_error),
            });
            row.push(match valuation.current_value {
                Some(v) => ui::number_cell(format!("{v:.2}")),
                None => ui::na_cell(has_error),
            });
            row.push(match valuation.percentage_change {
                Some(change) => ui::change_cell(change),
                None => ui::na_cell(has_error),
            });
        }

        table.add_row(row);
    }

    table.to_string()
}

/// Quotes every distinct asset once, concurrently.
pub async fn fetch_prices(
    records: &[&StoredRecord],
    provider: &dyn PriceProvider,
    currency: &str,
) -> PriceResults {
    let assets: BTreeSet<String> = records
        .iter()
        .map(|r| normalize_asset_id(&r.record.cryptocurrency))
        .filter(|id| !id.is_empty())
        .collect();

    let pb = ui::new_progress_bar(assets.len() as u64, "Fetching prices...");
    let futures = assets.into_iter().map(|asset_id| {
        let pb_clone = pb.clone();
        async move {
            let result = provider.get_price(&asset_id, currency).await;
            if let Err(e) = &result {
                debug!(error = %e, asset_id = %asset_id, "Price lookup failed");
            }
            pb_clone.inc(1);
            (asset_id, result)
        }
    });

    let results = join_all(futures).await.into_iter().collect();
    pb.finish_and_clear();
    results
}

pub async fn run(
    store: &dyn RecordStore,
    provider: Option<&dyn PriceProvider>,
    currency: &str,
    query: &str,
) -> Result<()> {
    let spinner = ui::new_spinner("Fetching purchases...");
    let fetched = store.fetch_all().await;
    spinner.finish_and_clear();
    let outcome = fetched.map_err(|e| anyhow!("Failed to fetch purchases: {e}"))?;
    info!(
        records = outcome.records.len(),
        skipped = outcome.skipped,
        "Fetched purchases"
    );

    let filtered = filter_by_asset(&outcome.records, query);
    if filtered.is_empty() {
        println!("No purchases found.");
    } else {
        let prices = match provider {
            Some(provider) => Some(fetch_prices(&filtered, provider, currency).await),
            None => None,
        };
        println!("{}", render(&filtered, prices.as_ref(), currency));
    }

    if outcome.skipped > 0 {
        println!(
            "{}",
            ui::style_text(
                &format!("{} feed entries were not purchase records and were skipped.", outcome.skipped),
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}
