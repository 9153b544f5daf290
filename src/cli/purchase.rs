use super::ui;
use crate::core::price::PriceProvider;
use crate::core::record::{PurchaseDraft, PurchaseRecord, normalize_asset_id, parse_investment};
use crate::core::store::RecordStore;
use anyhow::{Result, anyhow};
use tracing::{info, warn};

/// Quotes the draft's asset, fills in the coin quantity and appends the
/// record once it passes the form gate.
pub async fn run(
    provider: &dyn PriceProvider,
    store: &dyn RecordStore,
    currency: &str,
    draft: PurchaseDraft,
) -> Result<PurchaseRecord> {
    let asset_id = normalize_asset_id(&draft.asset_id);

    // No lookup for an amount that can never convert.
    let unit_price = if parse_investment(&draft.investment_amount).is_some() && !asset_id.is_empty()
    {
        let spinner = ui::new_spinner(&format!("Fetching {asset_id} price..."));
        let price = provider.get_price(&asset_id, currency).await;
        spinner.finish_and_clear();
        match price {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(error = %e, "No price quote for purchase");
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                None
            }
        }
    } else {
        None
    };

    let record = draft.into_record(unit_price);
    record.validate().map_err(|e| anyhow!("Purchase not sent: {e}"))?;

    let spinner = ui::new_spinner("Sending purchase...");
    let sent = store.append(&record).await;
    spinner.finish_and_clear();
    sent.map_err(|e| anyhow!("Failed to send data: {e}"))?;

    info!(asset = %record.cryptocurrency, "Purchase logged");
    println!(
        "{} {} {} for {} {}",
        ui::style_text("Logged", ui::StyleType::Success),
        record.initial_purchase_price,
        record.cryptocurrency,
        record.investment_amount,
        currency.to_uppercase()
    );
    Ok(record)
}
