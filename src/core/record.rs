//! Purchase records as they are written to and read from the feed.

use crate::core::calculator::{format_coin_amount, quote_to_coin_amount};
use crate::core::error::TrackerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One logged purchase. Every field is kept as the text the user entered so
/// the stored JSON matches what other feed readers expect.
///
/// Other writers sometimes store numbers instead of strings; those are read
/// back as their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseRecord {
    #[serde(deserialize_with = "de_text")]
    pub cryptocurrency: String,
    #[serde(deserialize_with = "de_text")]
    pub investment_amount: String,
    #[serde(deserialize_with = "de_text")]
    pub highest_selling_price: String,
    #[serde(deserialize_with = "de_text")]
    pub lowest_selling_price: String,
    #[serde(deserialize_with = "de_text")]
    pub percentage_to_market: String,
    #[serde(deserialize_with = "de_text")]
    pub holding_time: String,
    /// Coin quantity bought, despite the name.
    #[serde(deserialize_with = "de_text")]
    pub initial_purchase_price: String,
    #[serde(deserialize_with = "de_text")]
    pub notes: String,
}

/// Accepts any JSON value; strings are kept as-is, null becomes empty.
fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn parse_decimal(field: &str, value: &str) -> Result<f64, TrackerError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TrackerError::Validation(format!("{field} must be a number, got {value:?}")))
}

fn require(field: &str, ok: bool, rule: &str) -> Result<(), TrackerError> {
    if ok {
        Ok(())
    } else {
        Err(TrackerError::Validation(format!("{field} {rule}")))
    }
}

impl PurchaseRecord {
    /// Checks the submission gate. Nothing is sent for a record that fails.
    pub fn validate(&self) -> Result<(), TrackerError> {
        let investment = parse_decimal("investmentAmount", &self.investment_amount)?;
        require("investmentAmount", investment > 0.0, "must be greater than 0")?;

        let high = parse_decimal("highestSellingPrice", &self.highest_selling_price)?;
        require("highestSellingPrice", high > 0.0, "must be greater than 0")?;

        let low = parse_decimal("lowestSellingPrice", &self.lowest_selling_price)?;
        require("lowestSellingPrice", low > 0.0, "must be greater than 0")?;

        let percent = parse_decimal("percentageToMarket", &self.percentage_to_market)?;
        require(
            "percentageToMarket",
            (0.0..=100.0).contains(&percent),
            "must be between 0 and 100",
        )?;

        let days = self.holding_time.trim().parse::<i32>().map_err(|_| {
            TrackerError::Validation(format!(
                "holdingTime must be a whole number of days, got {:?}",
                self.holding_time
            ))
        })?;
        require("holdingTime", days > 0, "must be greater than 0")?;

        let initial = parse_decimal("initialPurchasePrice", &self.initial_purchase_price)?;
        require(
            "initialPurchasePrice",
            initial > 0.0,
            "must be greater than 0 (no price quote yet?)",
        )?;

        Ok(())
    }
}

/// Lowercased, trimmed asset slug as the price API expects it.
pub fn normalize_asset_id(asset_id: &str) -> String {
    asset_id.trim().to_lowercase()
}

/// Parses an investment amount, accepting only positive values.
pub fn parse_investment(amount: &str) -> Option<f64> {
    amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Stored coin quantity for `amount` at `unit_price`, empty without a quote.
pub fn coin_amount_text(amount: &str, unit_price: Option<f64>) -> String {
    parse_investment(amount)
        .zip(unit_price)
        .and_then(|(investment, price)| quote_to_coin_amount(investment, price))
        .map(format_coin_amount)
        .unwrap_or_default()
}

/// User input for a new purchase, before the coin quantity is known.
#[derive(Debug, Clone, Default)]
pub struct PurchaseDraft {
    pub asset_id: String,
    pub investment_amount: String,
    pub highest_selling_price: String,
    pub lowest_selling_price: String,
    pub percentage_to_market: String,
    pub holding_time: String,
    pub notes: String,
}

impl PurchaseDraft {
    /// Builds the record, filling the coin quantity from `unit_price`.
    pub fn into_record(self, unit_price: Option<f64>) -> PurchaseRecord {
        let initial_purchase_price = coin_amount_text(&self.investment_amount, unit_price);
        PurchaseRecord {
            cryptocurrency: normalize_asset_id(&self.asset_id),
            investment_amount: self.investment_amount,
            highest_selling_price: self.highest_selling_price,
            lowest_selling_price: self.lowest_selling_price,
            percentage_to_market: self.percentage_to_market,
            holding_time: self.holding_time,
            initial_purchase_price,
            notes: self.notes,
        }
    }
}

/// A record read back from the feed together with the store's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub record: PurchaseRecord,
}

impl AsRef<PurchaseRecord> for StoredRecord {
    fn as_ref(&self) -> &PurchaseRecord {
        &self.record
    }
}

impl AsRef<PurchaseRecord> for PurchaseRecord {
    fn as_ref(&self) -> &PurchaseRecord {
        self
    }
}
