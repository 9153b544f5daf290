//! Conversions between fiat amounts, coin quantities and unit prices.
use crate::core::record::PurchaseRecord;

/// Number of coins bought with `investment_amount` at `unit_price`.
///
/// Returns `None` while there is no usable quote (`unit_price <= 0`), which
/// callers show as an empty field rather than zero.
pub fn quote_to_coin_amount(investment_amount: f64, unit_price: f64) -> Option<f64> {
    if !unit_price.is_finite() || unit_price <= 0.0 {
        return None;
    }
    Some(investment_amount / unit_price)
}

/// Value of `coin_amount` coins at `current_unit_price`.
pub fn current_value(coin_amount: f64, current_unit_price: f64) -> f64 {
    coin_amount * current_unit_price
}

/// Change of `current_value` relative to `original_investment`, in percent.
///
/// `None` when the original investment is zero.
pub fn percentage_change(current_value: f64, original_investment: f64) -> Option<f64> {
    if original_investment == 0.0 {
        return None;
    }
    Some(((current_value - original_investment) / original_investment) * 100.0)
}

/// Price paid per coin at purchase time, or 0 for an empty holding.
pub fn original_unit_value(investment_amount: f64, coin_amount: f64) -> f64 {
    if coin_amount != 0.0 {
        investment_amount / coin_amount
    } else {
        0.0
    }
}

/// Renders a coin quantity the way it is stored in `initialPurchasePrice`.
pub fn format_coin_amount(coin_amount: f64) -> String {
    format!("{coin_amount:.8}")
}

/// Derived figures for one stored purchase at a live price.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    pub original_value: f64,
    pub coin_amount: f64,
    pub original_unit_value: f64,
    pub current_unit_value: Option<f64>,
    pub current_value: Option<f64>,
    pub percentage_change: Option<f64>,
}

impl Valuation {
    /// Values `record` at `current_unit_price` (`None` while still loading).
    ///
    /// An unreadable investment counts as 0 and an unreadable coin amount as 1.
    pub fn of(record: &PurchaseRecord, current_unit_price: Option<f64>) -> Self {
        let original_value = record.investment_amount.trim().parse().unwrap_or(0.0);
        let coin_amount = record.initial_purchase_price.trim().parse().unwrap_or(1.0);
        let current = current_unit_price.map(|price| current_value(coin_amount, price));

        Valuation {
            original_value,
            coin_amount,
            original_unit_value: original_unit_value(original_value, coin_amount),
            current_unit_value: current_unit_price,
            current_value: current,
            percentage_change: current.and_then(|v| percentage_change(v, original_value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_coin_amount_round_trips_through_current_value() {
        for (investment, price) in [(100.0, 50000.0), (2500.5, 1.37), (0.01, 0.0003)] {
            let coins = quote_to_coin_amount(investment, price).unwrap();
            assert!(approx_eq(current_value(coins, price), investment));
        }
    }

    #[test]
    fn test_no_coin_amount_without_positive_price() {
        assert_eq!(quote_to_coin_amount(100.0, 0.0), None);
        assert_eq!(quote_to_coin_amount(100.0, -3.0), None);
        assert_eq!(quote_to_coin_amount(100.0, f64::NAN), None);
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(1100.0, 1000.0), Some(10.0));
        assert_eq!(percentage_change(900.0, 1000.0), Some(-10.0));
        assert_eq!(percentage_change(1100.0, 0.0), None);
    }

    #[test]
    fn test_original_unit_value() {
        assert_eq!(original_unit_value(100.0, 0.002), 50000.0);
        assert_eq!(original_unit_value(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_format_coin_amount_uses_eight_places() {
        let coins = quote_to_coin_amount(100.0, 50000.0).unwrap();
        assert_eq!(format_coin_amount(coins), "0.00200000");
        assert_eq!(format_coin_amount(1.0), "1.00000000");
    }

    #[test]
    fn test_valuation_with_price() {
        let record = PurchaseRecord {
            cryptocurrency: "bitcoin".to_string(),
            investment_amount: "1000".to_string(),
            initial_purchase_price: "0.02000000".to_string(),
            ..Default::default()
        };

        let valuation = Valuation::of(&record, Some(55000.0));
        assert_eq!(valuation.original_value, 1000.0);
        assert!(approx_eq(valuation.original_unit_value, 50000.0));
        assert!(approx_eq(valuation.current_value.unwrap(), 1100.0));
        assert!(approx_eq(valuation.percentage_change.unwrap(), 10.0));
    }

    #[test]
    fn test_valuation_while_loading_and_with_defaults() {
        let record = PurchaseRecord::default();

        let valuation = Valuation::of(&record, None);
        assert_eq!(valuation.original_value, 0.0);
        assert_eq!(valuation.coin_amount, 1.0);
        assert_eq!(valuation.original_unit_value, 0.0);
        assert!(valuation.current_value.is_none());
        assert!(valuation.percentage_change.is_none());

        // Zero investment never divides.
        let valuation = Valuation::of(&record, Some(10.0));
        assert_eq!(valuation.current_value, Some(10.0));
        assert!(valuation.percentage_change.is_none());
    }
}
