use crate::core::record::PurchaseRecord;

/// Keeps the records whose asset id contains `query`, ignoring case.
///
/// An empty query keeps everything. Matches stay in their original order.
pub fn filter_by_asset<'a, T>(records: &'a [T], query: &str) -> Vec<&'a T>
where
    T: AsRef<PurchaseRecord>,
{
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| r.as_ref().cryptocurrency.to_lowercase().contains(&needle))
        .collect()
}
