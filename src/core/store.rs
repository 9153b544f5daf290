//! Remote record store abstraction.

use crate::core::error::TrackerError;
use crate::core::record::{PurchaseRecord, StoredRecord};
use async_trait::async_trait;

/// Result of reading the whole feed.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Entries that decoded, in the order the store listed them.
    pub records: Vec<StoredRecord>,
    /// Entries whose payload was not a purchase record.
    pub skipped: usize,
}

/// Append-only collection of purchase records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn append(&self, record: &PurchaseRecord) -> Result<(), TrackerError>;

    async fn fetch_all(&self) -> Result<FetchOutcome, TrackerError>;
}
