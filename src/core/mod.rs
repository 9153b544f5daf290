//! Core business logic abstractions

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod log;
pub mod price;
pub mod quote;
pub mod record;
pub mod store;

// Re-export main types for cleaner imports
pub use error::TrackerError;
pub use price::{PriceProvider, PriceQuote};
pub use record::{PurchaseDraft, PurchaseRecord, StoredRecord};
pub use store::{FetchOutcome, RecordStore};
