use super::util::ensure_success;
use crate::core::error::TrackerError;
use crate::core::record::{PurchaseRecord, StoredRecord};
use crate::core::store::{FetchOutcome, RecordStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

const API_KEY_HEADER: &str = "X-AIO-Key";

/// Purchase records kept on an Adafruit IO feed.
///
/// The feed only stores opaque strings, so every record travels as its JSON
/// text inside the entry's `value`.
pub struct AdafruitFeedStore {
    data_url: String,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
struct NewEntry {
    value: String,
}

impl AdafruitFeedStore {
    pub fn new(base_url: &str, username: &str, feed_key: &str, api_key: &str, client: Client) -> Self {
        AdafruitFeedStore {
            data_url: format!(
                "{}/{}/feeds/{}/data",
                base_url.trim_end_matches('/'),
                username,
                feed_key
            ),
            api_key: api_key.to_string(),
            client,
        }
    }

    fn decode_entry(entry: &Value) -> Option<StoredRecord> {
        let Some(payload) = entry.get("value").and_then(Value::as_str) else {
            debug!("Skipping feed entry without a string value");
            return None;
        };
        let record = match Self::decode_record(payload) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Skipping feed entry that is not a purchase record");
                return None;
            }
        };

        Some(StoredRecord {
            id: entry.get("id").and_then(|id| match id {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            created_at: entry
                .get("created_at")
                .and_then(Value::as_str)
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map(|ts| ts.with_timezone(&Utc)),
            record,
        })
    }

    /// Only a JSON object is a record; serde would also accept a sequence.
    fn decode_record(payload: &str) -> Result<PurchaseRecord, TrackerError> {
        match serde_json::from_str::<Value>(payload)? {
            object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
            other => Err(TrackerError::Parse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl RecordStore for AdafruitFeedStore {
    #[instrument(name = "FeedAppend", skip_all, fields(asset = %record.cryptocurrency))]
    async fn append(&self, record: &PurchaseRecord) -> Result<(), TrackerError> {
        let entry = NewEntry {
            value: serde_json::to_string(record)?,
        };
        debug!("Appending record to {}", self.data_url);

        let response = self
            .client
            .post(&self.data_url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&entry)
            .send()
            .await?;
        ensure_success(response, "data store")?;
        Ok(())
    }

    #[instrument(name = "FeedFetch", skip_all)]
    async fn fetch_all(&self) -> Result<FetchOutcome, TrackerError> {
        debug!("Fetching records from {}", self.data_url);

        let response = self
            .client
            .get(&self.data_url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let text = ensure_success(response, "data store")?.text().await?;

        let entries: Vec<Value> = serde_json::from_str(&text)?;
        let total = entries.len();
        let records: Vec<StoredRecord> = entries.iter().filter_map(Self::decode_entry).collect();
        let skipped = total - records.len();

        debug!(total, skipped, "Fetched feed entries");
        Ok(FetchOutcome { records, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::util::build_client;
    use chrono::TimeZone;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED_PATH: &str = "/alice/feeds/purchase-data/data";
    const API_KEY: &str = "aio_test_key";

    fn store(base_url: &str) -> AdafruitFeedStore {
        let client = build_client(Duration::from_secs(10)).unwrap();
        AdafruitFeedStore::new(base_url, "alice", "purchase-data", API_KEY, client)
    }

    fn record(asset: &str) -> PurchaseRecord {
        PurchaseRecord {
            cryptocurrency: asset.to_string(),
            investment_amount: "100".to_string(),
            highest_selling_price: "60000".to_string(),
            lowest_selling_price: "40000".to_string(),
            percentage_to_market: "50".to_string(),
            holding_time: "30".to_string(),
            initial_purchase_price: "0.00200000".to_string(),
            notes: "first buy".to_string(),
        }
    }

    async fn create_fetch_server(body: String) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FEED_PATH))
            .and(header(API_KEY_HEADER, API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_append_wraps_record_as_string_value() {
        let mock_server = MockServer::start().await;
        let record = record("bitcoin");
        let expected_value = serde_json::to_string(&record).unwrap();

        Mock::given(method("POST"))
            .and(path(FEED_PATH))
            .and(header(API_KEY_HEADER, API_KEY))
            .and(body_json(serde_json::json!({ "value": expected_value })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        store(&mock_server.uri()).append(&record).await.unwrap();
    }

    #[tokio::test]
    async fn test_append_reports_rejection() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(FEED_PATH))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = store(&mock_server.uri()).append(&record("bitcoin")).await;
        match result {
            Err(TrackerError::Network(msg)) => {
                assert_eq!(msg, "HTTP error: 401 Unauthorized from data store")
            }
            other => panic!("expected Network, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_skips_unparsable_entries_in_order() {
        let first = serde_json::to_string(&record("ethereum")).unwrap();
        let second = serde_json::to_string(&record("bitcoin")).unwrap();
        let body = serde_json::json!([
            { "id": "0F1", "value": first, "created_at": "2024-03-02T10:15:00Z" },
            { "id": "0F0", "value": "not-json", "created_at": "2024-03-01T09:00:00Z" },
            { "id": "0EF", "value": second, "created_at": "2024-02-28T18:30:00Z" }
        ])
        .to_string();
        let mock_server = create_fetch_server(body).await;

        let outcome = store(&mock_server.uri()).fetch_all().await.unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.records[0].record, record("ethereum"));
        assert_eq!(outcome.records[0].id.as_deref(), Some("0F1"));
        assert_eq!(
            outcome.records[0].created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 10, 15, 0).unwrap())
        );
        assert_eq!(outcome.records[1].record, record("bitcoin"));
    }

    #[tokio::test]
    async fn test_fetch_skips_entries_without_string_value() {
        let good = serde_json::to_string(&record("dash")).unwrap();
        let body = serde_json::json!([
            { "id": 7 },
            { "value": 42 },
            { "value": "[1, 2]" },
            { "value": "[]" },
            { "value": "[\"bitcoin\", \"100\"]" },
            { "value": "\"bitcoin\"" },
            "plain string",
            { "id": 8, "value": good, "created_at": "yesterday" }
        ])
        .to_string();
        let mock_server = create_fetch_server(body).await;

        let outcome = store(&mock_server.uri()).fetch_all().await.unwrap();

        assert_eq!(outcome.skipped, 7);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].id.as_deref(), Some("8"));
        assert!(outcome.records[0].created_at.is_none());
        assert_eq!(outcome.records[0].record.cryptocurrency, "dash");
    }

    #[tokio::test]
    async fn test_fetch_reads_numeric_fields_as_text() {
        let body = serde_json::json!([
            { "value": r#"{"cryptocurrency":"bitcoin","investmentAmount":100,"holdingTime":30,"initialPurchasePrice":0.002}"# }
        ])
        .to_string();
        let mock_server = create_fetch_server(body).await;

        let outcome = store(&mock_server.uri()).fetch_all().await.unwrap();

        assert_eq!(outcome.skipped, 0);
        let record = &outcome.records[0].record;
        assert_eq!(record.investment_amount, "100");
        assert_eq!(record.holding_time, "30");
        assert_eq!(record.initial_purchase_price, "0.002");
    }

    #[tokio::test]
    async fn test_fetch_empty_feed() {
        let mock_server = create_fetch_server("[]".to_string()).await;

        let outcome = store(&mock_server.uri()).fetch_all().await.unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped, 0);
    }

    #[tokio::test]
    async fn test_fetch_body_that_is_not_a_list() {
        let mock_server = create_fetch_server(r#"{"error": "feed missing"}"#.to_string()).await;

        let result = store(&mock_server.uri()).fetch_all().await;
        assert!(matches!(result, Err(TrackerError::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_without_valid_key_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FEED_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let result = store(&mock_server.uri()).fetch_all().await;
        match result {
            Err(TrackerError::Network(msg)) => assert!(msg.contains("403"), "{msg}"),
            other => panic!("expected Network, got {other:?}"),
        }
    }
}
