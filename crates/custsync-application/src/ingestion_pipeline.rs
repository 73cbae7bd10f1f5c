//! Run-scoped ingestion of decoded CSV rows.
//!
//! An `IngestionPipeline` owns the two existing-key sets for the duration of
//! one run. It is loaded once from durable storage; after that every accepted
//! key is inserted into the in-memory set before the next row is looked at,
//! so duplicates across CSVs in the same run are skipped too.

use chrono::{DateTime, Utc};
use custsync_core::debug::{DebugBlob, DebugSink};
use custsync_core::record::{
    DatasetRecord, ExistingKeySet, LocationPeriod, LocationRecord, RawRow, RecordKind,
    RecordStore, StoreContext, TrendRecord, classify, key_for, normalize_location_row,
    normalize_trend_row,
};
use custsync_core::{CustsyncError, Result};
use std::sync::Arc;

use crate::report::RunCounters;

/// Result of ingesting one CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    pub kind: RecordKind,
    pub accepted: usize,
    /// Rows whose identity key was already known.
    pub skipped: usize,
    /// Rows with a blank identity field, which are never stored.
    pub rejected: usize,
}

pub struct IngestionPipeline {
    store: StoreContext,
    period: LocationPeriod,
    trend_keys: ExistingKeySet,
    location_keys: ExistingKeySet,
    trend_store: Arc<dyn RecordStore<TrendRecord>>,
    location_store: Arc<dyn RecordStore<LocationRecord>>,
    /// Receives unknown-shape CSVs.
    archive: Arc<dyn DebugSink>,
    counters: RunCounters,
}

impl IngestionPipeline {
    /// Reads both datasets once and builds the key sets.
    pub async fn load(
        store: StoreContext,
        period: LocationPeriod,
        trend_store: Arc<dyn RecordStore<TrendRecord>>,
        location_store: Arc<dyn RecordStore<LocationRecord>>,
        archive: Arc<dyn DebugSink>,
    ) -> Result<Self> {
        let trend_keys = ExistingKeySet::from_records(&trend_store.read_all().await?);
        let location_keys = ExistingKeySet::from_records(&location_store.read_all().await?);

        tracing::info!(
            store_id = %store.store_id,
            trend_keys = trend_keys.len(),
            location_keys = location_keys.len(),
            "Loaded existing keys"
        );

        Ok(Self {
            store,
            period,
            trend_keys,
            location_keys,
            trend_store,
            location_store,
            archive,
            counters: RunCounters::default(),
        })
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// Ingests one decoded CSV.
    ///
    /// `label` names the CSV in logs and archive file names.
    ///
    /// # Errors
    ///
    /// `StorageAppend` when the accepted batch cannot be written. Nothing
    /// else in a single CSV is fatal.
    pub async fn ingest(
        &mut self,
        rows: &[RawRow],
        column_headers: &[String],
        label: &str,
    ) -> Result<IngestOutcome> {
        self.ingest_at(rows, column_headers, label, Utc::now()).await
    }

    /// Like [`ingest`](Self::ingest) with an explicit normalization timestamp.
    pub async fn ingest_at(
        &mut self,
        rows: &[RawRow],
        column_headers: &[String],
        label: &str,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome> {
        let kind = classify(column_headers);
        tracing::info!(label, %kind, rows = rows.len(), "Classified CSV");

        let tally = match kind {
            RecordKind::Trends => {
                let store = &self.store;
                let batch = select_novel(rows, &mut self.trend_keys, |raw| {
                    normalize_trend_row(raw, store, now)
                });
                append(self.trend_store.as_ref(), batch).await?
            }
            RecordKind::Locations => {
                let store = &self.store;
                let period = &self.period;
                let batch = select_novel(rows, &mut self.location_keys, |raw| {
                    normalize_location_row(raw, store, period, now)
                });
                append(self.location_store.as_ref(), batch).await?
            }
            RecordKind::Unknown => {
                self.archive_unknown(rows, column_headers, label, now).await;
                Tally::default()
            }
        };

        let outcome = IngestOutcome {
            kind,
            accepted: tally.accepted,
            skipped: tally.skipped,
            rejected: tally.rejected,
        };
        self.counters.record(&outcome);
        Ok(outcome)
    }

    async fn archive_unknown(
        &self,
        rows: &[RawRow],
        column_headers: &[String],
        label: &str,
        now: DateTime<Utc>,
    ) {
        tracing::warn!(label, headers = ?column_headers, "Unrecognized CSV layout, archiving");

        let name = format!(
            "unknown_csv_{}_{}.json",
            label,
            now.format("%Y%m%dT%H%M%S%3fZ")
        );
        let payload = serde_json::json!({
            "headers": column_headers,
            "rows": rows,
        });

        let result = match serde_json::to_vec_pretty(&payload) {
            Ok(bytes) => self.archive.put(&name, DebugBlob::json(bytes)).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!(name = %name, error = %e, "Failed to archive unknown CSV");
        }
    }
}

/// A batch of novel records plus the rows left out of it.
struct Selection<R> {
    records: Vec<R>,
    skipped: usize,
    rejected: usize,
}

#[derive(Default)]
struct Tally {
    accepted: usize,
    skipped: usize,
    rejected: usize,
}

fn select_novel<R, F>(rows: &[RawRow], keys: &mut ExistingKeySet, normalize: F) -> Selection<R>
where
    R: DatasetRecord,
    F: Fn(&RawRow) -> R,
{
    let mut records = Vec::new();
    let mut skipped = 0;
    let mut rejected = 0;

    for raw in rows {
        let record = normalize(raw);
        if !record.has_identity() {
            tracing::warn!(
                kind = %R::KIND,
                row = ?raw,
                "Blank identity field, row not stored"
            );
            rejected += 1;
            continue;
        }

        let key = key_for(&record);
        if keys.insert(key.clone()) {
            tracing::debug!(kind = %R::KIND, key = %key, "Accepted row");
            records.push(record);
        } else {
            tracing::debug!(kind = %R::KIND, key = %key, "Skipped known row");
            skipped += 1;
        }
    }

    Selection {
        records,
        skipped,
        rejected,
    }
}

async fn append<R: DatasetRecord>(
    store: &dyn RecordStore<R>,
    selection: Selection<R>,
) -> Result<Tally> {
    let Selection {
        records,
        skipped,
        rejected,
    } = selection;
    if records.is_empty() {
        tracing::info!(kind = %R::KIND, skipped, rejected, "No new rows");
        return Ok(Tally {
            accepted: 0,
            skipped,
            rejected,
        });
    }

    let pending = records.len();
    store
        .append_batch(&records)
        .await
        .map_err(|e| CustsyncError::storage_append(R::KIND, pending, e.to_string()))?;

    tracing::info!(
        kind = %R::KIND,
        accepted = pending,
        skipped,
        rejected,
        "Appended rows"
    );
    Ok(Tally {
        accepted: pending,
        skipped,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryStore, RecordingSink, row};
    use chrono::TimeZone;

    fn context() -> StoreContext {
        StoreContext {
            store_id: "S1".to_string(),
            store_name: "Shibuya".to_string(),
        }
    }

    fn trend_headers() -> Vec<String> {
        ["Date", "New", "Frequent", "Occasional"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn existing_trend(date: &str) -> TrendRecord {
        TrendRecord {
            store_id: "S1".to_string(),
            store_name: "Shibuya".to_string(),
            date: date.to_string(),
            new_customers: 1,
            frequent_customers: 1,
            occasional_customers: 1,
            total: 3,
            downloaded_at: "2024-01-02T00:00:00.000Z".to_string(),
        }
    }

    async fn pipeline(
        trends: Arc<MemoryStore<TrendRecord>>,
        locations: Arc<MemoryStore<LocationRecord>>,
        sink: Arc<RecordingSink>,
    ) -> IngestionPipeline {
        IngestionPipeline::load(
            context(),
            LocationPeriod::preset("last_12_weeks"),
            trends,
            locations,
            sink,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_existing_key_is_skipped_and_novel_row_appended() {
        let trends = Arc::new(MemoryStore::with_records(vec![existing_trend("2024-01-01")]));
        let locations = Arc::new(MemoryStore::default());
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline = pipeline(trends.clone(), locations, sink).await;

        let rows = vec![
            row(&[("Date", "2024-01-01"), ("New", "2"), ("Frequent", "3"), ("Occasional", "0")]),
            row(&[("Date", "2024-01-02"), ("New", "2"), ("Frequent", "3"), ("Occasional", "0")]),
        ];
        let outcome = pipeline
            .ingest(&rows, &trend_headers(), "download1")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            IngestOutcome {
                kind: RecordKind::Trends,
                accepted: 1,
                skipped: 1,
                rejected: 0,
            }
        );
        assert_eq!(trends.append_calls(), 1);
        let appended = trends.appended();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].date, "2024-01-02");
        assert_eq!(appended[0].total, 5);
    }

    #[tokio::test]
    async fn test_second_ingest_is_idempotent() {
        let trends = Arc::new(MemoryStore::default());
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline = pipeline(trends.clone(), Arc::new(MemoryStore::default()), sink).await;

        let rows = vec![row(&[("日付", "2024/01/05"), ("新着", "1")])];
        let headers = vec!["日付".to_string(), "新着".to_string()];

        let first = pipeline.ingest(&rows, &headers, "a").await.unwrap();
        let second = pipeline.ingest(&rows, &headers, "b").await.unwrap();

        assert_eq!(first.accepted, 1);
        assert_eq!(second.accepted, 0);
        assert_eq!(second.skipped, 1);
        assert_eq!(trends.append_calls(), 1);
        assert_eq!(pipeline.counters().trends.accepted, 1);
        assert_eq!(pipeline.counters().trends.skipped, 1);
    }

    #[tokio::test]
    async fn test_duplicates_within_one_csv_are_skipped() {
        let trends = Arc::new(MemoryStore::default());
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline = pipeline(trends.clone(), Arc::new(MemoryStore::default()), sink).await;

        let rows = vec![
            row(&[("Date", "2024-01-01"), ("New", "1")]),
            row(&[("Date", "2024-01-01"), ("New", "9")]),
        ];
        let outcome = pipeline.ingest(&rows, &trend_headers(), "a").await.unwrap();

        assert_eq!((outcome.accepted, outcome.skipped), (1, 1));
        assert_eq!(trends.appended()[0].new_customers, 1);
    }

    #[tokio::test]
    async fn test_locations_are_keyed_by_period_and_pincode() {
        let locations = Arc::new(MemoryStore::default());
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline =
            pipeline(Arc::new(MemoryStore::default()), locations.clone(), sink).await;

        let headers = vec!["郵便番号".to_string(), "新着".to_string(), "すべて".to_string()];
        let rows = vec![
            row(&[("郵便番号", "150-0002"), ("新着", "3"), ("すべて", "7")]),
            row(&[("郵便番号", "150-0001"), ("新着", "1"), ("すべて", "1")]),
        ];
        let outcome = pipeline.ingest(&rows, &headers, "download2").await.unwrap();

        assert_eq!(outcome.kind, RecordKind::Locations);
        assert_eq!(outcome.accepted, 2);
        let appended = locations.appended();
        assert_eq!(appended[0].period_preset, "last_12_weeks");
        assert_eq!(appended[0].total, 7);
    }

    fn stored_location(pincode: &str) -> LocationRecord {
        LocationRecord {
            store_id: "S1".to_string(),
            store_name: "Shibuya".to_string(),
            period_preset: "last_12_weeks".to_string(),
            period_start: None,
            period_end: None,
            pincode: pincode.to_string(),
            new_customers: 3,
            occasional_customers: 0,
            frequent_customers: 4,
            total: 7,
            downloaded_at: "2024-01-02T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_stored_location_key_survives_reload() {
        let locations = Arc::new(MemoryStore::with_records(vec![stored_location("150-0002")]));
        let headers = vec!["郵便番号".to_string(), "新着".to_string(), "すべて".to_string()];
        let rows = vec![row(&[("郵便番号", "150-0002"), ("新着", "3"), ("すべて", "7")])];

        let mut same_period = pipeline(
            Arc::new(MemoryStore::default()),
            locations.clone(),
            Arc::new(RecordingSink::default()),
        )
        .await;
        let outcome = same_period.ingest(&rows, &headers, "a").await.unwrap();
        assert_eq!((outcome.accepted, outcome.skipped), (0, 1));
        assert_eq!(locations.append_calls(), 0);

        let mut other_period = IngestionPipeline::load(
            context(),
            LocationPeriod::preset("last_4_weeks"),
            Arc::new(MemoryStore::default()),
            locations.clone(),
            Arc::new(RecordingSink::default()),
        )
        .await
        .unwrap();
        let outcome = other_period.ingest(&rows, &headers, "b").await.unwrap();
        assert_eq!((outcome.accepted, outcome.skipped), (1, 0));
        assert_eq!(locations.appended()[0].period_preset, "last_4_weeks");
    }

    #[tokio::test]
    async fn test_upper_case_headers_keep_distinct_dates() {
        let trends = Arc::new(MemoryStore::default());
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline = pipeline(trends.clone(), Arc::new(MemoryStore::default()), sink).await;

        let headers = vec!["DATE".to_string(), "NEW".to_string()];
        let rows = vec![
            row(&[("DATE", "2024-01-01"), ("NEW", "2")]),
            row(&[("DATE", "2024-01-02"), ("NEW", "5")]),
        ];
        let outcome = pipeline.ingest(&rows, &headers, "a").await.unwrap();

        assert_eq!(outcome.kind, RecordKind::Trends);
        assert_eq!((outcome.accepted, outcome.skipped), (2, 0));
        let appended = trends.appended();
        assert_eq!(appended[0].date, "2024-01-01");
        assert_eq!(appended[1].new_customers, 5);
    }

    #[tokio::test]
    async fn test_blank_date_row_is_rejected() {
        let trends = Arc::new(MemoryStore::default());
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline = pipeline(trends.clone(), Arc::new(MemoryStore::default()), sink).await;

        let rows = vec![
            row(&[("Date", "  "), ("New", "4")]),
            row(&[("Date", "2024-01-01"), ("New", "1")]),
            row(&[("Date", "2024-01-02"), ("New", "2")]),
        ];
        let outcome = pipeline.ingest(&rows, &trend_headers(), "a").await.unwrap();

        assert_eq!(
            (outcome.accepted, outcome.skipped, outcome.rejected),
            (2, 0, 1)
        );
        assert!(trends.appended().iter().all(|r| !r.date.is_empty()));
        assert_eq!(pipeline.counters().trends.rejected, 1);
    }

    #[tokio::test]
    async fn test_unknown_csv_is_archived_not_stored() {
        let trends = Arc::new(MemoryStore::default());
        let locations = Arc::new(MemoryStore::default());
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline = pipeline(trends.clone(), locations.clone(), sink.clone()).await;

        let headers = vec!["Foo".to_string(), "Bar".to_string()];
        let rows = vec![row(&[("Foo", "1"), ("Bar", "2")])];
        let now = Utc.with_ymd_and_hms(2024, 1, 3, 9, 30, 0).unwrap();
        let outcome = pipeline
            .ingest_at(&rows, &headers, "download1", now)
            .await
            .unwrap();

        assert_eq!(outcome.kind, RecordKind::Unknown);
        assert_eq!(outcome.accepted, 0);
        assert_eq!(trends.append_calls() + locations.append_calls(), 0);
        assert_eq!(pipeline.counters().unknown_files, 1);

        let blobs = sink.names();
        assert_eq!(blobs, vec!["unknown_csv_download1_20240103T093000000Z.json"]);
        let archived: serde_json::Value = serde_json::from_slice(&sink.blob(0).bytes).unwrap();
        assert_eq!(archived["headers"][0], "Foo");
        assert_eq!(archived["rows"][0]["Bar"], "2");
    }

    #[tokio::test]
    async fn test_archive_failure_is_not_fatal() {
        let sink = Arc::new(RecordingSink::failing());
        let mut pipeline = pipeline(
            Arc::new(MemoryStore::default()),
            Arc::new(MemoryStore::default()),
            sink,
        )
        .await;

        let headers = vec!["Foo".to_string()];
        let outcome = pipeline.ingest(&[], &headers, "x").await.unwrap();
        assert_eq!(outcome.kind, RecordKind::Unknown);
    }

    #[tokio::test]
    async fn test_append_failure_reports_pending_rows() {
        let trends = Arc::new(MemoryStore::failing_appends());
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline = pipeline(trends, Arc::new(MemoryStore::default()), sink).await;

        let rows = vec![
            row(&[("Date", "2024-01-01")]),
            row(&[("Date", "2024-01-02")]),
        ];
        let err = pipeline
            .ingest(&rows, &trend_headers(), "a")
            .await
            .unwrap_err();

        match err {
            CustsyncError::StorageAppend { kind, pending, .. } => {
                assert_eq!(kind, RecordKind::Trends);
                assert_eq!(pending, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_performs_no_write() {
        let trends = Arc::new(MemoryStore::with_records(vec![existing_trend("2024-01-01")]));
        let sink = Arc::new(RecordingSink::default());
        let mut pipeline = pipeline(trends.clone(), Arc::new(MemoryStore::default()), sink).await;

        let rows = vec![row(&[("Date", "2024-01-01")])];
        let outcome = pipeline.ingest(&rows, &trend_headers(), "a").await.unwrap();

        assert_eq!((outcome.accepted, outcome.skipped), (0, 1));
        assert_eq!(trends.append_calls(), 0);
    }
}
