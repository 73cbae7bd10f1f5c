//! Maps raw bilingual CSV rows into canonical records.
//!
//! Normalization never fails: a missing or malformed cell becomes `0` (or an
//! empty string for text fields) so one bad cell cannot abort a batch.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use super::columns::{DATE, FREQUENT, LOCATION_TOTAL, NEW, OCCASIONAL, PINCODE};
use super::model::{LocationPeriod, LocationRecord, RawRow, StoreContext, TrendRecord};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日"];

/// Normalizes one row of the customer trends export.
///
/// `total` is recomputed from the cohort counts even when the source row
/// carries its own total column.
pub fn normalize_trend_row(
    raw: &RawRow,
    store: &StoreContext,
    downloaded_at: DateTime<Utc>,
) -> TrendRecord {
    let new_customers = parse_count(NEW.resolve(raw));
    let frequent_customers = parse_count(FREQUENT.resolve(raw));
    let occasional_customers = parse_count(OCCASIONAL.resolve(raw));

    TrendRecord {
        store_id: store.store_id.clone(),
        store_name: store.store_name.clone(),
        date: canonical_date(DATE.resolve(raw).unwrap_or_default()),
        new_customers,
        frequent_customers,
        occasional_customers,
        total: new_customers
            .saturating_add(frequent_customers)
            .saturating_add(occasional_customers),
        downloaded_at: timestamp(downloaded_at),
    }
}

/// Normalizes one row of the customer locations export.
pub fn normalize_location_row(
    raw: &RawRow,
    store: &StoreContext,
    period: &LocationPeriod,
    downloaded_at: DateTime<Utc>,
) -> LocationRecord {
    LocationRecord {
        store_id: store.store_id.clone(),
        store_name: store.store_name.clone(),
        period_preset: period.preset.clone(),
        period_start: period.start,
        period_end: period.end,
        pincode: PINCODE.resolve(raw).unwrap_or_default().trim().to_string(),
        new_customers: parse_count(NEW.resolve(raw)),
        occasional_customers: parse_count(OCCASIONAL.resolve(raw)),
        frequent_customers: parse_count(FREQUENT.resolve(raw)),
        total: parse_count(LOCATION_TOTAL.resolve(raw)),
        downloaded_at: timestamp(downloaded_at),
    }
}

/// Parses a customer count; anything but a non-negative integer yields `0`.
pub fn parse_count(cell: Option<&str>) -> u64 {
    let Some(cell) = cell else {
        return 0;
    };
    let digits: String = cell.trim().chars().filter(|c| *c != ',').collect();
    digits.parse::<u64>().unwrap_or(0)
}

/// Canonicalizes a date cell to `YYYY-MM-DD`, keeping unparseable text as-is.
pub fn canonical_date(cell: &str) -> String {
    let trimmed = cell.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn store() -> StoreContext {
        StoreContext {
            store_id: "S1".to_string(),
            store_name: "Shibuya".to_string(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_trend_total_is_recomputed() {
        let raw = row(&[
            ("日付", "2024/01/02"),
            ("新着", "2"),
            ("高頻度", "3"),
            ("低頻度", "4"),
            ("Total", "999"),
        ]);

        let record = normalize_trend_row(&raw, &store(), at());
        assert_eq!(record.date, "2024-01-02");
        assert_eq!(record.new_customers, 2);
        assert_eq!(record.frequent_customers, 3);
        assert_eq!(record.occasional_customers, 4);
        assert_eq!(record.total, 9);
        assert_eq!(record.downloaded_at, "2024-03-01T09:30:00.000Z");
    }

    #[test]
    fn test_trend_total_invariant_holds_for_noisy_rows() {
        let rows = [
            row(&[("Date", "2024-01-01"), ("New", "1,200"), ("Frequent", " 7 ")]),
            row(&[("date", "x"), ("new", "1.5"), ("occasional", "-3")]),
            row(&[]),
        ];
        for raw in rows {
            let r = normalize_trend_row(&raw, &store(), at());
            assert_eq!(
                r.total,
                r.new_customers + r.frequent_customers + r.occasional_customers
            );
        }
    }

    #[test]
    fn test_malformed_counts_default_to_zero() {
        assert_eq!(parse_count(None), 0);
        assert_eq!(parse_count(Some("")), 0);
        assert_eq!(parse_count(Some("abc")), 0);
        assert_eq!(parse_count(Some("2.5")), 0);
        assert_eq!(parse_count(Some("-1")), 0);
        assert_eq!(parse_count(Some("1,234")), 1234);
    }

    #[test]
    fn test_date_canonicalization() {
        assert_eq!(canonical_date("2024-01-05"), "2024-01-05");
        assert_eq!(canonical_date("2024/1/5"), "2024-01-05");
        assert_eq!(canonical_date("2024年1月5日"), "2024-01-05");
        assert_eq!(canonical_date(" Week 3 "), "Week 3");
    }

    #[test]
    fn test_location_trusts_upstream_total() {
        let raw = row(&[
            ("郵便番号", " 150-0002 "),
            ("新着", "1"),
            ("低頻度", "2"),
            ("高頻度", "3"),
            ("すべて", "10"),
        ]);
        let period = LocationPeriod::preset("last_12_weeks");

        let record = normalize_location_row(&raw, &store(), &period, at());
        assert_eq!(record.pincode, "150-0002");
        assert_eq!(record.new_customers, 1);
        assert_eq!(record.occasional_customers, 2);
        assert_eq!(record.frequent_customers, 3);
        assert_eq!(record.total, 10);
        assert_eq!(record.period_preset, "last_12_weeks");
        assert_eq!(record.period_start, None);
    }
}
