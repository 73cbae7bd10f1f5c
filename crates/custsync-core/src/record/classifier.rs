//! Routes a CSV to a record family by its header set.

use super::columns::{LOCATION_MARKERS, TREND_MARKERS, header_key};
use super::model::RecordKind;

/// Classifies a CSV from its column headers.
///
/// Trends markers are checked before locations markers, so a header set
/// containing both classifies as `Trends`.
pub fn classify<S: AsRef<str>>(column_headers: &[S]) -> RecordKind {
    let lowered: Vec<String> = column_headers
        .iter()
        .map(|h| header_key(h.as_ref()))
        .collect();

    let has_any = |markers: &[&str]| lowered.iter().any(|h| markers.contains(&h.as_str()));

    if has_any(TREND_MARKERS) {
        RecordKind::Trends
    } else if has_any(LOCATION_MARKERS) {
        RecordKind::Locations
    } else {
        RecordKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_trends_headers() {
        assert_eq!(
            classify(&["Date", "New", "Frequent", "Occasional"]),
            RecordKind::Trends
        );
    }

    #[test]
    fn test_japanese_locations_headers() {
        assert_eq!(
            classify(&["郵便番号", "新着", "低頻度", "高頻度", "すべて"]),
            RecordKind::Locations
        );
    }

    #[test]
    fn test_unrecognized_headers() {
        assert_eq!(classify(&["Foo", "Bar"]), RecordKind::Unknown);
        assert_eq!(classify::<&str>(&[]), RecordKind::Unknown);
    }

    #[test]
    fn test_trends_wins_ties() {
        assert_eq!(classify(&["Pincode", "日付"]), RecordKind::Trends);
    }

    #[test]
    fn test_headers_are_trimmed_and_case_folded() {
        assert_eq!(classify(&["\u{feff}DATE ", "new"]), RecordKind::Trends);
        assert_eq!(classify(&[" Postal Code", "All"]), RecordKind::Locations);
    }
}
