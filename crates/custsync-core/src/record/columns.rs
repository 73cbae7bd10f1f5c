//! Declarative column tables for the bilingual CSV exports.
//!
//! Each logical field lists its candidate header names in priority order:
//! English canonical, Japanese canonical, lowercase English alias, then any
//! extra aliases seen in older exports.

use super::model::RawRow;

/// Candidate header names for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldColumns {
    pub field: &'static str,
    pub candidates: &'static [&'static str],
}

impl FieldColumns {
    /// Returns the value of the first candidate present in the row.
    ///
    /// Exact header matches are tried first, in priority order. Headers are
    /// then compared trimmed and lowercased, the same way the classifier
    /// reads them, so `DATE` or `Postal code ` still resolve.
    pub fn resolve<'a>(&self, raw: &'a RawRow) -> Option<&'a str> {
        if let Some(value) = self.candidates.iter().find_map(|name| raw.get(*name)) {
            return Some(value.as_str());
        }

        self.candidates.iter().find_map(|name| {
            let wanted = name.to_lowercase();
            raw.iter()
                .find(|(header, _)| header_key(header) == wanted)
                .map(|(_, value)| value.as_str())
        })
    }
}

/// Normalizes header text for case-insensitive matching.
pub fn header_key(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

pub const DATE: FieldColumns = FieldColumns {
    field: "date",
    candidates: &["Date", "日付", "date"],
};

pub const NEW: FieldColumns = FieldColumns {
    field: "new",
    candidates: &["New", "新着", "new"],
};

pub const FREQUENT: FieldColumns = FieldColumns {
    field: "frequent",
    candidates: &["Frequent", "高頻度", "frequent"],
};

pub const OCCASIONAL: FieldColumns = FieldColumns {
    field: "occasional",
    candidates: &["Occasional", "低頻度", "occasional"],
};

pub const PINCODE: FieldColumns = FieldColumns {
    field: "pincode",
    candidates: &["Postal Code", "郵便番号", "pincode", "Pincode", "postal code"],
};

pub const LOCATION_TOTAL: FieldColumns = FieldColumns {
    field: "total",
    candidates: &["All", "すべて", "all", "Total", "total"],
};

pub const TREND_FIELDS: &[FieldColumns] = &[DATE, NEW, FREQUENT, OCCASIONAL];

pub const LOCATION_FIELDS: &[FieldColumns] = &[PINCODE, NEW, OCCASIONAL, FREQUENT, LOCATION_TOTAL];

/// Lowercased headers that identify a trends export.
pub const TREND_MARKERS: &[&str] = &["date", "日付"];

/// Lowercased headers that identify a locations export.
pub const LOCATION_MARKERS: &[&str] = &["郵便番号", "pincode", "postal code"];

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_english_canonical_wins_over_japanese() {
        let raw = row(&[("新着", "5"), ("New", "3"), ("new", "9")]);
        assert_eq!(NEW.resolve(&raw), Some("3"));
    }

    #[test]
    fn test_japanese_wins_over_lowercase_alias() {
        let raw = row(&[("new", "9"), ("新着", "5")]);
        assert_eq!(NEW.resolve(&raw), Some("5"));
    }

    #[test]
    fn test_missing_field_resolves_to_none() {
        let raw = row(&[("Foo", "1")]);
        assert_eq!(DATE.resolve(&raw), None);
    }

    #[test]
    fn test_headers_match_regardless_of_case_and_padding() {
        let raw = row(&[
            ("DATE", "2024-01-02"),
            (" Postal code ", "150-0002"),
            ("NEW", "4"),
        ]);
        assert_eq!(DATE.resolve(&raw), Some("2024-01-02"));
        assert_eq!(PINCODE.resolve(&raw), Some("150-0002"));
        assert_eq!(NEW.resolve(&raw), Some("4"));
    }

    #[test]
    fn test_exact_match_wins_over_case_folded_match() {
        let raw = row(&[("NEW", "1"), ("新着", "2")]);
        assert_eq!(NEW.resolve(&raw), Some("2"));
    }

    #[test]
    fn test_every_table_has_three_tier_candidates() {
        for columns in TREND_FIELDS.iter().chain(LOCATION_FIELDS) {
            assert!(columns.candidates.len() >= 3, "{}", columns.field);
        }
    }
}
