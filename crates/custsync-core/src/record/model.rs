//! Canonical record shapes for the two customer analytics exports.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

use super::key::IdentityKey;

/// One raw CSV row keyed by its (trimmed) header text.
pub type RawRow = BTreeMap<String, String>;

/// The classification outcome for a downloaded CSV.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Trends,
    Locations,
    /// Neither known shape; the rows are archived for manual inspection.
    Unknown,
}

/// The merchant store a run is collecting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreContext {
    pub store_id: String,
    /// Denormalized label stored on every record.
    pub store_name: String,
}

/// The dashboard date range a location export was taken under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPeriod {
    /// Dashboard preset label, e.g. `last_12_weeks`.
    pub preset: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl LocationPeriod {
    pub fn preset(preset: impl Into<String>) -> Self {
        Self {
            preset: preset.into(),
            start: None,
            end: None,
        }
    }
}

/// Daily cohort counts from the customer trends export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRecord {
    pub store_id: String,
    pub store_name: String,
    /// ISO `YYYY-MM-DD` when the source date parsed, raw text otherwise.
    pub date: String,
    pub new_customers: u64,
    pub frequent_customers: u64,
    pub occasional_customers: u64,
    /// Always `new + frequent + occasional`.
    pub total: u64,
    /// RFC 3339 timestamp of normalization.
    pub downloaded_at: String,
}

/// Per-postal-code cohort counts from the customer locations export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub store_id: String,
    pub store_name: String,
    pub period_preset: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub pincode: String,
    pub new_customers: u64,
    pub occasional_customers: u64,
    pub frequent_customers: u64,
    /// Taken from the upstream "all" column as-is.
    pub total: u64,
    pub downloaded_at: String,
}

/// A record that lives in one of the append-only datasets.
pub trait DatasetRecord:
    IdentityKey + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// The dataset this record belongs to.
    const KIND: RecordKind;
}

impl DatasetRecord for TrendRecord {
    const KIND: RecordKind = RecordKind::Trends;
}

impl DatasetRecord for LocationRecord {
    const KIND: RecordKind = RecordKind::Locations;
}
