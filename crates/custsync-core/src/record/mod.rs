//! Record domain module.
//!
//! Classification, normalization and identity of the rows found in the
//! customer analytics CSV exports.
//!
//! # Module Structure
//!
//! - `model`: `RecordKind`, `TrendRecord`, `LocationRecord` and run context types
//! - `columns`: Candidate header tables per logical field
//! - `classifier`: Header-based routing to a record kind
//! - `normalizer`: Raw row to canonical record mapping
//! - `key`: Identity keys and `ExistingKeySet`
//! - `repository`: `RecordStore` trait for the append-only datasets

mod classifier;
pub mod columns;
mod key;
mod model;
mod normalizer;
pub mod repository;

pub use classifier::classify;
pub use key::{ExistingKeySet, IdentityKey, KEY_SEPARATOR, join_key, key_for};
pub use model::{
    DatasetRecord, LocationPeriod, LocationRecord, RawRow, RecordKind, StoreContext, TrendRecord,
};
pub use normalizer::{canonical_date, normalize_location_row, normalize_trend_row, parse_count};
pub use repository::RecordStore;
