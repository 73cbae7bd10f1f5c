//! File-backed implementations of the custsync-core traits.

pub mod config;
pub mod csv_decoder;
pub mod csv_record_store;
pub mod dir_debug_sink;
pub mod json_cookie_source;
pub mod paths;
pub mod storage;

pub use config::{AppConfig, ConfigOverrides, ConfigService};
pub use csv_decoder::{DecodedCsv, decode_csv};
pub use csv_record_store::CsvRecordStore;
pub use dir_debug_sink::DirDebugSink;
pub use json_cookie_source::JsonCookieSource;
pub use paths::{CustsyncPaths, PathError};
