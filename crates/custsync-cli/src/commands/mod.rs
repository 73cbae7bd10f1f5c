pub mod config;
pub mod cookies;
pub mod ingest;
pub mod session;
