//! File input/output: CSV ingest and result exports.

pub mod export;
pub mod ingest;
