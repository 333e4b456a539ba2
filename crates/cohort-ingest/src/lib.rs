//! Batch ingestion of frozen-file extracts into the Cohort warehouse.
//!
//! A "frozen file" is one labeled snapshot-in-time CSV extract of the source
//! system. The driver discovers extracts in a data directory, classifies
//! them by filename, and loads them row by row through any
//! [`cohort_core::store::WarehouseStore`] backend. One bad row never blocks
//! an extract; one unreadable file or store failure aborts the batch.

pub mod error;
pub mod files;
pub mod pipeline;
pub mod record;

pub use error::{Error, Result};
pub use pipeline::{BatchSummary, FileSummary, IngestConfig, Loader};
