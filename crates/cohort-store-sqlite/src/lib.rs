//! SQLite backend for the Cohort warehouse.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Each store operation executes
//! as one closure on that thread, so a lookup-then-insert pair is never
//! interleaved with another writer.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
