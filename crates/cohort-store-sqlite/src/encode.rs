//! Encoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as ISO 8601 (`YYYY-MM-DD`) TEXT so that equality
//! comparison in natural-key lookups matches string equality in SQL.
//! Surrogate ids are stored as INTEGER and pass through unchanged.

use chrono::NaiveDate;

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}
