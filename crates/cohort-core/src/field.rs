//! Field normalization — raw extract text into canonical typed values.
//!
//! The source system emits dates in two shapes: slash dates (`MM/DD/YYYY`,
//! sometimes trailed by a `0:00` time component that carries no information)
//! and compact dates (`YYYYMMDD`). Both normalize to the same [`NaiveDate`].
//! Parsing is pure; a mismatch produces [`Error::MalformedField`] and nothing
//! else.

use std::fmt;

use chrono::NaiveDate;

use crate::{Error, Result};

/// The declared shape of a raw extract field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// `MM/DD/YYYY`, optionally followed by a time component (discarded).
  DateSlash,
  /// `YYYYMMDD` — exactly eight digits, no delimiter.
  DateCompact,
  /// A decimal number (credit values).
  Numeric,
  /// Free text, stored verbatim. Blank is an ordinary value.
  Text,
}

impl fmt::Display for FieldKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::DateSlash => "slash-date",
      Self::DateCompact => "compact-date",
      Self::Numeric => "numeric",
      Self::Text => "text",
    })
  }
}

fn malformed(field: &'static str, kind: FieldKind, raw: &str) -> Error {
  Error::MalformedField { field, kind, value: raw.to_owned() }
}

/// Parse a `MM/DD/YYYY` date, discarding any trailing time component
/// (`"01/15/2020 0:00"` parses the same as `"01/15/2020"`).
pub fn slash_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
  let date_part = raw.split_whitespace().next().unwrap_or("");
  let mut elems = date_part.split('/');
  let (month, day, year) =
    match (elems.next(), elems.next(), elems.next(), elems.next()) {
      (Some(m), Some(d), Some(y), None) => (m, d, y),
      _ => return Err(malformed(field, FieldKind::DateSlash, raw)),
    };

  let month: u32 = month
    .parse()
    .map_err(|_| malformed(field, FieldKind::DateSlash, raw))?;
  let day: u32 = day
    .parse()
    .map_err(|_| malformed(field, FieldKind::DateSlash, raw))?;
  let year: i32 = year
    .parse()
    .map_err(|_| malformed(field, FieldKind::DateSlash, raw))?;

  NaiveDate::from_ymd_opt(year, month, day)
    .ok_or_else(|| malformed(field, FieldKind::DateSlash, raw))
}

/// Parse a `YYYYMMDD` date. Anything other than exactly eight ASCII digits
/// is malformed.
pub fn compact_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
  let digits = raw.trim();
  if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return Err(malformed(field, FieldKind::DateCompact, raw));
  }

  let year: i32 = digits[0..4]
    .parse()
    .map_err(|_| malformed(field, FieldKind::DateCompact, raw))?;
  let month: u32 = digits[4..6]
    .parse()
    .map_err(|_| malformed(field, FieldKind::DateCompact, raw))?;
  let day: u32 = digits[6..8]
    .parse()
    .map_err(|_| malformed(field, FieldKind::DateCompact, raw))?;

  NaiveDate::from_ymd_opt(year, month, day)
    .ok_or_else(|| malformed(field, FieldKind::DateCompact, raw))
}

/// Parse a decimal number (section/billing credit values).
pub fn numeric(field: &'static str, raw: &str) -> Result<f64> {
  raw
    .trim()
    .parse()
    .map_err(|_| malformed(field, FieldKind::Numeric, raw))
}
