//! Error types for `cohort-core`.

use thiserror::Error;

use crate::field::FieldKind;

#[derive(Debug, Error)]
pub enum Error {
  /// A raw field value does not match the shape declared for it.
  /// The row that produced it is dropped; the file continues.
  #[error("malformed {kind} value in field {field:?}: {value:?}")]
  MalformedField {
    field: &'static str,
    kind:  FieldKind,
    value: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
