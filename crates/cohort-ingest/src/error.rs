//! Error type for `cohort-ingest`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A field value failed to normalize. Recovered per row by the driver.
  #[error(transparent)]
  Malformed(#[from] cohort_core::Error),

  #[error("failed to open {path:?}: {source}")]
  FileOpen {
    path:   PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("failed to list data directory {path:?}: {source}")]
  ListDir {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A backend read or write failed. Fatal for the batch.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error; keeps the driver generic over store impls.
  pub fn store<E>(source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(source))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
