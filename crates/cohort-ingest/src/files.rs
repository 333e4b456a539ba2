//! Discovery and classification of extract files.
//!
//! A file belongs to a category when its name contains the category's tag
//! and it carries a `.csv` extension. Anything else in the data directory is
//! ignored. Categories are checked in order, first match wins, mirroring the
//! source system's export naming.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// The three extract categories, in processing order. Demographics load
/// first so that enrollment preconditions can be satisfied within one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractKind {
  Demographics,
  CoursesTaken,
  Transfer,
}

impl ExtractKind {
  const IN_ORDER: [ExtractKind; 3] =
    [Self::Demographics, Self::CoursesTaken, Self::Transfer];

  /// The filename substring that marks this category.
  pub fn tag(self) -> &'static str {
    match self {
      Self::Demographics => "demographics",
      Self::CoursesTaken => "courses_taken",
      Self::Transfer => "transfer",
    }
  }

  fn classify(file_name: &str) -> Option<ExtractKind> {
    Self::IN_ORDER
      .into_iter()
      .find(|kind| file_name.contains(kind.tag()))
  }
}

/// One batch of classified extract files, each list sorted by name for
/// deterministic processing order.
#[derive(Debug, Default)]
pub struct Batch {
  pub demographics:  Vec<PathBuf>,
  pub courses_taken: Vec<PathBuf>,
  pub transfers:     Vec<PathBuf>,
}

/// Scan `dir` for `.csv` extracts and classify them.
pub fn discover(dir: &Path) -> Result<Batch> {
  let entries = std::fs::read_dir(dir).map_err(|source| Error::ListDir {
    path: dir.to_path_buf(),
    source,
  })?;

  let mut batch = Batch::default();
  for entry in entries {
    let entry = entry.map_err(|source| Error::ListDir {
      path: dir.to_path_buf(),
      source,
    })?;
    let path = entry.path();

    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
      continue;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
      continue;
    };

    match ExtractKind::classify(name) {
      Some(ExtractKind::Demographics) => batch.demographics.push(path),
      Some(ExtractKind::CoursesTaken) => batch.courses_taken.push(path),
      Some(ExtractKind::Transfer) => batch.transfers.push(path),
      None => {}
    }
  }

  batch.demographics.sort();
  batch.courses_taken.sort();
  batch.transfers.sort();
  Ok(batch)
}
