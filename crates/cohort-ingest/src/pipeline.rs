//! The batch ingestion driver.
//!
//! Per row the order is fixed: normalize raw fields, evaluate preconditions
//! (side-effect-free), resolve dimensions, compose-and-insert the fact. A
//! row that fails a precondition creates nothing, not even dimension rows.
//! A row that fails normalization is logged and dropped; the file continues.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use cohort_core::{
  dimension::{DimensionId, DimensionKind},
  fact::{
    CourseInstanceKey, DemographicKey, EnrollmentKey, NewCourse,
    NewDemographicEntry, TransferKey,
  },
  field,
  store::WarehouseStore,
};

use crate::{
  Error, Result,
  files::discover,
  record::{CourseRow, DemographicRow, TransferRow},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct IngestConfig {
  /// Transfer rows naming this institution describe home enrollment, not an
  /// external one, and are skipped.
  pub home_institution: String,
}

impl Default for IngestConfig {
  fn default() -> Self {
    Self { home_institution: "Jackson College".to_owned() }
  }
}

// ─── Summaries ───────────────────────────────────────────────────────────────

/// Ingestion counts for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSummary {
  pub rows:               u64,
  /// Rows whose fact was inserted.
  pub created:            u64,
  /// Rows whose fact already existed under its natural key.
  pub skipped:            u64,
  /// Rows skipped because a precondition (owning demographic entry,
  /// transfer flags) was not met.
  pub precondition_skips: u64,
  /// Rows dropped because a field failed to decode or normalize.
  pub malformed:          u64,
}

impl FileSummary {
  fn record(&mut self, outcome: RowOutcome) {
    match outcome {
      RowOutcome::Created => self.created += 1,
      RowOutcome::Existing => self.skipped += 1,
      RowOutcome::PreconditionSkip => self.precondition_skips += 1,
    }
  }

  fn add(&mut self, other: &FileSummary) {
    self.rows += other.rows;
    self.created += other.created;
    self.skipped += other.skipped;
    self.precondition_skips += other.precondition_skips;
    self.malformed += other.malformed;
  }
}

/// Counts for one batch run, per file in processing order.
#[derive(Debug, Default)]
pub struct BatchSummary {
  pub files: Vec<(PathBuf, FileSummary)>,
}

impl BatchSummary {
  pub fn totals(&self) -> FileSummary {
    let mut totals = FileSummary::default();
    for (_, file) in &self.files {
      totals.add(file);
    }
    totals
  }
}

/// How one row ended up.
#[derive(Debug, Clone, Copy)]
enum RowOutcome {
  Created,
  Existing,
  PreconditionSkip,
}

// ─── Loader ──────────────────────────────────────────────────────────────────

/// Drives one batch: discovery, then file-by-file, row-by-row ingestion.
///
/// Holds the store for the lifetime of the run; there is no process-wide
/// connection state.
pub struct Loader<'a, S> {
  store:  &'a S,
  config: IngestConfig,
}

impl<'a, S: WarehouseStore> Loader<'a, S> {
  pub fn new(store: &'a S, config: IngestConfig) -> Self {
    Self { store, config }
  }

  /// Ingest every extract under `data_dir`: demographics, then
  /// courses-taken, then transfers.
  pub async fn run(&self, data_dir: &Path) -> Result<BatchSummary> {
    let batch = discover(data_dir)?;
    let mut summary = BatchSummary::default();

    for path in &batch.demographics {
      let file = self.ingest_demographics(path).await?;
      info!(file = %path.display(), rows = file.rows, created = file.created, "demographics file done");
      summary.files.push((path.clone(), file));
    }
    for path in &batch.courses_taken {
      let file = self.ingest_courses_taken(path).await?;
      info!(file = %path.display(), rows = file.rows, created = file.created, "courses file done");
      summary.files.push((path.clone(), file));
    }
    for path in &batch.transfers {
      let file = self.ingest_transfers(path).await?;
      info!(file = %path.display(), rows = file.rows, created = file.created, "transfer file done");
      summary.files.push((path.clone(), file));
    }

    Ok(summary)
  }

  // ── Per-file loops ────────────────────────────────────────────────────────

  pub async fn ingest_demographics(&self, path: &Path) -> Result<FileSummary> {
    let mut reader = open_reader(path)?;
    let mut summary = FileSummary::default();

    for result in reader.deserialize::<DemographicRow>() {
      summary.rows += 1;
      let Some(row) = decode_row(result, path, &mut summary) else {
        continue;
      };
      match self.load_demographic(&row).await {
        Ok(outcome) => summary.record(outcome),
        Err(Error::Malformed(e)) => drop_row(path, summary.rows, &e, &mut summary),
        Err(fatal) => return Err(fatal),
      }
    }

    Ok(summary)
  }

  pub async fn ingest_courses_taken(&self, path: &Path) -> Result<FileSummary> {
    let mut reader = open_reader(path)?;
    let mut summary = FileSummary::default();

    for result in reader.deserialize::<CourseRow>() {
      summary.rows += 1;
      let Some(row) = decode_row(result, path, &mut summary) else {
        continue;
      };
      match self.load_course(&row).await {
        Ok(outcome) => summary.record(outcome),
        Err(Error::Malformed(e)) => drop_row(path, summary.rows, &e, &mut summary),
        Err(fatal) => return Err(fatal),
      }
    }

    Ok(summary)
  }

  pub async fn ingest_transfers(&self, path: &Path) -> Result<FileSummary> {
    let mut reader = open_reader(path)?;
    let mut summary = FileSummary::default();

    for result in reader.deserialize::<TransferRow>() {
      summary.rows += 1;
      let Some(row) = decode_row(result, path, &mut summary) else {
        continue;
      };
      match self.load_transfer(&row).await {
        Ok(outcome) => summary.record(outcome),
        Err(Error::Malformed(e)) => drop_row(path, summary.rows, &e, &mut summary),
        Err(fatal) => return Err(fatal),
      }
    }

    Ok(summary)
  }

  // ── Per-row pipelines ─────────────────────────────────────────────────────

  async fn load_demographic(&self, row: &DemographicRow) -> Result<RowOutcome> {
    // Normalize before any store side effect.
    let birth_date = field::slash_date("Person Birth Date", &row.birth_date)?;
    let hs_grad_date = field::slash_date("HS Grad Date", &row.hs_grad_date)?;

    let key = DemographicKey {
      person:  self.resolve(DimensionKind::PersonId, &row.person).await?,
      term:    self.resolve(DimensionKind::Term, &row.term).await?,
      extract: self.resolve(DimensionKind::Extract, &row.extract).await?,
    };

    let entry = NewDemographicEntry {
      key,
      person_alt: self.resolve(DimensionKind::PersonAltId, &row.person_alt).await?,
      birth_date,
      hs_grad_date,
      zip: self.resolve(DimensionKind::Zip, &row.zip).await?,
      student_type: self.resolve(DimensionKind::StudentType, &row.student_type).await?,
      gender: self.resolve(DimensionKind::Gender, &row.gender).await?,
      race: self.resolve(DimensionKind::Race, &row.race).await?,
      ethnicity: self.resolve(DimensionKind::Ethnicity, &row.ethnicity).await?,
    };

    let upsert = self
      .store
      .upsert_demographic_entry(entry)
      .await
      .map_err(Error::store)?;

    Ok(created_or_existing(upsert.is_created()))
  }

  async fn load_course(&self, row: &CourseRow) -> Result<RowOutcome> {
    let start_date =
      field::slash_date("Enrollment Term Start Date", &row.term_start)?;
    let section_credit =
      field::numeric("Section Credit Value (J10)", &row.section_credit)?;
    let billing_credit =
      field::numeric("Billing Cred (J10)", &row.billing_credit)?;

    // Precondition: the owning demographic entry must already exist.
    // Checked with non-creating lookups so a skipped row grows nothing.
    let Some(demographic_key) = self.find_demographic_key(row).await? else {
      debug!(person = %row.person, term = %row.term, "no demographic entry; skipping enrollment");
      return Ok(RowOutcome::PreconditionSkip);
    };
    let Some(demographic) = self
      .store
      .find_demographic_entry(demographic_key)
      .await
      .map_err(Error::store)?
    else {
      debug!(person = %row.person, term = %row.term, "no demographic entry; skipping enrollment");
      return Ok(RowOutcome::PreconditionSkip);
    };

    let subject = self.resolve(DimensionKind::CourseSubject, &row.subject).await?;
    let course = self
      .store
      .upsert_course(NewCourse {
        name: row.course_name.clone(),
        section_credit,
        billing_credit,
        subject,
      })
      .await
      .map_err(Error::store)?
      .id();

    let course_instance = self
      .store
      .upsert_course_instance(CourseInstanceKey {
        term: demographic_key.term,
        course_type: self.resolve(DimensionKind::CourseType, &row.course_type).await?,
        full_name: self.resolve(DimensionKind::CourseFullName, &row.full_name).await?,
        start_date,
        course,
      })
      .await
      .map_err(Error::store)?
      .id();

    let upsert = self
      .store
      .upsert_enrollment_event(EnrollmentKey {
        person: demographic_key.person,
        grade: self.resolve(DimensionKind::VerifiedGrade, &row.grade).await?,
        status: self.resolve(DimensionKind::EnrollmentStatus, &row.status).await?,
        credit_type: self.resolve(DimensionKind::CreditType, &row.credit_type).await?,
        extract: demographic_key.extract,
        course_instance,
        demographic,
      })
      .await
      .map_err(Error::store)?;

    Ok(created_or_existing(upsert.is_created()))
  }

  async fn load_transfer(&self, row: &TransferRow) -> Result<RowOutcome> {
    // Flag checks first: no store access, no side effects on failure.
    if row.record_found.trim() != "Y"
      || row.graduated.trim() != "N"
      || row.college == self.config.home_institution
    {
      return Ok(RowOutcome::PreconditionSkip);
    }

    let begin = field::compact_date("Enrollment Begin", &row.begin)?;
    let end = field::compact_date("Enrollment End", &row.end)?;

    let upsert = self
      .store
      .upsert_transfer_event(TransferKey {
        person:  self.resolve(DimensionKind::PersonId, &row.person).await?,
        college: self.resolve(DimensionKind::CollegeName, &row.college).await?,
        begin,
        end,
      })
      .await
      .map_err(Error::store)?;

    Ok(created_or_existing(upsert.is_created()))
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn resolve(
    &self,
    kind: DimensionKind,
    value: &str,
  ) -> Result<DimensionId> {
    self
      .store
      .resolve_dimension(kind, value)
      .await
      .map_err(Error::store)
  }

  /// Look up the row's (person, term, extract) without creating anything.
  /// `None` as soon as any component is absent.
  async fn find_demographic_key(
    &self,
    row: &CourseRow,
  ) -> Result<Option<DemographicKey>> {
    let person = self
      .store
      .find_dimension(DimensionKind::PersonId, &row.person)
      .await
      .map_err(Error::store)?;
    let term = self
      .store
      .find_dimension(DimensionKind::Term, &row.term)
      .await
      .map_err(Error::store)?;
    let extract = self
      .store
      .find_dimension(DimensionKind::Extract, &row.extract)
      .await
      .map_err(Error::store)?;

    match (person, term, extract) {
      (Some(person), Some(term), Some(extract)) => {
        Ok(Some(DemographicKey { person, term, extract }))
      }
      _ => Ok(None),
    }
  }
}

// ─── Row plumbing ────────────────────────────────────────────────────────────

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
  csv::Reader::from_path(path).map_err(|source| Error::FileOpen {
    path: path.to_path_buf(),
    source,
  })
}

fn decode_row<T>(
  result: csv::Result<T>,
  path: &Path,
  summary: &mut FileSummary,
) -> Option<T> {
  match result {
    Ok(row) => Some(row),
    Err(e) => {
      warn!(file = %path.display(), row = summary.rows, error = %e, "dropping undecodable row");
      summary.malformed += 1;
      None
    }
  }
}

fn drop_row(
  path: &Path,
  row: u64,
  error: &cohort_core::Error,
  summary: &mut FileSummary,
) {
  warn!(file = %path.display(), row, error = %error, "dropping malformed row");
  summary.malformed += 1;
}

fn created_or_existing(created: bool) -> RowOutcome {
  if created { RowOutcome::Created } else { RowOutcome::Existing }
}
