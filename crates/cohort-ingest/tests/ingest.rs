//! End-to-end ingestion tests: CSV fixtures on disk, in-memory SQLite store.

use std::path::{Path, PathBuf};

use cohort_core::{dimension::DimensionKind, fact::FactKind, store::WarehouseStore};
use cohort_ingest::{IngestConfig, Loader};
use cohort_store_sqlite::SqliteStore;

const DEMOGRAPHICS_HEADER: &str = "Person ID,Person UIC ID (J10),\
   Person Birth Date,HS Grad Date,Person Address Zip,Student Current Type,\
   Person Gender,Person Race 1,Person Ethnic 1,Frozen File Extract,\
   Enrollment Term";

const COURSES_HEADER: &str = "Person ID,Enrolled Verified Grade (J10),\
   Enrollment Current Status,Enrolled Course Credit Type,Frozen File Extract,\
   Enrollment Term,Enrollment Course Current Type (J10),\
   Enrolled Course Full Name (J10),Enrolled Course Name,\
   Enrolled Course Subject,Section Credit Value (J10),Billing Cred (J10),\
   Enrollment Term Start Date";

const TRANSFERS_HEADER: &str = "Person ID,College Name,Enrollment Begin,\
   Enrollment End,Record Found Y/N,Graduated?";

fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
  let path = dir.join(name);
  let mut contents = header.to_owned();
  for row in rows {
    contents.push('\n');
    contents.push_str(row);
  }
  contents.push('\n');
  std::fs::write(&path, contents).unwrap();
  path
}

fn demo_row(person: &str, term: &str, extract: &str) -> String {
  format!(
    "{person},U-{person},01/15/2002 0:00,05/30/2020 0:00,49201,FTIC,F,White,\
     Non-Hispanic,{extract},{term}"
  )
}

fn course_row(person: &str, term: &str, extract: &str, course: &str) -> String {
  format!(
    "{person},A,Enrolled,Institutional,{extract},{term},Lecture,College \
     Algebra,{course},MATH,4.0,4.0,09/03/2024 0:00"
  )
}

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

// ─── Full batch ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_batch_loads_every_fact_kind() {
  let dir = tempfile::tempdir().unwrap();
  write_csv(
    dir.path(),
    "fall_demographics.csv",
    DEMOGRAPHICS_HEADER,
    &[&demo_row("P1", "Fall 2024", "E1")],
  );
  write_csv(
    dir.path(),
    "fall_courses_taken.csv",
    COURSES_HEADER,
    &[&course_row("P1", "Fall 2024", "E1", "MATH101")],
  );
  write_csv(
    dir.path(),
    "nsc_transfer.csv",
    TRANSFERS_HEADER,
    &["P1,Ferris State,20240108,20240503,Y,N"],
  );

  let s = store().await;
  let loader = Loader::new(&s, IngestConfig::default());
  let summary = loader.run(dir.path()).await.unwrap();

  assert_eq!(summary.files.len(), 3);
  assert_eq!(summary.totals().created, 3);
  assert_eq!(summary.totals().malformed, 0);

  assert_eq!(s.count_facts(FactKind::DemographicEntry).await.unwrap(), 1);
  assert_eq!(s.count_facts(FactKind::Course).await.unwrap(), 1);
  assert_eq!(s.count_facts(FactKind::CourseInstance).await.unwrap(), 1);
  assert_eq!(s.count_facts(FactKind::EnrollmentEvent).await.unwrap(), 1);
  assert_eq!(s.count_facts(FactKind::TransferEvent).await.unwrap(), 1);
}

#[tokio::test]
async fn reingestion_is_idempotent() {
  let dir = tempfile::tempdir().unwrap();
  write_csv(
    dir.path(),
    "fall_demographics.csv",
    DEMOGRAPHICS_HEADER,
    &[
      &demo_row("P1", "Fall 2024", "E1"),
      &demo_row("P2", "Fall 2024", "E1"),
    ],
  );
  write_csv(
    dir.path(),
    "fall_courses_taken.csv",
    COURSES_HEADER,
    &[&course_row("P1", "Fall 2024", "E1", "MATH101")],
  );
  write_csv(
    dir.path(),
    "nsc_transfer.csv",
    TRANSFERS_HEADER,
    &["P2,Ferris State,20240108,20240503,Y,N"],
  );

  let s = store().await;
  let loader = Loader::new(&s, IngestConfig::default());

  loader.run(dir.path()).await.unwrap();
  let counts_once = all_counts(&s).await;

  let second = loader.run(dir.path()).await.unwrap();
  let counts_twice = all_counts(&s).await;

  assert_eq!(counts_once, counts_twice);
  assert_eq!(second.totals().created, 0);
  assert_eq!(second.totals().skipped, 4);
}

async fn all_counts(s: &SqliteStore) -> Vec<u64> {
  let mut counts = Vec::new();
  for kind in DimensionKind::ALL {
    counts.push(s.count_dimension(kind).await.unwrap());
  }
  for kind in FactKind::ALL {
    counts.push(s.count_facts(kind).await.unwrap());
  }
  counts
}

// ─── Precondition enforcement ────────────────────────────────────────────────

#[tokio::test]
async fn enrollment_requires_prior_demographic_entry() {
  let dir = tempfile::tempdir().unwrap();
  let demographics = write_csv(
    dir.path(),
    "fall_demographics.csv",
    DEMOGRAPHICS_HEADER,
    &[&demo_row("P1", "Fall 2024", "E1")],
  );
  let courses = write_csv(
    dir.path(),
    "fall_courses_taken.csv",
    COURSES_HEADER,
    &[&course_row("P1", "Fall 2024", "E1", "MATH101")],
  );

  let s = store().await;
  let loader = Loader::new(&s, IngestConfig::default());

  // Courses before demographics: the precondition fails, nothing is
  // created — not even dimension rows for the skipped enrollment.
  let premature = loader.ingest_courses_taken(&courses).await.unwrap();
  assert_eq!(premature.precondition_skips, 1);
  assert_eq!(s.count_facts(FactKind::EnrollmentEvent).await.unwrap(), 0);
  assert_eq!(s.count_facts(FactKind::Course).await.unwrap(), 0);
  assert_eq!(s.count_dimension(DimensionKind::PersonId).await.unwrap(), 0);
  assert_eq!(s.count_dimension(DimensionKind::VerifiedGrade).await.unwrap(), 0);

  // Demographics, then the same courses file again: exactly one event.
  loader.ingest_demographics(&demographics).await.unwrap();
  let retried = loader.ingest_courses_taken(&courses).await.unwrap();
  assert_eq!(retried.created, 1);
  assert_eq!(s.count_facts(FactKind::EnrollmentEvent).await.unwrap(), 1);
}

#[tokio::test]
async fn record_found_n_never_creates_a_transfer() {
  let dir = tempfile::tempdir().unwrap();
  write_csv(
    dir.path(),
    "nsc_transfer.csv",
    TRANSFERS_HEADER,
    &["P1,Ferris State,20240108,20240503,N,N"],
  );

  let s = store().await;
  let loader = Loader::new(&s, IngestConfig::default());
  let summary = loader.run(dir.path()).await.unwrap();

  assert_eq!(summary.totals().precondition_skips, 1);
  assert_eq!(s.count_facts(FactKind::TransferEvent).await.unwrap(), 0);
  // No partial state either.
  assert_eq!(s.count_dimension(DimensionKind::PersonId).await.unwrap(), 0);
  assert_eq!(s.count_dimension(DimensionKind::CollegeName).await.unwrap(), 0);
}

#[tokio::test]
async fn graduation_rows_and_home_institution_rows_are_skipped() {
  let dir = tempfile::tempdir().unwrap();
  write_csv(
    dir.path(),
    "nsc_transfer.csv",
    TRANSFERS_HEADER,
    &[
      "P1,Ferris State,20240108,20240503,Y,Y",
      "P1,Jackson College,20240108,20240503,Y,N",
      "P1,Ferris State,20240108,20240503,Y,N",
    ],
  );

  let s = store().await;
  let loader = Loader::new(&s, IngestConfig::default());
  let summary = loader.run(dir.path()).await.unwrap();

  assert_eq!(summary.totals().precondition_skips, 2);
  assert_eq!(summary.totals().created, 1);
  assert_eq!(s.count_facts(FactKind::TransferEvent).await.unwrap(), 1);
}

#[tokio::test]
async fn home_institution_is_configurable() {
  let dir = tempfile::tempdir().unwrap();
  write_csv(
    dir.path(),
    "nsc_transfer.csv",
    TRANSFERS_HEADER,
    &["P1,Jackson College,20240108,20240503,Y,N"],
  );

  let s = store().await;
  let config = IngestConfig { home_institution: "Somewhere Else".into() };
  let loader = Loader::new(&s, config);
  loader.run(dir.path()).await.unwrap();

  // "Jackson College" is external relative to the configured home.
  assert_eq!(s.count_facts(FactKind::TransferEvent).await.unwrap(), 1);
}

// ─── Row-level robustness ────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_row_aborts_that_row_only() {
  let dir = tempfile::tempdir().unwrap();
  let bad_birth_date = demo_row("P2", "Fall 2024", "E1")
    .replace("01/15/2002 0:00", "not-a-date");
  write_csv(
    dir.path(),
    "fall_demographics.csv",
    DEMOGRAPHICS_HEADER,
    &[
      &demo_row("P1", "Fall 2024", "E1"),
      &bad_birth_date,
      &demo_row("P3", "Fall 2024", "E1"),
    ],
  );

  let s = store().await;
  let loader = Loader::new(&s, IngestConfig::default());
  let summary = loader.run(dir.path()).await.unwrap();

  assert_eq!(summary.totals().rows, 3);
  assert_eq!(summary.totals().created, 2);
  assert_eq!(summary.totals().malformed, 1);
  assert_eq!(s.count_facts(FactKind::DemographicEntry).await.unwrap(), 2);
}

#[tokio::test]
async fn dimension_rows_match_distinct_values_seen() {
  let dir = tempfile::tempdir().unwrap();
  write_csv(
    dir.path(),
    "fall_demographics.csv",
    DEMOGRAPHICS_HEADER,
    &[
      &demo_row("P1", "Fall 2024", "E1"),
      &demo_row("P2", "Fall 2024", "E1"),
      &demo_row("P2", "Winter 2025", "E2"),
    ],
  );

  let s = store().await;
  let loader = Loader::new(&s, IngestConfig::default());
  loader.run(dir.path()).await.unwrap();

  assert_eq!(s.count_dimension(DimensionKind::PersonId).await.unwrap(), 2);
  assert_eq!(s.count_dimension(DimensionKind::Term).await.unwrap(), 2);
  assert_eq!(s.count_dimension(DimensionKind::Extract).await.unwrap(), 2);
  // One gender value shared by every row.
  assert_eq!(s.count_dimension(DimensionKind::Gender).await.unwrap(), 1);
  assert_eq!(s.count_facts(FactKind::DemographicEntry).await.unwrap(), 3);
}
