//! SQL schema for the Cohort SQLite store.
//!
//! Executed once at connection startup. All statements are idempotent
//! (`CREATE TABLE IF NOT EXISTS`); tables are never dropped here. Future
//! migrations will be gated on `PRAGMA user_version`.

use std::fmt::Write as _;

use cohort_core::dimension::DimensionKind;

/// Fact-table DDL. Dimension tables are generated from
/// [`DimensionKind::ALL`] since they all share one shape.
///
/// Natural keys are backed by UNIQUE constraints, so the store-level
/// existence checks and the schema enforce the same invariant.
const FACT_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS demographic_entries (
    id              INTEGER PRIMARY KEY,
    person_id       INTEGER NOT NULL REFERENCES person_id(id),
    person_alt_id   INTEGER NOT NULL REFERENCES person_alt_id(id),
    birth_date      TEXT NOT NULL,
    hs_grad_date    TEXT NOT NULL,
    zip_id          INTEGER NOT NULL REFERENCES zip_code(id),
    student_type_id INTEGER NOT NULL REFERENCES student_type(id),
    gender_id       INTEGER NOT NULL REFERENCES gender(id),
    race_id         INTEGER NOT NULL REFERENCES race(id),
    ethnicity_id    INTEGER NOT NULL REFERENCES ethnicity(id),
    extract_id      INTEGER NOT NULL REFERENCES extract_label(id),
    term_id         INTEGER NOT NULL REFERENCES enrollment_term(id),
    UNIQUE (person_id, term_id, extract_id)
);

CREATE TABLE IF NOT EXISTS courses (
    id             INTEGER PRIMARY KEY,
    name           TEXT NOT NULL UNIQUE,
    section_credit REAL NOT NULL,
    billing_credit REAL NOT NULL,
    subject_id     INTEGER NOT NULL REFERENCES course_subject(id)
);

CREATE TABLE IF NOT EXISTS course_instances (
    id             INTEGER PRIMARY KEY,
    term_id        INTEGER NOT NULL REFERENCES enrollment_term(id),
    course_type_id INTEGER NOT NULL REFERENCES course_type(id),
    full_name_id   INTEGER NOT NULL REFERENCES course_full_name(id),
    start_date     TEXT NOT NULL,
    course_id      INTEGER NOT NULL REFERENCES courses(id),
    UNIQUE (term_id, course_type_id, full_name_id, start_date, course_id)
);

CREATE TABLE IF NOT EXISTS enrollment_events (
    id                   INTEGER PRIMARY KEY,
    person_id            INTEGER NOT NULL REFERENCES person_id(id),
    grade_id             INTEGER NOT NULL REFERENCES verified_grade(id),
    status_id            INTEGER NOT NULL REFERENCES enrollment_status(id),
    credit_type_id       INTEGER NOT NULL REFERENCES credit_type(id),
    extract_id           INTEGER NOT NULL REFERENCES extract_label(id),
    course_instance_id   INTEGER NOT NULL REFERENCES course_instances(id),
    demographic_entry_id INTEGER NOT NULL REFERENCES demographic_entries(id),
    UNIQUE (person_id, grade_id, status_id, credit_type_id, extract_id,
            course_instance_id, demographic_entry_id)
);

CREATE TABLE IF NOT EXISTS transfer_events (
    id         INTEGER PRIMARY KEY,
    person_id  INTEGER NOT NULL REFERENCES person_id(id),
    college_id INTEGER NOT NULL REFERENCES college_name(id),
    begin_date TEXT NOT NULL,
    end_date   TEXT NOT NULL,
    UNIQUE (person_id, college_id, begin_date, end_date)
);

CREATE INDEX IF NOT EXISTS demographic_entries_person_idx
    ON demographic_entries(person_id);
CREATE INDEX IF NOT EXISTS enrollment_events_person_idx
    ON enrollment_events(person_id);

PRAGMA user_version = 1;
";

/// Assemble the full DDL batch: pragmas, the sixteen dimension tables, then
/// the fact tables.
pub fn schema() -> String {
  let mut ddl = String::from(
    "PRAGMA journal_mode = WAL;\nPRAGMA foreign_keys = ON;\n\n",
  );

  for kind in DimensionKind::ALL {
    // Writing to a String cannot fail.
    let _ = writeln!(
      ddl,
      "CREATE TABLE IF NOT EXISTS {} (\n    \
       id    INTEGER PRIMARY KEY,\n    \
       value TEXT NOT NULL UNIQUE\n);",
      kind.table()
    );
  }

  ddl.push_str(FACT_SCHEMA);
  ddl
}
