//! [`SqliteStore`] — the SQLite implementation of [`WarehouseStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use cohort_core::{
  dimension::{DimensionId, DimensionKind},
  fact::{
    CourseInstanceKey, CourseRow, DemographicKey, EnrollmentKey, FactId,
    FactKind, NewCourse, NewDemographicEntry, TransferKey, Upsert,
  },
  store::WarehouseStore,
};

use crate::{Error, Result, encode::encode_date, schema::schema};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cohort warehouse backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and all
/// calls are serialized onto one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a warehouse at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory warehouse — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(&schema())?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── WarehouseStore impl ─────────────────────────────────────────────────────

impl WarehouseStore for SqliteStore {
  type Error = Error;

  // ── Dimensions ────────────────────────────────────────────────────────────

  async fn resolve_dimension(
    &self,
    kind: DimensionKind,
    value: &str,
  ) -> Result<DimensionId> {
    let value = value.to_owned();

    // SELECT-then-INSERT inside one closure: the connection thread runs it
    // without interleaving, so the value cannot be inserted twice.
    let id: i64 = self
      .conn
      .call(move |conn| {
        let table = kind.table();
        let existing: Option<i64> = conn
          .query_row(
            &format!("SELECT id FROM {table} WHERE value = ?1"),
            rusqlite::params![value],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          return Ok(id);
        }

        conn.execute(
          &format!("INSERT INTO {table} (value) VALUES (?1)"),
          rusqlite::params![value],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(DimensionId(id))
  }

  async fn find_dimension(
    &self,
    kind: DimensionKind,
    value: &str,
  ) -> Result<Option<DimensionId>> {
    let value = value.to_owned();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT id FROM {} WHERE value = ?1", kind.table()),
              rusqlite::params![value],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(id.map(DimensionId))
  }

  // ── Facts ─────────────────────────────────────────────────────────────────

  async fn find_demographic_entry(
    &self,
    key: DemographicKey,
  ) -> Result<Option<FactId>> {
    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id FROM demographic_entries
               WHERE person_id = ?1 AND term_id = ?2 AND extract_id = ?3",
              rusqlite::params![key.person.0, key.term.0, key.extract.0],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(id.map(FactId))
  }

  async fn upsert_demographic_entry(
    &self,
    entry: NewDemographicEntry,
  ) -> Result<Upsert> {
    let birth_date = encode_date(entry.birth_date);
    let hs_grad_date = encode_date(entry.hs_grad_date);

    let outcome = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM demographic_entries
             WHERE person_id = ?1 AND term_id = ?2 AND extract_id = ?3",
            rusqlite::params![
              entry.key.person.0,
              entry.key.term.0,
              entry.key.extract.0
            ],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          return Ok(Upsert::Existing(FactId(id)));
        }

        conn.execute(
          "INSERT INTO demographic_entries (
             person_id, person_alt_id, birth_date, hs_grad_date, zip_id,
             student_type_id, gender_id, race_id, ethnicity_id,
             extract_id, term_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            entry.key.person.0,
            entry.person_alt.0,
            birth_date,
            hs_grad_date,
            entry.zip.0,
            entry.student_type.0,
            entry.gender.0,
            entry.race.0,
            entry.ethnicity.0,
            entry.key.extract.0,
            entry.key.term.0,
          ],
        )?;
        Ok(Upsert::Created(FactId(conn.last_insert_rowid())))
      })
      .await?;

    Ok(outcome)
  }

  async fn upsert_course(&self, course: NewCourse) -> Result<Upsert> {
    let outcome = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM courses WHERE name = ?1",
            rusqlite::params![course.name],
            |row| row.get(0),
          )
          .optional()?;

        // Metadata is frozen at first sight; a repeat never updates it.
        if let Some(id) = existing {
          return Ok(Upsert::Existing(FactId(id)));
        }

        conn.execute(
          "INSERT INTO courses (name, section_credit, billing_credit, subject_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            course.name,
            course.section_credit,
            course.billing_credit,
            course.subject.0,
          ],
        )?;
        Ok(Upsert::Created(FactId(conn.last_insert_rowid())))
      })
      .await?;

    Ok(outcome)
  }

  async fn find_course(&self, name: &str) -> Result<Option<CourseRow>> {
    let name = name.to_owned();

    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, section_credit, billing_credit, subject_id
               FROM courses WHERE name = ?1",
              rusqlite::params![name],
              |row| {
                Ok(CourseRow {
                  id:             FactId(row.get(0)?),
                  name:           row.get(1)?,
                  section_credit: row.get(2)?,
                  billing_credit: row.get(3)?,
                  subject:        DimensionId(row.get(4)?),
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(row)
  }

  async fn upsert_course_instance(
    &self,
    key: CourseInstanceKey,
  ) -> Result<Upsert> {
    let start_date = encode_date(key.start_date);

    let outcome = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM course_instances
             WHERE term_id = ?1 AND course_type_id = ?2 AND full_name_id = ?3
               AND start_date = ?4 AND course_id = ?5",
            rusqlite::params![
              key.term.0,
              key.course_type.0,
              key.full_name.0,
              start_date,
              key.course.0,
            ],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          return Ok(Upsert::Existing(FactId(id)));
        }

        conn.execute(
          "INSERT INTO course_instances
             (term_id, course_type_id, full_name_id, start_date, course_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            key.term.0,
            key.course_type.0,
            key.full_name.0,
            start_date,
            key.course.0,
          ],
        )?;
        Ok(Upsert::Created(FactId(conn.last_insert_rowid())))
      })
      .await?;

    Ok(outcome)
  }

  async fn upsert_enrollment_event(
    &self,
    key: EnrollmentKey,
  ) -> Result<Upsert> {
    let outcome = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM enrollment_events
             WHERE person_id = ?1 AND grade_id = ?2 AND status_id = ?3
               AND credit_type_id = ?4 AND extract_id = ?5
               AND course_instance_id = ?6 AND demographic_entry_id = ?7",
            rusqlite::params![
              key.person.0,
              key.grade.0,
              key.status.0,
              key.credit_type.0,
              key.extract.0,
              key.course_instance.0,
              key.demographic.0,
            ],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          return Ok(Upsert::Existing(FactId(id)));
        }

        conn.execute(
          "INSERT INTO enrollment_events
             (person_id, grade_id, status_id, credit_type_id, extract_id,
              course_instance_id, demographic_entry_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            key.person.0,
            key.grade.0,
            key.status.0,
            key.credit_type.0,
            key.extract.0,
            key.course_instance.0,
            key.demographic.0,
          ],
        )?;
        Ok(Upsert::Created(FactId(conn.last_insert_rowid())))
      })
      .await?;

    Ok(outcome)
  }

  async fn upsert_transfer_event(&self, key: TransferKey) -> Result<Upsert> {
    let begin = encode_date(key.begin);
    let end = encode_date(key.end);

    let outcome = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM transfer_events
             WHERE person_id = ?1 AND college_id = ?2
               AND begin_date = ?3 AND end_date = ?4",
            rusqlite::params![key.person.0, key.college.0, begin, end],
            |row| row.get(0),
          )
          .optional()?;

        if let Some(id) = existing {
          return Ok(Upsert::Existing(FactId(id)));
        }

        conn.execute(
          "INSERT INTO transfer_events (person_id, college_id, begin_date, end_date)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![key.person.0, key.college.0, begin, end],
        )?;
        Ok(Upsert::Created(FactId(conn.last_insert_rowid())))
      })
      .await?;

    Ok(outcome)
  }

  // ── Counts ────────────────────────────────────────────────────────────────

  async fn count_dimension(&self, kind: DimensionKind) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!("SELECT COUNT(*) FROM {}", kind.table()),
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn count_facts(&self, kind: FactKind) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!("SELECT COUNT(*) FROM {}", kind.table()),
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }
}
