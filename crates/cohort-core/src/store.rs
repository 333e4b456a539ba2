//! The `WarehouseStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `cohort-store-sqlite`). The ingestion driver depends on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  dimension::{DimensionId, DimensionKind},
  fact::{
    CourseInstanceKey, CourseRow, DemographicKey, EnrollmentKey, FactId,
    FactKind, NewCourse, NewDemographicEntry, TransferKey, Upsert,
  },
};

/// Abstraction over a Cohort warehouse backend.
///
/// Dimension rows and fact rows are append-only: nothing here updates or
/// deletes. All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait WarehouseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Dimensions ────────────────────────────────────────────────────────

  /// Get-or-create resolution of one text value within one dimension.
  ///
  /// Idempotent: exactly one row ever exists per distinct value per kind,
  /// and its id never changes once assigned. At most one insertion occurs,
  /// and only on first sight. Blank values resolve like any other value.
  fn resolve_dimension<'a>(
    &'a self,
    kind: DimensionKind,
    value: &'a str,
  ) -> impl Future<Output = Result<DimensionId, Self::Error>> + Send + 'a;

  /// Side-effect-free lookup of a dimension value.
  ///
  /// `None` means genuinely absent; a store failure surfaces as an error
  /// rather than being folded into absence.
  fn find_dimension<'a>(
    &'a self,
    kind: DimensionKind,
    value: &'a str,
  ) -> impl Future<Output = Result<Option<DimensionId>, Self::Error>> + Send + 'a;

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Side-effect-free lookup of a Demographic Entry by natural key. Used as
  /// the existence precondition for enrollment events.
  fn find_demographic_entry(
    &self,
    key: DemographicKey,
  ) -> impl Future<Output = Result<Option<FactId>, Self::Error>> + Send + '_;

  fn upsert_demographic_entry(
    &self,
    entry: NewDemographicEntry,
  ) -> impl Future<Output = Result<Upsert, Self::Error>> + Send + '_;

  /// Insert a course unless one with the same name exists. Credit metadata
  /// is written on first sight only; repeats return `Existing` untouched.
  fn upsert_course(
    &self,
    course: NewCourse,
  ) -> impl Future<Output = Result<Upsert, Self::Error>> + Send + '_;

  /// Read a course back by name, metadata included.
  fn find_course<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<CourseRow>, Self::Error>> + Send + 'a;

  fn upsert_course_instance(
    &self,
    key: CourseInstanceKey,
  ) -> impl Future<Output = Result<Upsert, Self::Error>> + Send + '_;

  fn upsert_enrollment_event(
    &self,
    key: EnrollmentKey,
  ) -> impl Future<Output = Result<Upsert, Self::Error>> + Send + '_;

  fn upsert_transfer_event(
    &self,
    key: TransferKey,
  ) -> impl Future<Output = Result<Upsert, Self::Error>> + Send + '_;

  // ── Counts ────────────────────────────────────────────────────────────

  /// Number of rows in one dimension table. One row per distinct value seen
  /// is the uniqueness invariant callers check against.
  fn count_dimension(
    &self,
    kind: DimensionKind,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Number of rows in one fact table.
  fn count_facts(
    &self,
    kind: FactKind,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
