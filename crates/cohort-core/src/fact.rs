//! Fact kinds — the composite records of the star schema.
//!
//! Each fact references one or more dimension ids plus scalar attributes and
//! is uniquely identified by its natural key: an ordered tuple of foreign
//! references (and, for course instances and transfers, scalar dates).
//! Insertion is existence-checked on that key; a repeat is skipped, never
//! updated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dimension::DimensionId;

/// Surrogate identity of a fact row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct FactId(pub i64);

/// The closed set of fact tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
  DemographicEntry,
  Course,
  CourseInstance,
  EnrollmentEvent,
  TransferEvent,
}

impl FactKind {
  pub const ALL: [FactKind; 5] = [
    Self::DemographicEntry,
    Self::Course,
    Self::CourseInstance,
    Self::EnrollmentEvent,
    Self::TransferEvent,
  ];

  pub fn table(self) -> &'static str {
    match self {
      Self::DemographicEntry => "demographic_entries",
      Self::Course => "courses",
      Self::CourseInstance => "course_instances",
      Self::EnrollmentEvent => "enrollment_events",
      Self::TransferEvent => "transfer_events",
    }
  }
}

// ─── Upsert outcome ──────────────────────────────────────────────────────────

/// Outcome of an existence-checked fact insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
  /// No row with this natural key existed; one was inserted.
  Created(FactId),
  /// A row with this natural key already existed; nothing was written.
  Existing(FactId),
}

impl Upsert {
  pub fn id(self) -> FactId {
    match self {
      Self::Created(id) | Self::Existing(id) => id,
    }
  }

  pub fn is_created(self) -> bool { matches!(self, Self::Created(_)) }
}

// ─── Demographic Entry ───────────────────────────────────────────────────────

/// Natural key of a Demographic Entry: one snapshot of one person in one
/// term, from one extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DemographicKey {
  pub person:  DimensionId,
  pub term:    DimensionId,
  pub extract: DimensionId,
}

/// Insert payload for a Demographic Entry.
#[derive(Debug, Clone)]
pub struct NewDemographicEntry {
  pub key:          DemographicKey,
  pub person_alt:   DimensionId,
  pub birth_date:   NaiveDate,
  pub hs_grad_date: NaiveDate,
  pub zip:          DimensionId,
  pub student_type: DimensionId,
  pub gender:       DimensionId,
  pub race:         DimensionId,
  pub ethnicity:    DimensionId,
}

// ─── Course ──────────────────────────────────────────────────────────────────

/// Insert payload for a Course. The natural key is `name`; credit metadata
/// is captured at first sight and never touched on repeats.
#[derive(Debug, Clone)]
pub struct NewCourse {
  pub name:           String,
  pub section_credit: f64,
  pub billing_credit: f64,
  pub subject:        DimensionId,
}

/// A Course as stored, read back for metadata inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRow {
  pub id:             FactId,
  pub name:           String,
  pub section_credit: f64,
  pub billing_credit: f64,
  pub subject:        DimensionId,
}

// ─── Course Instance ─────────────────────────────────────────────────────────

/// Natural key — and full payload — of a Course Instance: one offering of a
/// course in a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CourseInstanceKey {
  pub term:        DimensionId,
  pub course_type: DimensionId,
  pub full_name:   DimensionId,
  pub start_date:  NaiveDate,
  pub course:      FactId,
}

// ─── Enrollment Event ────────────────────────────────────────────────────────

/// Natural key — and full payload — of an Enrollment Event.
///
/// The key is the entire foreign-reference tuple; there is no deduplicating
/// scalar beyond it. Two source rows that agree on every reference are
/// indistinguishable, and the second is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnrollmentKey {
  pub person:          DimensionId,
  pub grade:           DimensionId,
  pub status:          DimensionId,
  pub credit_type:     DimensionId,
  pub extract:         DimensionId,
  pub course_instance: FactId,
  pub demographic:     FactId,
}

// ─── Other-Institution Enrollment Event ──────────────────────────────────────

/// Natural key — and full payload — of an enrollment spell at another
/// institution, taken from a clearinghouse transfer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferKey {
  pub person:  DimensionId,
  pub college: DimensionId,
  pub begin:   NaiveDate,
  pub end:     NaiveDate,
}
