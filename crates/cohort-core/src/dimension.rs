//! Dimension kinds — the lookup tables of the star schema.
//!
//! A dimension maps one distinct text value to a stable surrogate id. Rows
//! are created lazily on first sight across any input row, and are never
//! updated or deleted; the id assigned at first insertion is immutable.

use serde::{Deserialize, Serialize};

/// Surrogate identity of a dimension row.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct DimensionId(pub i64);

/// The closed set of dimension tables.
///
/// One variant per single-value table; adding a kind here is the only step
/// needed to grow the schema, since resolution and DDL are derived from the
/// variant.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
  /// Institution-local student identifier.
  PersonId,
  /// Secondary (statewide) student identifier.
  PersonAltId,
  CreditType,
  VerifiedGrade,
  EnrollmentStatus,
  /// Label of the frozen-file extract a row arrived in.
  Extract,
  CourseSubject,
  Term,
  CourseType,
  CourseFullName,
  StudentType,
  Gender,
  Race,
  Ethnicity,
  Zip,
  CollegeName,
}

impl DimensionKind {
  pub const ALL: [DimensionKind; 16] = [
    Self::PersonId,
    Self::PersonAltId,
    Self::CreditType,
    Self::VerifiedGrade,
    Self::EnrollmentStatus,
    Self::Extract,
    Self::CourseSubject,
    Self::Term,
    Self::CourseType,
    Self::CourseFullName,
    Self::StudentType,
    Self::Gender,
    Self::Race,
    Self::Ethnicity,
    Self::Zip,
    Self::CollegeName,
  ];

  /// The dimension's table name. Every dimension table has the same shape:
  /// `id INTEGER PRIMARY KEY, value TEXT NOT NULL UNIQUE`.
  pub fn table(self) -> &'static str {
    match self {
      Self::PersonId => "person_id",
      Self::PersonAltId => "person_alt_id",
      Self::CreditType => "credit_type",
      Self::VerifiedGrade => "verified_grade",
      Self::EnrollmentStatus => "enrollment_status",
      Self::Extract => "extract_label",
      Self::CourseSubject => "course_subject",
      Self::Term => "enrollment_term",
      Self::CourseType => "course_type",
      Self::CourseFullName => "course_full_name",
      Self::StudentType => "student_type",
      Self::Gender => "gender",
      Self::Race => "race",
      Self::Ethnicity => "ethnicity",
      Self::Zip => "zip_code",
      Self::CollegeName => "college_name",
    }
  }
}
