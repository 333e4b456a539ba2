//! Row shapes for the three extract categories.
//!
//! Field names mirror the column labels the source system writes into its
//! extract headers; the header row drives the mapping and unrecognised
//! columns are ignored. All values arrive as text — normalization into
//! dates and numbers happens in the pipeline, not here.

use serde::Deserialize;

/// One row of a demographics extract.
#[derive(Debug, Clone, Deserialize)]
pub struct DemographicRow {
  #[serde(rename = "Person ID")]
  pub person:       String,
  #[serde(rename = "Person UIC ID (J10)")]
  pub person_alt:   String,
  #[serde(rename = "Person Birth Date")]
  pub birth_date:   String,
  #[serde(rename = "HS Grad Date")]
  pub hs_grad_date: String,
  #[serde(rename = "Person Address Zip")]
  pub zip:          String,
  #[serde(rename = "Student Current Type")]
  pub student_type: String,
  #[serde(rename = "Person Gender")]
  pub gender:       String,
  #[serde(rename = "Person Race 1")]
  pub race:         String,
  #[serde(rename = "Person Ethnic 1")]
  pub ethnicity:    String,
  #[serde(rename = "Frozen File Extract")]
  pub extract:      String,
  #[serde(rename = "Enrollment Term")]
  pub term:         String,
}

/// One row of a courses-taken extract.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseRow {
  #[serde(rename = "Person ID")]
  pub person:         String,
  #[serde(rename = "Enrolled Verified Grade (J10)")]
  pub grade:          String,
  #[serde(rename = "Enrollment Current Status")]
  pub status:         String,
  #[serde(rename = "Enrolled Course Credit Type")]
  pub credit_type:    String,
  #[serde(rename = "Frozen File Extract")]
  pub extract:        String,
  #[serde(rename = "Enrollment Term")]
  pub term:           String,
  #[serde(rename = "Enrollment Course Current Type (J10)")]
  pub course_type:    String,
  #[serde(rename = "Enrolled Course Full Name (J10)")]
  pub full_name:      String,
  #[serde(rename = "Enrolled Course Name")]
  pub course_name:    String,
  #[serde(rename = "Enrolled Course Subject")]
  pub subject:        String,
  #[serde(rename = "Section Credit Value (J10)")]
  pub section_credit: String,
  #[serde(rename = "Billing Cred (J10)")]
  pub billing_credit: String,
  #[serde(rename = "Enrollment Term Start Date")]
  pub term_start:     String,
}

/// One row of a clearinghouse transfer extract.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRow {
  #[serde(rename = "Person ID")]
  pub person:       String,
  #[serde(rename = "College Name")]
  pub college:      String,
  #[serde(rename = "Enrollment Begin")]
  pub begin:        String,
  #[serde(rename = "Enrollment End")]
  pub end:          String,
  #[serde(rename = "Record Found Y/N")]
  pub record_found: String,
  #[serde(rename = "Graduated?")]
  pub graduated:    String,
}
