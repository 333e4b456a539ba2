//! Core types and trait definitions for the Cohort warehouse.
//!
//! This crate is deliberately free of database and CLI dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod dimension;
pub mod error;
pub mod fact;
pub mod field;
pub mod store;

pub use error::{Error, Result};
