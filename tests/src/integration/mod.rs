//! # Integration Tests
//!
//! Drive [`pg_admission::AdmissionController`] through its public API.

pub mod boundary_scenarios;
pub mod concurrency;
pub mod properties;
pub mod rollback;
