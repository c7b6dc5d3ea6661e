//! Test support utilities.
//!
//! Mock implementations of the crate's trait seams so planner, executor,
//! judge, and service tests run without network access.

pub mod mocks;
