//! Shared utilities.
//!
//! Commit identifier helpers and test fixtures used across the crate.

pub mod commit;
