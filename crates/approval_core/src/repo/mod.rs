//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for submissions.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes and reads enforce `Submission::validate()`.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod submission_repo;
