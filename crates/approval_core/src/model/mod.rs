//! Domain model for the three-team approval workflow.
//!
//! # Responsibility
//! - Define canonical data structures used by the store and the engine.
//! - Represent team and status values as closed enumerations.
//!
//! # Invariants
//! - Every submission is identified by a stable `SubmissionId`.
//! - `overall_status` is derived, never assigned by callers.
//!
//! # See also
//! - crate::engine

pub mod submission;
