//! Core domain logic for the three-team approval workflow.
//! This crate is the single source of truth for approval invariants.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use engine::{aggregate, apply_decision, parse_decision, parse_team};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::submission::{
    ApprovalStatus, OverallStatus, ParseError, Submission, SubmissionId,
    SubmissionValidationError, Team, SUGGESTED_PURPOSES,
};
pub use repo::submission_repo::{
    RepoError, RepoResult, SqliteSubmissionRepository, StatusCounts, SubmissionRepository,
};
pub use service::approval_service::{
    ApprovalService, DashboardSummary, ServiceError, ServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
