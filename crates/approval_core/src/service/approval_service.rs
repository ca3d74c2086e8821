//! Approval workflow use-case service.
//!
//! # Responsibility
//! - Provide submit/review/dashboard entry points for presentation callers.
//! - Reject empty required fields and unknown team/decision names.
//! - Delegate persistence to `SubmissionRepository` implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::engine::{parse_decision, parse_team};
use crate::model::submission::{ApprovalStatus, ParseError, Submission, SubmissionId, Team};
use crate::repo::submission_repo::{RepoError, SubmissionRepository};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for approval workflow use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Required submission field is empty or whitespace-only.
    MissingField(&'static str),
    /// Team or decision name is not recognized.
    InvalidArgument(ParseError),
    SubmissionNotFound(SubmissionId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::InvalidArgument(err) => write!(f, "invalid argument: {err}"),
            Self::SubmissionNotFound(id) => write!(f, "submission not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::SubmissionNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ParseError> for ServiceError {
    fn from(value: ParseError) -> Self {
        Self::InvalidArgument(value)
    }
}

/// Dashboard metrics across all stored submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total: u64,
    pub pending: u64,
    pub fully_approved: u64,
    pub rejected: u64,
}

impl DashboardSummary {
    /// Share of fully approved submissions, in percent.
    ///
    /// Returns `None` when there are no submissions.
    pub fn approval_rate_percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.fully_approved as f64 / self.total as f64 * 100.0)
    }
}

/// Use-case facade over a submission store.
pub struct ApprovalService<R: SubmissionRepository> {
    repo: R,
}

impl<R: SubmissionRepository> ApprovalService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Submits a new request for review by all three teams.
    ///
    /// # Errors
    /// - `MissingField` when `name`, `description` or `purpose` is blank.
    pub fn submit(&self, name: &str, description: &str, purpose: &str) -> ServiceResult<Submission> {
        for (field, value) in [
            ("name", name),
            ("description", description),
            ("purpose", purpose),
        ] {
            if value.trim().is_empty() {
                warn!("event=submission_create module=service status=rejected missing_field={field}");
                return Err(ServiceError::MissingField(field));
            }
        }

        Ok(self.repo.create(name, description, purpose)?)
    }

    /// Lists every submission, newest first.
    pub fn list_all(&self) -> ServiceResult<Vec<Submission>> {
        Ok(self.repo.list_all()?)
    }

    /// Gets one submission by id.
    pub fn get(&self, id: SubmissionId) -> ServiceResult<Submission> {
        self.repo
            .get(id)?
            .ok_or(ServiceError::SubmissionNotFound(id))
    }

    /// Lists submissions still awaiting `team`'s decision.
    pub fn pending_for_team(&self, team: Team) -> ServiceResult<Vec<Submission>> {
        Ok(self.repo.list_pending_for_team(team)?)
    }

    /// Records one team's decision and returns the updated submission.
    pub fn record_decision(
        &self,
        id: SubmissionId,
        team: Team,
        decision: ApprovalStatus,
    ) -> ServiceResult<Submission> {
        Ok(self.repo.update_team_approval(id, team, decision)?)
    }

    /// Parses `team`/`decision` names, then records the decision.
    ///
    /// # Errors
    /// - `InvalidArgument` for unrecognized names; the store is not touched.
    pub fn record_decision_by_name(
        &self,
        id: SubmissionId,
        team: &str,
        decision: &str,
    ) -> ServiceResult<Submission> {
        let team = parse_team(team)?;
        let decision = parse_decision(decision)?;
        self.record_decision(id, team, decision)
    }

    /// Deletes every submission and returns how many were removed.
    pub fn clear_all(&self) -> ServiceResult<usize> {
        Ok(self.repo.clear_all()?)
    }

    /// Computes dashboard metrics.
    pub fn summary(&self) -> ServiceResult<DashboardSummary> {
        let counts = self.repo.overall_status_counts()?;
        Ok(DashboardSummary {
            total: counts.total(),
            pending: counts.pending,
            fully_approved: counts.fully_approved,
            rejected: counts.rejected,
        })
    }
}
