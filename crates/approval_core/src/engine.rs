//! Approval engine: team decisions and status aggregation.
//!
//! # Responsibility
//! - Derive the overall status from the three team approvals.
//! - Apply one team decision to a submission in memory.
//! - Parse team/decision strings at caller boundaries.
//!
//! # Invariants
//! - `aggregate` is total and independent of argument order.
//! - Any `Rejected` team approval yields `OverallStatus::Rejected`.
//! - Team fields are freely re-assignable; `overall_status` is recomputed
//!   after every assignment.

use crate::model::submission::{ApprovalStatus, OverallStatus, ParseError, Submission, Team};

/// Derives the overall status from the three team approvals.
pub fn aggregate(
    data: ApprovalStatus,
    security: ApprovalStatus,
    legal: ApprovalStatus,
) -> OverallStatus {
    let approvals = [data, security, legal];
    if approvals.contains(&ApprovalStatus::Rejected) {
        OverallStatus::Rejected
    } else if approvals
        .iter()
        .all(|approval| *approval == ApprovalStatus::Approved)
    {
        OverallStatus::FullyApproved
    } else {
        OverallStatus::Pending
    }
}

/// Sets `team`'s approval to `decision` and recomputes the overall status.
///
/// Returns the new overall status.
pub fn apply_decision(
    submission: &mut Submission,
    team: Team,
    decision: ApprovalStatus,
) -> OverallStatus {
    *submission.approval_mut(team) = decision;
    submission.overall_status = aggregate(
        submission.data_approval,
        submission.security_approval,
        submission.legal_approval,
    );
    submission.overall_status
}

/// Parses a team name such as `Data` or `security`.
pub fn parse_team(value: &str) -> Result<Team, ParseError> {
    value.parse()
}

/// Parses a decision such as `Approved` or `rejected`.
pub fn parse_decision(value: &str) -> Result<ApprovalStatus, ParseError> {
    value.parse()
}
