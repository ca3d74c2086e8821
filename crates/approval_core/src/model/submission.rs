//! Submission domain model.
//!
//! # Responsibility
//! - Define the submission record and its team/status enumerations.
//! - Provide boundary parsing from human or storage spellings.
//!
//! # Invariants
//! - `id` is stable and never reused for another submission.
//! - `overall_status` equals `aggregate(data, security, legal)` for every
//!   record that passes `validate()`.

use crate::engine::aggregate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of one submission.
pub type SubmissionId = Uuid;

/// Purpose categories offered by the request form.
///
/// `purpose` itself stays free text; this list only seeds UI choices.
pub const SUGGESTED_PURPOSES: &[&str] = &[
    "Data Access",
    "System Integration",
    "Process Change",
    "Security Update",
    "Legal Review",
    "Other",
];

const SHORT_ID_CHARS: usize = 8;

/// Review team owning one approval field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Data,
    Security,
    Legal,
}

impl Team {
    /// All teams in canonical order.
    pub const ALL: [Team; 3] = [Team::Data, Team::Security, Team::Legal];

    /// Stable storage token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Security => "security",
            Self::Legal => "legal",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Data => "Data",
            Self::Security => "Security",
            Self::Legal => "Legal",
        }
    }

    /// Column holding this team's approval in the `submissions` table.
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Data => "data_approval",
            Self::Security => "security_approval",
            Self::Legal => "legal_approval",
        }
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Team {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "data" => Ok(Self::Data),
            "security" => Ok(Self::Security),
            "legal" => Ok(Self::Legal),
            _ => Err(ParseError::UnknownTeam(value.to_string())),
        }
    }
}

/// One team's verdict on a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// No verdict yet.
    Pending,
    /// Team signed off.
    Approved,
    /// Team refused; forces the overall status to `Rejected`.
    Rejected,
}

impl ApprovalStatus {
    /// Stable storage token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl Display for ApprovalStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ApprovalStatus {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseError::UnknownApprovalStatus(value.to_string())),
        }
    }
}

/// Derived workflow status across all three teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// At least one team has not decided and nobody rejected.
    Pending,
    /// Every team approved.
    FullyApproved,
    /// At least one team rejected.
    Rejected,
}

impl OverallStatus {
    /// Stable storage token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::FullyApproved => "fully_approved",
            Self::Rejected => "rejected",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::FullyApproved => "Fully Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl Display for OverallStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OverallStatus {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "fully_approved" | "fully approved" => Ok(Self::FullyApproved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseError::UnknownOverallStatus(value.to_string())),
        }
    }
}

/// Unknown team or status spelling at a parsing boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownTeam(String),
    UnknownApprovalStatus(String),
    UnknownOverallStatus(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTeam(value) => {
                write!(f, "unknown team `{value}`; expected Data|Security|Legal")
            }
            Self::UnknownApprovalStatus(value) => write!(
                f,
                "unknown approval status `{value}`; expected Pending|Approved|Rejected"
            ),
            Self::UnknownOverallStatus(value) => write!(
                f,
                "unknown overall status `{value}`; expected Pending|Fully Approved|Rejected"
            ),
        }
    }
}

impl Error for ParseError {}

/// Submission invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionValidationError {
    NilId,
    StaleOverallStatus {
        stored: OverallStatus,
        expected: OverallStatus,
    },
}

impl Display for SubmissionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "submission id must not be nil"),
            Self::StaleOverallStatus { stored, expected } => write!(
                f,
                "overall status `{}` does not match team approvals (expected `{}`)",
                stored.as_str(),
                expected.as_str()
            ),
        }
    }
}

impl Error for SubmissionValidationError {}

/// One request moving through the approval workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub name: String,
    pub description: String,
    pub purpose: String,
    /// Creation time, Unix epoch milliseconds. Listing sort key.
    pub created_at: i64,
    pub data_approval: ApprovalStatus,
    pub security_approval: ApprovalStatus,
    pub legal_approval: ApprovalStatus,
    /// Derived from the three team fields; see `engine::aggregate`.
    pub overall_status: OverallStatus,
}

impl Submission {
    /// Creates a pending submission with a generated id and current time.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), now_epoch_ms(), name, description, purpose)
    }

    /// Creates a pending submission with caller-provided identity and time.
    ///
    /// Used by import paths and fixtures where identity already exists.
    pub fn with_id(
        id: SubmissionId,
        created_at: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            purpose: purpose.into(),
            created_at,
            data_approval: ApprovalStatus::Pending,
            security_approval: ApprovalStatus::Pending,
            legal_approval: ApprovalStatus::Pending,
            overall_status: OverallStatus::Pending,
        }
    }

    /// Returns the approval field owned by `team`.
    pub fn approval_for(&self, team: Team) -> ApprovalStatus {
        match team {
            Team::Data => self.data_approval,
            Team::Security => self.security_approval,
            Team::Legal => self.legal_approval,
        }
    }

    pub(crate) fn approval_mut(&mut self, team: Team) -> &mut ApprovalStatus {
        match team {
            Team::Data => &mut self.data_approval,
            Team::Security => &mut self.security_approval,
            Team::Legal => &mut self.legal_approval,
        }
    }

    /// Approvals of every team except `team`, in canonical order.
    pub fn other_team_approvals(&self, team: Team) -> Vec<(Team, ApprovalStatus)> {
        Team::ALL
            .into_iter()
            .filter(|other| *other != team)
            .map(|other| (other, self.approval_for(other)))
            .collect()
    }

    /// Leading characters of the id, for compact confirmations.
    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(SHORT_ID_CHARS).collect()
    }

    /// Checks identity and derived-status invariants.
    pub fn validate(&self) -> Result<(), SubmissionValidationError> {
        if self.id.is_nil() {
            return Err(SubmissionValidationError::NilId);
        }

        let expected = aggregate(
            self.data_approval,
            self.security_approval,
            self.legal_approval,
        );
        if self.overall_status != expected {
            return Err(SubmissionValidationError::StaleOverallStatus {
                stored: self.overall_status,
                expected,
            });
        }

        Ok(())
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
