//! Submission store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/scan/lookup/update/clear APIs over `submissions`.
//! - Apply team decisions through the approval engine before persisting.
//!
//! # Invariants
//! - A team field and `overall_status` are written by one `UPDATE` inside
//!   one IMMEDIATE transaction; readers never see one without the other.
//! - Listings are ordered newest first (`created_at DESC, rowid DESC`).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::engine::apply_decision;
use crate::model::submission::{
    ApprovalStatus, OverallStatus, Submission, SubmissionId, SubmissionValidationError, Team,
};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

const SUBMISSION_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    purpose,
    created_at,
    data_approval,
    security_approval,
    legal_approval,
    overall_status
FROM submissions";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, rowid DESC";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "purpose",
    "created_at",
    "data_approval",
    "security_approval",
    "legal_approval",
    "overall_status",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for submission persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed `Submission::validate()` before a write.
    Validation(SubmissionValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    NotFound(SubmissionId),
    /// Persisted row cannot be converted into a valid submission.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "submission not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted submission data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "submission repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "submission repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "submission repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SubmissionValidationError> for RepoError {
    fn from(value: SubmissionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Number of stored submissions per overall status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u64,
    pub fully_approved: u64,
    pub rejected: u64,
}

impl StatusCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.fully_approved + self.rejected
    }
}

/// Repository interface for the submission store.
pub trait SubmissionRepository {
    /// Inserts a new pending submission and returns the stored record.
    fn create(&self, name: &str, description: &str, purpose: &str) -> RepoResult<Submission>;
    /// Returns every submission, newest first.
    fn list_all(&self) -> RepoResult<Vec<Submission>>;
    /// Loads one submission by id.
    fn get(&self, id: SubmissionId) -> RepoResult<Option<Submission>>;
    /// Returns submissions still awaiting `team`'s decision, newest first.
    fn list_pending_for_team(&self, team: Team) -> RepoResult<Vec<Submission>>;
    /// Records `team`'s decision and recomputes the overall status.
    fn update_team_approval(
        &self,
        id: SubmissionId,
        team: Team,
        decision: ApprovalStatus,
    ) -> RepoResult<Submission>;
    /// Deletes every submission and returns how many were removed.
    fn clear_all(&self) -> RepoResult<usize>;
    /// Counts submissions per overall status.
    fn overall_status_counts(&self) -> RepoResult<StatusCounts>;
}

/// SQLite-backed submission store.
pub struct SqliteSubmissionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubmissionRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_submission_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Inserts an already-built submission, e.g. from an import.
    pub fn insert(&self, submission: &Submission) -> RepoResult<()> {
        submission.validate()?;

        self.conn.execute(
            "INSERT INTO submissions (
                id,
                name,
                description,
                purpose,
                created_at,
                data_approval,
                security_approval,
                legal_approval,
                overall_status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                submission.id.to_string(),
                submission.name.as_str(),
                submission.description.as_str(),
                submission.purpose.as_str(),
                submission.created_at,
                submission.data_approval.as_str(),
                submission.security_approval.as_str(),
                submission.legal_approval.as_str(),
                submission.overall_status.as_str(),
            ],
        )?;

        info!(
            "event=submission_create module=repo status=ok id={}",
            submission.id
        );
        Ok(())
    }

    fn query_submissions(&self, sql: &str) -> RepoResult<Vec<Submission>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut submissions = Vec::new();

        while let Some(row) = rows.next()? {
            submissions.push(parse_submission_row(row)?);
        }

        Ok(submissions)
    }
}

impl SubmissionRepository for SqliteSubmissionRepository<'_> {
    fn create(&self, name: &str, description: &str, purpose: &str) -> RepoResult<Submission> {
        let submission = Submission::new(name, description, purpose);
        self.insert(&submission)?;
        Ok(submission)
    }

    fn list_all(&self) -> RepoResult<Vec<Submission>> {
        self.query_submissions(&format!("{SUBMISSION_SELECT_SQL} {NEWEST_FIRST};"))
    }

    fn get(&self, id: SubmissionId) -> RepoResult<Option<Submission>> {
        get_in(self.conn, id)
    }

    fn list_pending_for_team(&self, team: Team) -> RepoResult<Vec<Submission>> {
        // Column names come from a closed enum, never from caller input.
        self.query_submissions(&format!(
            "{SUBMISSION_SELECT_SQL} WHERE {} = '{}' {NEWEST_FIRST};",
            team.column(),
            ApprovalStatus::Pending.as_str()
        ))
    }

    fn update_team_approval(
        &self,
        id: SubmissionId,
        team: Team,
        decision: ApprovalStatus,
    ) -> RepoResult<Submission> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let Some(mut submission) = get_in(&tx, id)? else {
            warn!(
                "event=team_decision module=repo status=not_found id={id} team={}",
                team.as_str()
            );
            return Err(RepoError::NotFound(id));
        };

        let overall = apply_decision(&mut submission, team, decision);
        submission.validate()?;

        tx.execute(
            &format!(
                "UPDATE submissions
                 SET
                    {} = ?1,
                    overall_status = ?2
                 WHERE id = ?3;",
                team.column()
            ),
            params![decision.as_str(), overall.as_str(), id.to_string()],
        )?;
        tx.commit()?;

        info!(
            "event=team_decision module=repo status=ok id={id} team={} decision={} overall={}",
            team.as_str(),
            decision.as_str(),
            overall.as_str()
        );
        Ok(submission)
    }

    fn clear_all(&self) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM submissions;", [])?;
        info!("event=submission_clear module=repo status=ok removed={removed}");
        Ok(removed)
    }

    fn overall_status_counts(&self) -> RepoResult<StatusCounts> {
        let mut stmt = self.conn.prepare(
            "SELECT overall_status, COUNT(*)
             FROM submissions
             GROUP BY overall_status;",
        )?;
        let mut rows = stmt.query([])?;
        let mut counts = StatusCounts::default();

        while let Some(row) = rows.next()? {
            let status_text: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            let count = u64::try_from(count).map_err(|_| {
                RepoError::InvalidData(format!("negative count `{count}` for `{status_text}`"))
            })?;
            match parse_column::<OverallStatus>(&status_text, "overall_status")? {
                OverallStatus::Pending => counts.pending = count,
                OverallStatus::FullyApproved => counts.fully_approved = count,
                OverallStatus::Rejected => counts.rejected = count,
            }
        }

        Ok(counts)
    }
}

fn get_in(conn: &Connection, id: SubmissionId) -> RepoResult<Option<Submission>> {
    let mut stmt = conn.prepare(&format!("{SUBMISSION_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id.to_string()], |row| Ok(parse_submission_row(row)))
        .optional()?;
    row.transpose()
}

fn parse_submission_row(row: &Row<'_>) -> RepoResult<Submission> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in submissions.id"))
    })?;

    let data_approval: String = row.get("data_approval")?;
    let security_approval: String = row.get("security_approval")?;
    let legal_approval: String = row.get("legal_approval")?;
    let overall_status: String = row.get("overall_status")?;

    let submission = Submission {
        id,
        name: row.get("name")?,
        description: row.get("description")?,
        purpose: row.get("purpose")?,
        created_at: row.get("created_at")?,
        data_approval: parse_column(&data_approval, "data_approval")?,
        security_approval: parse_column(&security_approval, "security_approval")?,
        legal_approval: parse_column(&legal_approval, "legal_approval")?,
        overall_status: parse_column(&overall_status, "overall_status")?,
    };
    submission
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("submission {id}: {err}")))?;
    Ok(submission)
}

fn parse_column<T: FromStr>(value: &str, column: &'static str) -> RepoResult<T> {
    value.parse().map_err(|_| {
        RepoError::InvalidData(format!("invalid value `{value}` in submissions.{column}"))
    })
}

fn ensure_submission_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "submissions")? {
        return Err(RepoError::MissingRequiredTable("submissions"));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "submissions", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "submissions",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
