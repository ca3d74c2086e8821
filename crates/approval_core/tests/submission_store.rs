use approval_core::db::open_db_in_memory;
use approval_core::{
    ApprovalStatus, OverallStatus, RepoError, SqliteSubmissionRepository, StatusCounts,
    Submission, SubmissionRepository, Team,
};
use rusqlite::Connection;
use std::collections::HashSet;
use uuid::Uuid;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn create_initializes_every_field_to_pending() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    let created = repo.create("Req A", "desc", "Data Access").unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(created.name, "Req A");
    assert_eq!(created.description, "desc");
    assert_eq!(created.purpose, "Data Access");
    for team in Team::ALL {
        assert_eq!(created.approval_for(team), ApprovalStatus::Pending);
    }
    assert_eq!(created.overall_status, OverallStatus::Pending);

    let loaded = repo.get(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_does_not_validate_empty_fields() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    let created = repo.create("", "", "").unwrap();
    assert_eq!(repo.get(created.id).unwrap().unwrap().name, "");
}

#[test]
fn get_unknown_id_returns_none() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    assert!(repo.get(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn list_all_on_empty_store_is_empty() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn list_all_returns_newest_first() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    let s1 = repo.create("S1", "first", "Other").unwrap();
    let s2 = repo.create("S2", "second", "Other").unwrap();
    let s3 = repo.create("S3", "third", "Other").unwrap();

    let ids: Vec<_> = repo.list_all().unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![s3.id, s2.id, s1.id]);
}

#[test]
fn list_all_orders_by_timestamp_not_insertion() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    let newer = Submission::with_id(Uuid::new_v4(), 2_000, "newer", "desc", "Other");
    let older = Submission::with_id(Uuid::new_v4(), 1_000, "older", "desc", "Other");
    repo.insert(&newer).unwrap();
    repo.insert(&older).unwrap();

    let names: Vec<_> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["newer", "older"]);
}

#[test]
fn approving_with_all_three_teams_reaches_fully_approved() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();
    let created = repo.create("Req A", "desc", "Data Access").unwrap();

    let after_data = repo
        .update_team_approval(created.id, Team::Data, ApprovalStatus::Approved)
        .unwrap();
    assert_eq!(after_data.overall_status, OverallStatus::Pending);

    let after_security = repo
        .update_team_approval(created.id, Team::Security, ApprovalStatus::Approved)
        .unwrap();
    assert_eq!(after_security.overall_status, OverallStatus::Pending);

    let after_legal = repo
        .update_team_approval(created.id, Team::Legal, ApprovalStatus::Approved)
        .unwrap();
    assert_eq!(after_legal.overall_status, OverallStatus::FullyApproved);

    let stored = repo.get(created.id).unwrap().unwrap();
    assert_eq!(stored, after_legal);
}

#[test]
fn single_rejection_rejects_immediately() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();
    let created = repo.create("Req B", "desc", "Security Update").unwrap();

    let updated = repo
        .update_team_approval(created.id, Team::Security, ApprovalStatus::Rejected)
        .unwrap();
    assert_eq!(updated.overall_status, OverallStatus::Rejected);
    assert_eq!(updated.data_approval, ApprovalStatus::Pending);
    assert_eq!(updated.legal_approval, ApprovalStatus::Pending);

    let stored = repo.get(created.id).unwrap().unwrap();
    assert_eq!(stored.security_approval, ApprovalStatus::Rejected);
    assert_eq!(stored.overall_status, OverallStatus::Rejected);
}

#[test]
fn team_fields_remain_reassignable() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();
    let created = repo.create("Req C", "desc", "Process Change").unwrap();

    repo.update_team_approval(created.id, Team::Legal, ApprovalStatus::Rejected)
        .unwrap();
    let reverted = repo
        .update_team_approval(created.id, Team::Legal, ApprovalStatus::Pending)
        .unwrap();

    assert_eq!(reverted.legal_approval, ApprovalStatus::Pending);
    assert_eq!(reverted.overall_status, OverallStatus::Pending);
}

#[test]
fn list_pending_for_team_filters_on_that_team_only() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    let untouched = repo.create("untouched", "desc", "Other").unwrap();
    let data_approved = repo.create("data approved", "desc", "Other").unwrap();
    let data_rejected = repo.create("data rejected", "desc", "Other").unwrap();
    let legal_approved = repo.create("legal approved", "desc", "Other").unwrap();

    repo.update_team_approval(data_approved.id, Team::Data, ApprovalStatus::Approved)
        .unwrap();
    repo.update_team_approval(data_rejected.id, Team::Data, ApprovalStatus::Rejected)
        .unwrap();
    repo.update_team_approval(legal_approved.id, Team::Legal, ApprovalStatus::Approved)
        .unwrap();

    let pending_data: HashSet<_> = repo
        .list_pending_for_team(Team::Data)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(
        pending_data,
        HashSet::from([untouched.id, legal_approved.id])
    );

    let pending_legal: Vec<_> = repo
        .list_pending_for_team(Team::Legal)
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(
        pending_legal,
        vec![data_rejected.id, data_approved.id, untouched.id]
    );

    let pending_security = repo.list_pending_for_team(Team::Security).unwrap();
    assert_eq!(pending_security.len(), 4);
}

#[test]
fn update_unknown_id_returns_not_found_and_leaves_store_unchanged() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();
    repo.create("Req A", "desc", "Other").unwrap();
    let before = repo.list_all().unwrap();

    let missing = Uuid::new_v4();
    let err = repo
        .update_team_approval(missing, Team::Data, ApprovalStatus::Approved)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));

    let after = repo.list_all().unwrap();
    assert_eq!(after.len(), before.len());
    assert_eq!(after, before);
}

#[test]
fn clear_all_removes_everything() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();
    repo.create("S1", "desc", "Other").unwrap();
    repo.create("S2", "desc", "Other").unwrap();

    assert_eq!(repo.clear_all().unwrap(), 2);
    assert!(repo.list_all().unwrap().is_empty());
    assert_eq!(repo.clear_all().unwrap(), 0);
}

#[test]
fn overall_status_counts_group_by_status() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    let approved = repo.create("approved", "desc", "Other").unwrap();
    let rejected = repo.create("rejected", "desc", "Other").unwrap();
    repo.create("pending", "desc", "Other").unwrap();
    for team in Team::ALL {
        repo.update_team_approval(approved.id, team, ApprovalStatus::Approved)
            .unwrap();
    }
    repo.update_team_approval(rejected.id, Team::Data, ApprovalStatus::Rejected)
        .unwrap();

    let counts = repo.overall_status_counts().unwrap();
    assert_eq!(
        counts,
        StatusCounts {
            pending: 1,
            fully_approved: 1,
            rejected: 1,
        }
    );
    assert_eq!(counts.total(), 3);
}

#[test]
fn insert_rejects_stale_overall_status() {
    let conn = setup();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    let mut stale = Submission::new("stale", "desc", "Other");
    stale.data_approval = ApprovalStatus::Rejected;

    let err = repo.insert(&stale).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn read_rejects_persisted_row_with_stale_overall_status() {
    let conn = setup();
    conn.execute(
        "INSERT INTO submissions (
            id, name, description, purpose, created_at, legal_approval, overall_status
        ) VALUES (?1, 'tampered', 'desc', 'Other', 1, 'rejected', 'pending');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();
    let repo = SqliteSubmissionRepository::try_new(&conn).unwrap();

    let err = repo.list_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)), "unexpected: {err}");
}

#[test]
fn writes_are_visible_to_a_second_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    let writer_conn = approval_core::db::open_db(&path).unwrap();
    let reader_conn = approval_core::db::open_db(&path).unwrap();
    let writer = SqliteSubmissionRepository::try_new(&writer_conn).unwrap();
    let reader = SqliteSubmissionRepository::try_new(&reader_conn).unwrap();

    let created = writer.create("Req A", "desc", "Other").unwrap();
    writer
        .update_team_approval(created.id, Team::Data, ApprovalStatus::Rejected)
        .unwrap();

    let seen = reader.get(created.id).unwrap().unwrap();
    assert_eq!(seen.data_approval, ApprovalStatus::Rejected);
    assert_eq!(seen.overall_status, OverallStatus::Rejected);
}
