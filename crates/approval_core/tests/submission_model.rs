use approval_core::{
    ApprovalStatus, OverallStatus, ParseError, Submission, SubmissionValidationError, Team,
    SUGGESTED_PURPOSES,
};
use uuid::Uuid;

#[test]
fn new_submission_starts_pending() {
    let submission = Submission::new("Req A", "desc", "Data Access");

    assert!(!submission.id.is_nil());
    assert!(submission.created_at > 0);
    assert_eq!(submission.data_approval, ApprovalStatus::Pending);
    assert_eq!(submission.security_approval, ApprovalStatus::Pending);
    assert_eq!(submission.legal_approval, ApprovalStatus::Pending);
    assert_eq!(submission.overall_status, OverallStatus::Pending);
    assert!(submission.validate().is_ok());
}

#[test]
fn other_team_approvals_skip_the_given_team() {
    let mut submission = Submission::new("Req A", "desc", "Data Access");
    submission.legal_approval = ApprovalStatus::Approved;

    assert_eq!(
        submission.other_team_approvals(Team::Security),
        vec![
            (Team::Data, ApprovalStatus::Pending),
            (Team::Legal, ApprovalStatus::Approved),
        ]
    );
}

#[test]
fn validate_rejects_nil_id_and_stale_status() {
    let nil = Submission::with_id(Uuid::nil(), 1, "Req", "desc", "Other");
    assert_eq!(nil.validate().unwrap_err(), SubmissionValidationError::NilId);

    let mut stale = Submission::new("Req", "desc", "Other");
    stale.overall_status = OverallStatus::FullyApproved;
    assert_eq!(
        stale.validate().unwrap_err(),
        SubmissionValidationError::StaleOverallStatus {
            stored: OverallStatus::FullyApproved,
            expected: OverallStatus::Pending,
        }
    );
}

#[test]
fn serialization_uses_snake_case_tokens() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut submission = Submission::with_id(id, 1_700_000_000_000, "Req", "desc", "Other");
    submission.data_approval = ApprovalStatus::Approved;
    submission.security_approval = ApprovalStatus::Approved;
    submission.legal_approval = ApprovalStatus::Approved;
    submission.overall_status = OverallStatus::FullyApproved;

    let json = serde_json::to_value(&submission).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    assert_eq!(json["data_approval"], "approved");
    assert_eq!(json["overall_status"], "fully_approved");

    let decoded: Submission = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, submission);
}

#[test]
fn labels_and_parsing_agree() {
    assert_eq!(OverallStatus::FullyApproved.to_string(), "Fully Approved");
    assert_eq!(
        "Fully Approved".parse::<OverallStatus>().unwrap(),
        OverallStatus::FullyApproved
    );
    for team in Team::ALL {
        assert_eq!(team.to_string().parse::<Team>().unwrap(), team);
        assert_eq!(team.as_str().parse::<Team>().unwrap(), team);
    }
    assert!(matches!(
        "Done".parse::<OverallStatus>(),
        Err(ParseError::UnknownOverallStatus(_))
    ));
}

#[test]
fn suggested_purposes_include_other() {
    assert_eq!(SUGGESTED_PURPOSES.len(), 6);
    assert!(SUGGESTED_PURPOSES.contains(&"Other"));
}
