///! End-to-end walk through the job/bid lifecycle at the decision layer:
///! validation, authorization policy, and both state machines, exercised in
///! the order a real award flows through them. No database is needed —
///! every gate these tests hit is the same pure function the handlers call.
///!
///! Run with: `cargo test --test lifecycle_test`
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use pikxora_backend::auth::policy;
use pikxora_backend::error::ApiError;
use pikxora_backend::lifecycle::bids as bid_lifecycle;
use pikxora_backend::lifecycle::jobs as job_lifecycle;
use pikxora_backend::lifecycle::Transition;
use pikxora_backend::models::StringList;
use pikxora_backend::models::bids::{BidStatus, BidderType, BreakdownLine, CreateBid};
use pikxora_backend::models::jobs::{
    AssignmentMode, CreateJob, JobStatus, Model as Job, PaymentType, ShotBreakdown, UserIdList,
};
use pikxora_backend::models::users::{Model as User, Roles};
use pikxora_backend::validation;

fn user(role: Roles) -> User {
    User {
        id: Uuid::new_v4(),
        email: format!("{}@pikxora.test", Uuid::new_v4()),
        username: None,
        display_name: None,
        avatar_url: None,
        auth_provider: "pikxora-auth".to_string(),
        role,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn job_payload() -> CreateJob {
    CreateJob {
        title: "Full CG shot replacement".to_string(),
        description: "Replace 15 practical shots with full CG".to_string(),
        movie_ref: Some("Harbor Run".to_string()),
        assignment_mode: AssignmentMode::Open,
        assigned_to: None,
        payment_type: PaymentType::Fixed,
        currency: "USD".to_string(),
        min_budget: Some(10_000.0),
        max_budget: Some(40_000.0),
        total_shots: Some(15),
        total_frames: None,
        resolution: Some("4K".to_string()),
        frame_rate: Some("24".to_string()),
        shot_breakdown: vec![],
        required_skills: vec!["Lighting".to_string(), "Compositing".to_string()],
        software_preferences: vec!["Nuke".to_string()],
        deliverables: vec!["Final comps".to_string()],
        bid_deadline: Some(Utc::now() + chrono::Duration::days(7)),
        expected_start_date: None,
        final_delivery_date: NaiveDate::from_ymd_opt(2026, 12, 15).unwrap(),
        notes_for_bidders: None,
    }
}

/// Materialize the job a studio's validated payload would persist as.
fn job_from(payload: &CreateJob, created_by: Uuid) -> Job {
    Job {
        id: Uuid::new_v4(),
        title: payload.title.clone(),
        description: payload.description.clone(),
        movie_ref: payload.movie_ref.clone(),
        assignment_mode: payload.assignment_mode,
        assigned_to: UserIdList::default(),
        payment_type: payload.payment_type,
        currency: payload.currency.clone(),
        min_budget: payload.min_budget,
        max_budget: payload.max_budget,
        total_shots: payload.total_shots,
        total_frames: payload.total_frames,
        resolution: payload.resolution.clone(),
        frame_rate: payload.frame_rate.clone(),
        shot_breakdown: ShotBreakdown::default(),
        required_skills: StringList(payload.required_skills.clone()),
        software_preferences: StringList(payload.software_preferences.clone()),
        deliverables: StringList(payload.deliverables.clone()),
        bid_deadline: payload.bid_deadline,
        expected_start_date: payload.expected_start_date,
        final_delivery_date: payload.final_delivery_date,
        notes_for_bidders: payload.notes_for_bidders.clone(),
        status: JobStatus::Draft,
        created_by,
        view_count: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn studio_posts_artist_bids_owner_awards() {
    let studio = user(Roles::Studio);
    let artist_a = user(Roles::Artist);
    let artist_b = user(Roles::Artist);

    // Studio S creates job J.
    policy::ensure_can_create_job(&studio).expect("studios post jobs");
    let payload = job_payload();
    validation::validate_job(&payload).expect("payload is valid");
    let mut job = job_from(&payload, studio.id);

    // S publishes: draft -> open.
    policy::ensure_job_owner(&job, &studio).unwrap();
    assert_eq!(
        job_lifecycle::check_transition(job.status, JobStatus::Open).unwrap(),
        Transition::Move
    );
    job_lifecycle::check_publish_gate(&job).expect("deadline is set");
    job.status = JobStatus::Open;

    // Artist A (≠ S) bids 5000, status pending.
    let bid_input = CreateBid {
        amount_total: 5000.0,
        currency: "USD".to_string(),
        breakdown: Some(vec![
            BreakdownLine {
                label: "Lighting".to_string(),
                amount: 3000.0,
            },
            BreakdownLine {
                label: "Comp".to_string(),
                amount: 2000.0,
            },
        ]),
        estimated_duration_days: Some(45),
        start_available_from: None,
        notes: None,
        included_services: vec![],
    };
    validation::validate_bid(&bid_input).expect("breakdown sums to total");
    let bidder_type = bid_lifecycle::check_bid_creation(&job, artist_a.id, artist_a.role)
        .expect("open job takes bids");
    assert_eq!(bidder_type, BidderType::Artist);
    let mut bid_status = BidStatus::Pending;

    // S accepts the bid; the same request awards the job.
    assert_eq!(
        bid_lifecycle::check_transition(bid_status, BidStatus::Accepted).unwrap(),
        Transition::Move
    );
    assert!(bid_lifecycle::is_owner_move(BidStatus::Accepted));
    assert!(bid_lifecycle::job_accepts_award(job.status));
    bid_status = BidStatus::Accepted;
    job.status = JobStatus::Awarded;

    // Artist B can no longer bid: the job left `open`.
    let err = bid_lifecycle::check_bid_creation(&job, artist_b.id, artist_b.role).unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    // And no bid on the job may move again.
    assert!(bid_lifecycle::bids_frozen(job.status));
    assert!(!bid_lifecycle::job_accepts_award(job.status));
    assert!(bid_lifecycle::check_transition(bid_status, BidStatus::Rejected).is_err());
}

#[test]
fn bid_creation_gate_holds_against_a_reloaded_job() {
    let studio = user(Roles::Studio);
    let artist = user(Roles::Artist);
    let mut job = job_from(&job_payload(), studio.id);
    job.status = JobStatus::Open;

    // The gate passes against the snapshot the handler loaded...
    assert!(bid_lifecycle::check_bid_creation(&job, artist.id, artist.role).is_ok());

    // ...but an accept can commit between that snapshot and the insert. The
    // insert re-reads the job inside its transaction; re-running the gate
    // against the fresh row must refuse the bid.
    job.status = JobStatus::Awarded;
    assert!(matches!(
        bid_lifecycle::check_bid_creation(&job, artist.id, artist.role),
        Err(ApiError::Conflict(_))
    ));

    job.status = JobStatus::Cancelled;
    assert!(matches!(
        bid_lifecycle::check_bid_creation(&job, artist.id, artist.role),
        Err(ApiError::Conflict(_))
    ));
}

#[test]
fn publish_gate_blocks_jobs_without_deadline() {
    let studio = user(Roles::Studio);
    let mut payload = job_payload();
    payload.bid_deadline = None;

    // The create-path already rejects it...
    assert!(validation::validate_job(&payload).is_err());

    // ...and so does the publish gate if a draft lost its deadline later.
    let job = job_from(&payload, studio.id);
    let err = job_lifecycle::check_publish_gate(&job).unwrap_err();
    match err {
        ApiError::Validation(fields) => assert_eq!(fields[0].field, "bid_deadline"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn only_the_owner_or_admin_drives_job_transitions() {
    let studio = user(Roles::Studio);
    let admin = user(Roles::Admin);
    let outsider = user(Roles::Studio);
    let job = job_from(&job_payload(), studio.id);

    assert!(policy::ensure_job_owner(&job, &studio).is_ok());
    assert!(policy::ensure_job_owner(&job, &admin).is_ok());
    assert!(matches!(
        policy::ensure_job_owner(&job, &outsider),
        Err(ApiError::Forbidden(_))
    ));
}

#[test]
fn requesting_the_current_status_is_a_noop() {
    for status in [
        JobStatus::Draft,
        JobStatus::Open,
        JobStatus::Awarded,
        JobStatus::Completed,
        JobStatus::Cancelled,
    ] {
        assert_eq!(
            job_lifecycle::check_transition(status, status).unwrap(),
            Transition::NoOp
        );
    }
    assert_eq!(
        bid_lifecycle::check_transition(BidStatus::Accepted, BidStatus::Accepted).unwrap(),
        Transition::NoOp
    );
}

#[test]
fn illegal_job_transitions_carry_both_statuses() {
    let err = job_lifecycle::check_transition(JobStatus::Draft, JobStatus::Completed).unwrap_err();
    match err {
        ApiError::IllegalTransition {
            entity,
            current,
            requested,
        } => {
            assert_eq!(entity, "job");
            assert_eq!(current, "draft");
            assert_eq!(requested, "completed");
        }
        other => panic!("expected illegal transition, got {other:?}"),
    }
}

#[test]
fn anonymous_viewers_see_only_open_jobs() {
    let studio = user(Roles::Studio);
    let mut job = job_from(&job_payload(), studio.id);

    assert!(!policy::job_visible_to(&job, None));
    job.status = JobStatus::Open;
    assert!(policy::job_visible_to(&job, None));
    job.status = JobStatus::Awarded;
    assert!(!policy::job_visible_to(&job, None));
}
