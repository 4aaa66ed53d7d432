//! Bid lifecycle, tied to the parent job's state: pending → shortlisted →
//! accepted/rejected, with withdrawal reserved to the bidder. Accepting a
//! bid is what awards the job; the paired commit lives in `db::bids`.

use super::Transition;
use crate::error::ApiError;
use crate::models::bids::{BidStatus, BidderType};
use crate::models::jobs::{AssignmentMode, JobStatus, Model as Job};
use crate::models::users::Roles;
use uuid::Uuid;

/// Statuses a bid may move to from `current`.
pub fn allowed_transitions(current: BidStatus) -> &'static [BidStatus] {
    match current {
        BidStatus::Pending => &[
            BidStatus::Shortlisted,
            BidStatus::Accepted,
            BidStatus::Rejected,
            BidStatus::Withdrawn,
        ],
        BidStatus::Shortlisted => &[
            BidStatus::Accepted,
            BidStatus::Rejected,
            BidStatus::Withdrawn,
        ],
        BidStatus::Accepted => &[],
        BidStatus::Rejected => &[],
        BidStatus::Withdrawn => &[],
    }
}

/// Validate a requested bid status change against the transition table.
pub fn check_transition(current: BidStatus, requested: BidStatus) -> Result<Transition, ApiError> {
    if current == requested {
        return Ok(Transition::NoOp);
    }
    if allowed_transitions(current).contains(&requested) {
        Ok(Transition::Move)
    } else {
        Err(ApiError::illegal_transition("bid", current, requested))
    }
}

/// Shortlist/accept/reject are owner moves; withdrawal belongs to the bidder.
pub fn is_owner_move(requested: BidStatus) -> bool {
    matches!(
        requested,
        BidStatus::Shortlisted | BidStatus::Accepted | BidStatus::Rejected
    )
}

/// Accepting a bid is only legal while its job is still taking or reviewing
/// bids.
pub fn job_accepts_award(status: JobStatus) -> bool {
    matches!(status, JobStatus::Open | JobStatus::UnderReview)
}

/// Once a job has been awarded, every bid on it is frozen.
pub fn bids_frozen(status: JobStatus) -> bool {
    matches!(
        status,
        JobStatus::Awarded | JobStatus::InProgress | JobStatus::Completed
    )
}

/// The bidder_type recorded on a bid, derived from the bidder's role.
/// Investors and admins do not bid.
pub fn bidder_type_for_role(role: Roles) -> Option<BidderType> {
    match role {
        Roles::Artist => Some(BidderType::Artist),
        Roles::Studio => Some(BidderType::Studio),
        Roles::Investor | Roles::Admin => None,
    }
}

/// Gate for bid creation: the job must be open for open bidding, and the
/// bidder must be an artist or studio other than the job's creator.
pub fn check_bid_creation(job: &Job, bidder_id: Uuid, role: Roles) -> Result<BidderType, ApiError> {
    let bidder_type = bidder_type_for_role(role)
        .ok_or_else(|| ApiError::Forbidden("only artists and studios can submit bids".into()))?;

    if job.created_by == bidder_id {
        return Err(ApiError::Forbidden(
            "you cannot bid on your own job".into(),
        ));
    }
    if job.assignment_mode != AssignmentMode::Open {
        return Err(ApiError::Conflict(
            "this job is directly assigned and does not take bids".into(),
        ));
    }
    if job.status != JobStatus::Open {
        return Err(ApiError::Conflict(format!(
            "job is {} and no longer taking bids",
            job.status
        )));
    }

    Ok(bidder_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StringList;
    use crate::models::jobs::{PaymentType, ShotBreakdown, UserIdList};
    use chrono::{NaiveDate, Utc};
    use sea_orm::Iterable;

    fn job_in(status: JobStatus, mode: AssignmentMode) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: "FX sim for flood scene".to_string(),
            description: "Water simulation across 6 hero shots".to_string(),
            movie_ref: None,
            assignment_mode: mode,
            assigned_to: UserIdList::default(),
            payment_type: PaymentType::Fixed,
            currency: "USD".to_string(),
            min_budget: None,
            max_budget: None,
            total_shots: Some(6),
            total_frames: None,
            resolution: None,
            frame_rate: None,
            shot_breakdown: ShotBreakdown::default(),
            required_skills: StringList(vec!["Houdini FX".to_string()]),
            software_preferences: StringList::default(),
            deliverables: StringList(vec!["Cached sims".to_string()]),
            bid_deadline: Some(Utc::now()),
            expected_start_date: None,
            final_delivery_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            notes_for_bidders: None,
            status,
            created_by: Uuid::new_v4(),
            view_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn transition_table_is_exhaustive() {
        for current in BidStatus::iter() {
            for requested in BidStatus::iter() {
                let result = check_transition(current, requested);
                if current == requested {
                    assert_eq!(result.unwrap(), Transition::NoOp);
                } else if allowed_transitions(current).contains(&requested) {
                    assert_eq!(result.unwrap(), Transition::Move);
                } else {
                    assert!(result.is_err(), "{current} -> {requested} should fail");
                }
            }
        }
    }

    #[test]
    fn accepted_rejected_withdrawn_are_terminal() {
        for terminal in [BidStatus::Accepted, BidStatus::Rejected, BidStatus::Withdrawn] {
            assert!(allowed_transitions(terminal).is_empty());
        }
    }

    #[test]
    fn withdrawal_is_a_bidder_move() {
        assert!(!is_owner_move(BidStatus::Withdrawn));
        assert!(is_owner_move(BidStatus::Accepted));
        assert!(is_owner_move(BidStatus::Shortlisted));
        assert!(is_owner_move(BidStatus::Rejected));
    }

    #[test]
    fn award_window_is_open_or_under_review() {
        assert!(job_accepts_award(JobStatus::Open));
        assert!(job_accepts_award(JobStatus::UnderReview));
        assert!(!job_accepts_award(JobStatus::Draft));
        assert!(!job_accepts_award(JobStatus::Awarded));
        assert!(!job_accepts_award(JobStatus::Cancelled));
    }

    #[test]
    fn bids_freeze_once_awarded() {
        assert!(bids_frozen(JobStatus::Awarded));
        assert!(bids_frozen(JobStatus::InProgress));
        assert!(bids_frozen(JobStatus::Completed));
        assert!(!bids_frozen(JobStatus::Open));
        assert!(!bids_frozen(JobStatus::Cancelled));
    }

    #[test]
    fn creation_requires_open_job_and_open_mode() {
        let job = job_in(JobStatus::Open, AssignmentMode::Open);
        let bidder = Uuid::new_v4();
        assert_eq!(
            check_bid_creation(&job, bidder, Roles::Artist).unwrap(),
            BidderType::Artist
        );
        assert_eq!(
            check_bid_creation(&job, bidder, Roles::Studio).unwrap(),
            BidderType::Studio
        );

        let draft = job_in(JobStatus::Draft, AssignmentMode::Open);
        assert!(matches!(
            check_bid_creation(&draft, bidder, Roles::Artist),
            Err(ApiError::Conflict(_))
        ));

        let direct = job_in(JobStatus::Open, AssignmentMode::Direct);
        assert!(matches!(
            check_bid_creation(&direct, bidder, Roles::Artist),
            Err(ApiError::Conflict(_))
        ));
    }

    #[test]
    fn creator_and_non_bidding_roles_are_refused() {
        let job = job_in(JobStatus::Open, AssignmentMode::Open);
        assert!(matches!(
            check_bid_creation(&job, job.created_by, Roles::Studio),
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            check_bid_creation(&job, Uuid::new_v4(), Roles::Investor),
            Err(ApiError::Forbidden(_))
        ));
    }
}
