//! Job lifecycle: draft → open → under_review → awarded → in_progress →
//! completed, with cancelled reachable from every non-terminal state.

use super::Transition;
use crate::error::{ApiError, FieldError};
use crate::models::jobs::{AssignmentMode, JobStatus, Model as Job};

/// Statuses a job may move to from `current`. The current status itself is
/// not listed; self-transitions are handled as no-ops in [`check_transition`].
pub fn allowed_transitions(current: JobStatus) -> &'static [JobStatus] {
    match current {
        JobStatus::Draft => &[JobStatus::Open, JobStatus::Cancelled],
        JobStatus::Open => &[JobStatus::UnderReview, JobStatus::Cancelled],
        JobStatus::UnderReview => &[JobStatus::Awarded, JobStatus::Open, JobStatus::Cancelled],
        JobStatus::Awarded => &[JobStatus::InProgress, JobStatus::Cancelled],
        JobStatus::InProgress => &[JobStatus::Completed, JobStatus::Cancelled],
        JobStatus::Completed => &[],
        JobStatus::Cancelled => &[],
    }
}

pub fn is_terminal(status: JobStatus) -> bool {
    allowed_transitions(status).is_empty()
}

/// Validate a requested status change against the transition table.
pub fn check_transition(current: JobStatus, requested: JobStatus) -> Result<Transition, ApiError> {
    if current == requested {
        return Ok(Transition::NoOp);
    }
    if allowed_transitions(current).contains(&requested) {
        Ok(Transition::Move)
    } else {
        Err(ApiError::illegal_transition("job", current, requested))
    }
}

/// Publishing (draft → open) an open-bidding job requires a bid deadline.
/// Directly assigned jobs have no bidding window to gate on.
pub fn check_publish_gate(job: &Job) -> Result<(), ApiError> {
    if job.assignment_mode == AssignmentMode::Open && job.bid_deadline.is_none() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "bid_deadline",
            "a bid deadline must be set before the job can be opened for bidding",
        )]));
    }
    Ok(())
}

/// Whether the owner may still edit the job's fields. After award the job is
/// immutable apart from its status.
pub fn fields_mutable(status: JobStatus) -> bool {
    matches!(
        status,
        JobStatus::Draft | JobStatus::Open | JobStatus::UnderReview
    )
}
