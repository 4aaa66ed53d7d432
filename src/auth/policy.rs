//! Authorization policy. Writes are hard gates that return `Forbidden`;
//! read visibility is a predicate the query layer filters with.

use crate::error::ApiError;
use crate::models::jobs::{JobStatus, Model as Job};
use crate::models::users::{Model as User, Roles};
use uuid::Uuid;

pub fn is_admin(user: &User) -> bool {
    user.role == Roles::Admin
}

/// Only studios (and admins) post work.
pub fn ensure_can_create_job(user: &User) -> Result<(), ApiError> {
    match user.role {
        Roles::Studio | Roles::Admin => Ok(()),
        _ => Err(ApiError::Forbidden(
            "only studios can post jobs".to_string(),
        )),
    }
}

/// The job's creator, or an admin, may mutate it.
pub fn ensure_job_owner(job: &Job, user: &User) -> Result<(), ApiError> {
    if job.created_by == user.id || is_admin(user) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "only the job's creator can do this".to_string(),
        ))
    }
}

/// Read visibility: open jobs are public; everything else is visible only to
/// the creator, the assignees, or an admin.
pub fn job_visible_to(job: &Job, viewer: Option<&User>) -> bool {
    if job.status == JobStatus::Open {
        return true;
    }
    match viewer {
        Some(user) => {
            is_admin(user) || job.created_by == user.id || job.assigned_to.contains(user.id)
        }
        None => false,
    }
}

/// The full bid list of a job is owner/admin-only. Bidders reach their own
/// bids through the "my bids" listing instead.
pub fn ensure_can_list_bids(job: &Job, user: &User) -> Result<(), ApiError> {
    ensure_job_owner(job, user)
        .map_err(|_| ApiError::Forbidden("only the job's creator can view its bids".to_string()))
}

/// A single bid is visible to the job owner, the bidder, or an admin.
pub fn bid_visible_to(job: &Job, bidder_id: Uuid, user: &User) -> bool {
    is_admin(user) || job.created_by == user.id || bidder_id == user.id
}
