use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::{AuthenticatedUser, MaybeUser};
use crate::auth::policy;
use crate::cache::{RedisCache, keys};
use crate::db::bids as bid_db;
use crate::db::jobs as job_db;
use crate::error::{ApiError, FieldError};
use crate::lifecycle::Transition;
use crate::lifecycle::jobs as job_lifecycle;
use crate::models::jobs::{self, CreateJob, JobFilters, JobStatus, TransitionJob, UpdateJob};
use crate::validation;

/// GET /api/jobs — list jobs matching the filters.
///
/// Visibility narrows rather than denies: anonymous callers see only `open`
/// jobs and never get an auth error.
pub async fn list_jobs(
    viewer: MaybeUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    query: web::Query<JobFilters>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let filters = query.into_inner();

    // Anonymous listings are identical for every caller, so they cache well.
    let cache_key = if viewer.0.is_none() {
        Some(keys::job_list(req.query_string()))
    } else {
        None
    };
    if let Some(key) = &cache_key {
        match cache.get::<Vec<jobs::Model>>(key).await {
            Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
            Ok(None) => {}
            Err(e) => tracing::warn!("cache error on {key}: {e}"),
        }
    }

    // The predicate runs inside the scan, before the page limit, so hidden
    // or non-matching rows never shrink the page.
    let visible = job_db::find_jobs(
        db.get_ref(),
        &filters,
        viewer.id(),
        viewer.0.is_none(),
        |job| {
            policy::job_visible_to(job, viewer.0.as_ref())
                && filters.matches_lists(job)
                && match (filters.assigned_to_me, viewer.id()) {
                    (Some(true), Some(id)) => job.assigned_to.contains(id),
                    (Some(true), None) => false,
                    _ => true,
                }
        },
    )
    .await?;

    if let Some(key) = &cache_key {
        if let Err(e) = cache.set(key, &visible, Some(300)).await {
            tracing::warn!("cache write failed on {key}: {e}");
        }
    }

    Ok(HttpResponse::Ok().json(visible))
}

/// GET /api/jobs/{id} — read one job and bump its view counter.
///
/// The counter is a display metric: the bump is fire-and-forget and a lost
/// update never fails the read.
pub async fn get_job(
    viewer: MaybeUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let key = keys::job(id);

    // Only open jobs are ever cached (and every transition drops the key),
    // so a hit is public and safe for any viewer. The counter still bumps
    // on every read.
    match cache.get::<jobs::Model>(&key).await {
        Ok(Some(cached)) => {
            if let Err(e) = job_db::increment_view_count(db.get_ref(), id).await {
                tracing::warn!("view count bump failed for job {id}: {e}");
            }
            return Ok(HttpResponse::Ok().json(cached));
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("cache error on {key}: {e}"),
    }

    let job = job_db::get_job_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {id} not found")))?;

    // Invisible jobs read as absent, so the response never reveals whether
    // a hidden job exists.
    if !policy::job_visible_to(&job, viewer.0.as_ref()) {
        return Err(ApiError::NotFound(format!("Job {id} not found")));
    }

    if let Err(e) = job_db::increment_view_count(db.get_ref(), id).await {
        tracing::warn!("view count bump failed for job {id}: {e}");
    }

    // Only the public subset goes in the shared cache.
    if job.status == JobStatus::Open {
        if let Err(e) = cache.set(&key, &job, Some(300)).await {
            tracing::warn!("cache write failed on {key}: {e}");
        }
    }

    Ok(HttpResponse::Ok().json(job))
}

/// POST /api/jobs — create a job in `draft` status.
pub async fn create_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreateJob>,
) -> Result<HttpResponse, ApiError> {
    policy::ensure_can_create_job(&user.0)?;

    let input = body.into_inner();
    validation::validate_job(&input)?;

    let job = job_db::insert_job(db.get_ref(), input, user.0.id).await?;

    invalidate_job_caches(&cache, job.id).await;
    Ok(HttpResponse::Created().json(job))
}

/// PUT /api/jobs/{id} — owner field edits.
///
/// Allowed in draft/open/under_review only; after award the job is
/// immutable apart from its status.
pub async fn update_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateJob>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner();

    let job = job_db::get_job_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {id} not found")))?;

    policy::ensure_job_owner(&job, &user.0)?;

    if !job_lifecycle::fields_mutable(job.status) {
        return Err(ApiError::Conflict(format!(
            "job is {} and its fields can no longer be edited",
            job.status
        )));
    }

    // Edits must not break the budget ordering the create-path enforces.
    let min = input.min_budget.or(job.min_budget);
    let max = input.max_budget.or(job.max_budget);
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ApiError::Validation(vec![FieldError::new(
                "min_budget",
                "min_budget must not exceed max_budget",
            )]));
        }
    }

    let updated = job_db::update_job(db.get_ref(), job, input).await?;

    invalidate_job_caches(&cache, id).await;
    Ok(HttpResponse::Ok().json(updated))
}

/// PUT /api/jobs/{id}/status — request a lifecycle transition.
///
/// Requesting the current status is an allowed no-op. Anything outside the
/// transition table comes back as an illegal-transition error naming both
/// statuses.
pub async fn transition_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<TransitionJob>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let requested = body.into_inner().status;

    let job = job_db::get_job_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {id} not found")))?;

    policy::ensure_job_owner(&job, &user.0)?;

    match job_lifecycle::check_transition(job.status, requested)? {
        Transition::NoOp => return Ok(HttpResponse::Ok().json(job)),
        Transition::Move => {}
    }

    if job.status == JobStatus::Draft && requested == JobStatus::Open {
        job_lifecycle::check_publish_gate(&job)?;
    }

    // Awarding is driven by accepting a bid; a direct request only goes
    // through when the accepted bid is already on record.
    if requested == JobStatus::Awarded
        && bid_db::find_accepted_bid(db.get_ref(), job.id).await?.is_none()
    {
        return Err(ApiError::Validation(vec![FieldError::new(
            "status",
            "a job is awarded by accepting one of its bids",
        )]));
    }

    let updated = job_db::transition_status(db.get_ref(), &job, requested).await?;
    tracing::info!(
        "job {id} moved from {} to {} by {}",
        job.status,
        updated.status,
        user.0.id
    );

    invalidate_job_caches(&cache, id).await;
    Ok(HttpResponse::Ok().json(updated))
}

/// Drop every cached read this job could appear in.
pub(crate) async fn invalidate_job_caches(cache: &RedisCache, job_id: Uuid) {
    for result in [
        cache.delete(&keys::job(job_id)).await,
        cache.delete(&keys::job_bids(job_id)).await,
        cache.delete_pattern(keys::job_list_pattern()).await,
    ] {
        if let Err(e) = result {
            tracing::warn!("cache invalidation failed for job {job_id}: {e}");
        }
    }
}
