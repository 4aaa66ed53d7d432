use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::policy;
use crate::cache::{RedisCache, keys};
use crate::db::bids as bid_db;
use crate::db::jobs as job_db;
use crate::error::ApiError;
use crate::lifecycle::Transition;
use crate::lifecycle::bids as bid_lifecycle;
use crate::models::bids::{self, BidStatus, CreateBid, TransitionBid};
use crate::models::jobs;
use crate::validation;

async fn load_job(db: &DatabaseConnection, id: Uuid) -> Result<jobs::Model, ApiError> {
    job_db::get_job_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {id} not found")))
}

async fn load_bid(db: &DatabaseConnection, id: Uuid) -> Result<bids::Model, ApiError> {
    bid_db::get_bid_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bid {id} not found")))
}

/// POST /api/jobs/{id}/bids — submit a bid on an open job.
///
/// The bidder comes from the JWT, never from the body. Job owners cannot
/// bid on their own work, and only artist/studio accounts bid at all.
pub async fn create_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<CreateBid>,
) -> Result<HttpResponse, ApiError> {
    let job_id = path.into_inner();
    let input = body.into_inner();

    let job = load_job(db.get_ref(), job_id).await?;
    if !policy::job_visible_to(&job, Some(&user.0)) {
        return Err(ApiError::NotFound(format!("Job {job_id} not found")));
    }

    let bidder_type = bid_lifecycle::check_bid_creation(&job, user.0.id, user.0.role)?;
    validation::validate_bid(&input)?;

    let bid = bid_db::insert_bid(db.get_ref(), input, &job, user.0.id, bidder_type).await?;
    tracing::info!("bid {} submitted on job {} by {}", bid.id, job.id, user.0.id);

    if let Err(e) = cache.delete(&keys::job_bids(job.id)).await {
        tracing::warn!("cache invalidation failed for job {}: {e}", job.id);
    }

    Ok(HttpResponse::Created().json(bid))
}

/// GET /api/jobs/{id}/bids — the full bid list, owner/admin only.
///
/// Bidders see their own bids through GET /api/bids/mine instead; anyone
/// else gets a permission error rather than an empty list.
pub async fn list_bids_for_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let job_id = path.into_inner();

    let job = load_job(db.get_ref(), job_id).await?;
    policy::ensure_can_list_bids(&job, &user.0)?;

    let key = keys::job_bids(job_id);
    match cache.get::<Vec<bids::Model>>(&key).await {
        Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
        Ok(None) => {}
        Err(e) => tracing::warn!("cache error on {key}: {e}"),
    }

    let bids = bid_db::get_bids_for_job(db.get_ref(), job_id).await?;
    if let Err(e) = cache.set(&key, &bids, Some(60)).await {
        tracing::warn!("cache write failed on {key}: {e}");
    }

    Ok(HttpResponse::Ok().json(bids))
}

/// GET /api/bids/mine — every bid the authenticated user has submitted.
pub async fn my_bids(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let bids = bid_db::get_bids_by_bidder(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(bids))
}

/// GET /api/bids/{id} — a single bid, visible to the job owner, the bidder,
/// or an admin. Reads as absent for anyone else.
pub async fn get_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let bid_id = path.into_inner();

    let bid = load_bid(db.get_ref(), bid_id).await?;
    let job = load_job(db.get_ref(), bid.job_id).await?;

    if !policy::bid_visible_to(&job, bid.bidder_id, &user.0) {
        return Err(ApiError::NotFound(format!("Bid {bid_id} not found")));
    }

    Ok(HttpResponse::Ok().json(bid))
}

/// PUT /api/bids/{id}/status — move a bid through its lifecycle.
///
/// Shortlist/accept/reject belong to the job owner; withdrawal belongs to
/// the bidder. Accepting also awards the parent job, atomically: the
/// response then carries both updated entities. Every other move returns
/// `job: null`.
pub async fn transition_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<TransitionBid>,
) -> Result<HttpResponse, ApiError> {
    let bid_id = path.into_inner();
    let requested = body.into_inner().status;

    let bid = load_bid(db.get_ref(), bid_id).await?;
    let job = load_job(db.get_ref(), bid.job_id).await?;

    if !policy::bid_visible_to(&job, bid.bidder_id, &user.0) {
        return Err(ApiError::NotFound(format!("Bid {bid_id} not found")));
    }

    match bid_lifecycle::check_transition(bid.status, requested)? {
        Transition::NoOp => {
            return Ok(HttpResponse::Ok().json(serde_json::json!({
                "bid": bid,
                "job": null,
            })));
        }
        Transition::Move => {}
    }

    let is_owner = job.created_by == user.0.id || policy::is_admin(&user.0);
    let is_bidder = bid.bidder_id == user.0.id;

    if bid_lifecycle::is_owner_move(requested) {
        if !is_owner {
            return Err(ApiError::Forbidden(
                "only the job's creator can shortlist, accept, or reject bids".to_string(),
            ));
        }
    } else if !is_bidder {
        return Err(ApiError::Forbidden(
            "only the bidder can withdraw a bid".to_string(),
        ));
    }

    if bid_lifecycle::bids_frozen(job.status) {
        return Err(ApiError::Conflict(format!(
            "job is {} and its bids can no longer change status",
            job.status
        )));
    }

    if requested == BidStatus::Accepted {
        if !bid_lifecycle::job_accepts_award(job.status) {
            return Err(ApiError::Conflict(format!(
                "job is {} and can no longer accept a bid",
                job.status
            )));
        }

        let (updated_bid, updated_job) = bid_db::accept_bid(db.get_ref(), &job, &bid).await?;
        tracing::info!(
            "bid {} accepted; job {} awarded to {}",
            updated_bid.id,
            updated_job.id,
            updated_bid.bidder_id
        );

        crate::handlers::jobs::invalidate_job_caches(&cache, job.id).await;
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "bid": updated_bid,
            "job": updated_job,
        })));
    }

    let updated_bid = bid_db::transition_status(db.get_ref(), &bid, requested).await?;

    if let Err(e) = cache.delete(&keys::job_bids(job.id)).await {
        tracing::warn!("cache invalidation failed for job {}: {e}", job.id);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "bid": updated_bid,
        "job": null,
    })))
}
