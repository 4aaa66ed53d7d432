use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::StringList;
use crate::models::bids::{self, BidBreakdown, BidStatus, BidderType, CreateBid};
use crate::models::jobs::{self, JobStatus};

/// Insert a new bid in `pending` status.
///
/// The handler's gate ran against a snapshot of the job, so the job's status
/// is re-read inside the transaction under a shared row lock. A concurrent
/// accept or cancel then either committed before this check (and the bid is
/// refused) or has to wait until the bid is committed while the job was
/// still open. No bid can land on a job that already left `open`.
pub async fn insert_bid(
    db: &DatabaseConnection,
    input: CreateBid,
    job: &jobs::Model,
    bidder_id: Uuid,
    bidder_type: BidderType,
) -> Result<bids::Model, ApiError> {
    let txn = db.begin().await.map_err(ApiError::Db)?;

    let current = jobs::Entity::find_by_id(job.id)
        .lock_shared()
        .one(&txn)
        .await
        .map_err(ApiError::Db)?
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job.id)))?;
    if current.status != JobStatus::Open {
        txn.rollback().await.map_err(ApiError::Db)?;
        return Err(ApiError::Conflict(format!(
            "job is {} and no longer taking bids",
            current.status
        )));
    }

    let now = chrono::Utc::now();
    let new_bid = bids::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_id: Set(job.id),
        bidder_id: Set(bidder_id),
        bidder_type: Set(bidder_type),
        amount_total: Set(input.amount_total),
        currency: Set(input.currency),
        breakdown: Set(input.breakdown.map(BidBreakdown)),
        estimated_duration_days: Set(input.estimated_duration_days),
        start_available_from: Set(input.start_available_from),
        notes: Set(input.notes),
        included_services: Set(StringList(input.included_services)),
        status: Set(BidStatus::Pending),
        submitted_at: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let bid = new_bid.insert(&txn).await.map_err(ApiError::Db)?;
    txn.commit().await.map_err(ApiError::Db)?;
    Ok(bid)
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Fetch all bids on a job, newest first.
pub async fn get_bids_for_job(
    db: &DatabaseConnection,
    job_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::JobId.eq(job_id))
        .order_by_desc(bids::Column::SubmittedAt)
        .all(db)
        .await
}

/// Fetch all bids submitted by a user, newest first.
pub async fn get_bids_by_bidder(
    db: &DatabaseConnection,
    bidder_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::BidderId.eq(bidder_id))
        .order_by_desc(bids::Column::SubmittedAt)
        .all(db)
        .await
}

/// Find the accepted bid on a job, if one exists.
pub async fn find_accepted_bid(
    db: &DatabaseConnection,
    job_id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::JobId.eq(job_id))
        .filter(bids::Column::Status.eq(BidStatus::Accepted))
        .one(db)
        .await
}

/// Move a bid to a new status with an optimistic guard on the status the
/// caller saw.
pub async fn transition_status(
    db: &DatabaseConnection,
    bid: &bids::Model,
    new_status: BidStatus,
) -> Result<bids::Model, ApiError> {
    let result = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(new_status))
        .col_expr(bids::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(bids::Column::Id.eq(bid.id))
        .filter(bids::Column::Status.eq(bid.status))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::Conflict(
            "the bid changed while this request was in flight; reload and retry".to_string(),
        ));
    }

    get_bid_by_id(db, bid.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bid {} not found", bid.id)))
}

/// Accept a bid and award its job as one transaction.
///
/// Both status guards are re-checked inside the transaction: the job row
/// only flips to `awarded` if it still holds the status the caller saw, and
/// the bid only flips to `accepted` from the status the caller saw. If a
/// concurrent accept got there first, the guard misses, the transaction
/// rolls back, and the loser gets `Conflict`. Either both rows change or
/// neither does.
pub async fn accept_bid(
    db: &DatabaseConnection,
    job: &jobs::Model,
    bid: &bids::Model,
) -> Result<(bids::Model, jobs::Model), ApiError> {
    let txn = db.begin().await.map_err(ApiError::Db)?;
    let now = chrono::Utc::now();

    let job_update = jobs::Entity::update_many()
        .col_expr(jobs::Column::Status, Expr::value(JobStatus::Awarded))
        .col_expr(jobs::Column::UpdatedAt, Expr::value(now))
        .filter(jobs::Column::Id.eq(job.id))
        .filter(jobs::Column::Status.eq(job.status))
        .exec(&txn)
        .await
        .map_err(ApiError::Db)?;

    if job_update.rows_affected == 0 {
        txn.rollback().await.map_err(ApiError::Db)?;
        return Err(ApiError::Conflict(
            "the job was awarded or moved by a concurrent request".to_string(),
        ));
    }

    let bid_update = bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(BidStatus::Accepted))
        .col_expr(bids::Column::UpdatedAt, Expr::value(now))
        .filter(bids::Column::Id.eq(bid.id))
        .filter(bids::Column::Status.eq(bid.status))
        .exec(&txn)
        .await
        .map_err(ApiError::Db)?;

    if bid_update.rows_affected == 0 {
        txn.rollback().await.map_err(ApiError::Db)?;
        return Err(ApiError::Conflict(
            "the bid changed while this request was in flight; reload and retry".to_string(),
        ));
    }

    let updated_bid = bids::Entity::find_by_id(bid.id)
        .one(&txn)
        .await
        .map_err(ApiError::Db)?
        .ok_or_else(|| ApiError::NotFound(format!("Bid {} not found", bid.id)))?;
    let updated_job = jobs::Entity::find_by_id(job.id)
        .one(&txn)
        .await
        .map_err(ApiError::Db)?
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job.id)))?;

    txn.commit().await.map_err(ApiError::Db)?;

    Ok((updated_bid, updated_job))
}
