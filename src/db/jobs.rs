use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::StringList;
use crate::models::jobs::{
    self, AssignmentMode, CreateJob, JobFilters, JobStatus, ShotBreakdown, UpdateJob, UserIdList,
};

/// Insert a new job in `draft` status.
pub async fn insert_job(
    db: &DatabaseConnection,
    input: CreateJob,
    created_by: Uuid,
) -> Result<jobs::Model, DbErr> {
    let now = chrono::Utc::now();
    let assigned_to = match input.assignment_mode {
        AssignmentMode::Direct => UserIdList(
            input
                .assigned_to
                .map(|a| a.into_ids())
                .unwrap_or_default(),
        ),
        // assigned_to is meaningless for open bidding; never store it.
        AssignmentMode::Open => UserIdList::default(),
    };

    let new_job = jobs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        movie_ref: Set(input.movie_ref),
        assignment_mode: Set(input.assignment_mode),
        assigned_to: Set(assigned_to),
        payment_type: Set(input.payment_type),
        currency: Set(input.currency),
        min_budget: Set(input.min_budget),
        max_budget: Set(input.max_budget),
        total_shots: Set(input.total_shots),
        total_frames: Set(input.total_frames),
        resolution: Set(input.resolution),
        frame_rate: Set(input.frame_rate),
        shot_breakdown: Set(ShotBreakdown(input.shot_breakdown)),
        required_skills: Set(StringList(input.required_skills)),
        software_preferences: Set(StringList(input.software_preferences)),
        deliverables: Set(StringList(input.deliverables)),
        bid_deadline: Set(input.bid_deadline),
        expected_start_date: Set(input.expected_start_date),
        final_delivery_date: Set(input.final_delivery_date),
        notes_for_bidders: Set(input.notes_for_bidders),
        status: Set(JobStatus::Draft),
        created_by: Set(created_by),
        view_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    new_job.insert(db).await
}

/// Fetch a single job by ID.
pub async fn get_job_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<jobs::Model>, DbErr> {
    jobs::Entity::find_by_id(id).one(db).await
}

/// Batch size for scanning listing pages.
const SCAN_PAGE_SIZE: u64 = 200;
/// Upper bound on rows examined for one listing request, so a filter that
/// matches nothing cannot walk the whole table.
const SCAN_CAP: u64 = 2_000;

/// Fetch jobs matching the scalar filters, keeping only rows that pass
/// `keep` (viewer visibility plus the filters over list-valued JSONB
/// columns). The page limit applies to the kept set, so hidden or
/// non-matching rows never eat into the page. `open_only` narrows the query
/// itself for anonymous callers, whose visible set is exactly the open jobs.
pub async fn find_jobs(
    db: &DatabaseConnection,
    filters: &JobFilters,
    caller: Option<Uuid>,
    open_only: bool,
    keep: impl Fn(&jobs::Model) -> bool,
) -> Result<Vec<jobs::Model>, DbErr> {
    let mut condition = Condition::all();

    if let Some(status) = filters.status {
        condition = condition.add(jobs::Column::Status.eq(status));
    }
    if let Some(mode) = filters.assignment_mode {
        condition = condition.add(jobs::Column::AssignmentMode.eq(mode));
    }
    if let Some(payment_type) = filters.payment_type {
        condition = condition.add(jobs::Column::PaymentType.eq(payment_type));
    }
    if let Some(min) = filters.budget_min {
        condition = condition.add(jobs::Column::MinBudget.gte(min));
    }
    if let Some(max) = filters.budget_max {
        condition = condition.add(jobs::Column::MaxBudget.lte(max));
    }
    if let Some(movie_ref) = filters.movie_ref_term() {
        condition = condition.add(jobs::Column::MovieRef.eq(movie_ref));
    }
    if filters.mine == Some(true) {
        if let Some(id) = caller {
            condition = condition.add(jobs::Column::CreatedBy.eq(id));
        }
    }
    if open_only {
        condition = condition.add(jobs::Column::Status.eq(JobStatus::Open));
    }

    let limit = filters.limit() as usize;
    let mut pages = jobs::Entity::find()
        .filter(condition)
        .order_by_desc(jobs::Column::CreatedAt)
        .order_by_asc(jobs::Column::Id)
        .paginate(db, SCAN_PAGE_SIZE);

    let mut kept = Vec::new();
    let mut scanned = 0u64;
    while let Some(batch) = pages.fetch_and_next().await? {
        scanned += batch.len() as u64;
        for job in batch {
            if keep(&job) {
                kept.push(job);
                if kept.len() >= limit {
                    return Ok(kept);
                }
            }
        }
        if scanned >= SCAN_CAP {
            break;
        }
    }

    Ok(kept)
}

/// Apply an owner's field edits.
pub async fn update_job(
    db: &DatabaseConnection,
    job: jobs::Model,
    input: UpdateJob,
) -> Result<jobs::Model, DbErr> {
    let mut active: jobs::ActiveModel = job.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(movie_ref) = input.movie_ref {
        active.movie_ref = Set(Some(movie_ref));
    }
    if let Some(assigned_to) = input.assigned_to {
        active.assigned_to = Set(UserIdList(assigned_to.into_ids()));
    }
    if let Some(payment_type) = input.payment_type {
        active.payment_type = Set(payment_type);
    }
    if let Some(currency) = input.currency {
        active.currency = Set(currency);
    }
    if let Some(min_budget) = input.min_budget {
        active.min_budget = Set(Some(min_budget));
    }
    if let Some(max_budget) = input.max_budget {
        active.max_budget = Set(Some(max_budget));
    }
    if let Some(total_shots) = input.total_shots {
        active.total_shots = Set(Some(total_shots));
    }
    if let Some(total_frames) = input.total_frames {
        active.total_frames = Set(Some(total_frames));
    }
    if let Some(resolution) = input.resolution {
        active.resolution = Set(Some(resolution));
    }
    if let Some(frame_rate) = input.frame_rate {
        active.frame_rate = Set(Some(frame_rate));
    }
    if let Some(shot_breakdown) = input.shot_breakdown {
        active.shot_breakdown = Set(ShotBreakdown(shot_breakdown));
    }
    if let Some(required_skills) = input.required_skills {
        active.required_skills = Set(StringList(required_skills));
    }
    if let Some(software_preferences) = input.software_preferences {
        active.software_preferences = Set(StringList(software_preferences));
    }
    if let Some(deliverables) = input.deliverables {
        active.deliverables = Set(StringList(deliverables));
    }
    if let Some(bid_deadline) = input.bid_deadline {
        active.bid_deadline = Set(Some(bid_deadline));
    }
    if let Some(expected_start_date) = input.expected_start_date {
        active.expected_start_date = Set(Some(expected_start_date));
    }
    if let Some(final_delivery_date) = input.final_delivery_date {
        active.final_delivery_date = Set(final_delivery_date);
    }
    if let Some(notes_for_bidders) = input.notes_for_bidders {
        active.notes_for_bidders = Set(Some(notes_for_bidders));
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Move a job to a new status with an optimistic guard on the status the
/// caller saw. A concurrent transition makes the guard miss and the call
/// fails with `Conflict` instead of silently overwriting.
pub async fn transition_status(
    db: &DatabaseConnection,
    job: &jobs::Model,
    new_status: JobStatus,
) -> Result<jobs::Model, ApiError> {
    let result = jobs::Entity::update_many()
        .col_expr(jobs::Column::Status, Expr::value(new_status))
        .col_expr(jobs::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(jobs::Column::Id.eq(job.id))
        .filter(jobs::Column::Status.eq(job.status))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::Conflict(
            "the job changed while this request was in flight; reload and retry".to_string(),
        ));
    }

    get_job_by_id(db, job.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job.id)))
}

/// Bump the display view counter. Fire-and-forget: callers log failures and
/// never fail the read over it.
pub async fn increment_view_count(db: &DatabaseConnection, id: Uuid) -> Result<(), DbErr> {
    jobs::Entity::update_many()
        .col_expr(
            jobs::Column::ViewCount,
            Expr::col(jobs::Column::ViewCount).add(1),
        )
        .filter(jobs::Column::Id.eq(id))
        .exec(db)
        .await
        .map(|_| ())
}
