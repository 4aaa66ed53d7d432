use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::StringList;

/// Job lifecycle status stored as a lowercase string in the database.
/// The legal moves between these states live in `crate::lifecycle::jobs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    #[sea_orm(string_value = "awarded")]
    Awarded,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Open => "open",
            JobStatus::UnderReview => "under_review",
            JobStatus::Awarded => "awarded",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a job is filled by open bidding or by pre-selected assignees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    #[sea_orm(string_value = "direct")]
    Direct,
    #[sea_orm(string_value = "open")]
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[sea_orm(string_value = "fixed")]
    Fixed,
    #[sea_orm(string_value = "per_shot")]
    PerShot,
    #[sea_orm(string_value = "per_frame")]
    PerFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// One line of a job's shot breakdown, stored inside a JSONB column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotLine {
    pub name: String,
    pub shot_code: Option<String>,
    pub frame_in: Option<i32>,
    pub frame_out: Option<i32>,
    pub complexity: Complexity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ShotBreakdown(pub Vec<ShotLine>);

/// Assignee ids stored in a single JSONB column. Empty unless the job
/// uses direct assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct UserIdList(pub Vec<Uuid>);

impl UserIdList {
    pub fn contains(&self, id: Uuid) -> bool {
        self.0.contains(&id)
    }
}

/// SeaORM entity for the `jobs` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub movie_ref: Option<String>,
    pub assignment_mode: AssignmentMode,
    #[sea_orm(column_type = "JsonBinary")]
    pub assigned_to: UserIdList,
    pub payment_type: PaymentType,
    pub currency: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub min_budget: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub max_budget: Option<f64>,
    pub total_shots: Option<i32>,
    pub total_frames: Option<i32>,
    pub resolution: Option<String>,
    pub frame_rate: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub shot_breakdown: ShotBreakdown,
    #[sea_orm(column_type = "JsonBinary")]
    pub required_skills: StringList,
    #[sea_orm(column_type = "JsonBinary")]
    pub software_preferences: StringList,
    #[sea_orm(column_type = "JsonBinary")]
    pub deliverables: StringList,
    pub bid_deadline: Option<DateTimeUtc>,
    pub expected_start_date: Option<Date>,
    pub final_delivery_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes_for_bidders: Option<String>,
    pub status: JobStatus,
    pub created_by: Uuid,
    pub view_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// The `assigned_to` field has shipped in two shapes (a single id, then an
/// id array). Both deserialize here and normalize into one deduped list
/// before any business logic sees them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AssignedTo {
    One(Uuid),
    Many(Vec<Uuid>),
}

impl AssignedTo {
    pub fn into_ids(self) -> Vec<Uuid> {
        let mut ids = match self {
            AssignedTo::One(id) => vec![id],
            AssignedTo::Many(ids) => ids,
        };
        ids.sort();
        ids.dedup();
        ids
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub title: String,
    pub description: String,
    pub movie_ref: Option<String>,
    pub assignment_mode: AssignmentMode,
    pub assigned_to: Option<AssignedTo>,
    pub payment_type: PaymentType,
    pub currency: String,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub total_shots: Option<i32>,
    pub total_frames: Option<i32>,
    pub resolution: Option<String>,
    pub frame_rate: Option<String>,
    #[serde(default)]
    pub shot_breakdown: Vec<ShotLine>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub software_preferences: Vec<String>,
    #[serde(default)]
    pub deliverables: Vec<String>,
    pub bid_deadline: Option<DateTimeUtc>,
    pub expected_start_date: Option<Date>,
    pub final_delivery_date: Date,
    pub notes_for_bidders: Option<String>,
}

/// Owner field edits. Status is never set here — that goes through the
/// `/status` route and the transition table.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub movie_ref: Option<String>,
    pub assigned_to: Option<AssignedTo>,
    pub payment_type: Option<PaymentType>,
    pub currency: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub total_shots: Option<i32>,
    pub total_frames: Option<i32>,
    pub resolution: Option<String>,
    pub frame_rate: Option<String>,
    pub shot_breakdown: Option<Vec<ShotLine>>,
    pub required_skills: Option<Vec<String>>,
    pub software_preferences: Option<Vec<String>>,
    pub deliverables: Option<Vec<String>>,
    pub bid_deadline: Option<DateTimeUtc>,
    pub expected_start_date: Option<Date>,
    pub final_delivery_date: Option<Date>,
    pub notes_for_bidders: Option<String>,
}

/// Request body for PUT /api/jobs/{id}/status.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionJob {
    pub status: JobStatus,
}

/// Query params for GET /api/jobs. Absent or empty values never constrain
/// the result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilters {
    pub status: Option<JobStatus>,
    pub assignment_mode: Option<AssignmentMode>,
    pub payment_type: Option<PaymentType>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub skill: Option<String>,
    pub software: Option<String>,
    pub movie_ref: Option<String>,
    pub mine: Option<bool>,
    pub assigned_to_me: Option<bool>,
    pub limit: Option<u64>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl JobFilters {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }

    pub fn skill_term(&self) -> Option<&str> {
        non_empty(&self.skill)
    }

    pub fn software_term(&self) -> Option<&str> {
        non_empty(&self.software)
    }

    pub fn movie_ref_term(&self) -> Option<&str> {
        non_empty(&self.movie_ref)
    }

    /// Predicates over list-valued columns, applied after the database
    /// fetch. Scalar filters go into the SQL query in `db::jobs`.
    pub fn matches_lists(&self, job: &Model) -> bool {
        if let Some(term) = self.skill_term() {
            if !job.required_skills.contains_term(term) {
                return false;
            }
        }
        if let Some(term) = self.software_term() {
            if !job.software_preferences.contains_term(term) {
                return false;
            }
        }
        true
    }
}
