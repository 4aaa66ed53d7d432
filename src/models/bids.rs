use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::StringList;

/// Bid lifecycle status stored as a lowercase string in the database.
/// Legal moves live in `crate::lifecycle::bids`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "shortlisted")]
    Shortlisted,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Shortlisted => "shortlisted",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
            BidStatus::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum BidderType {
    #[sea_orm(string_value = "artist")]
    Artist,
    #[sea_orm(string_value = "studio")]
    Studio,
}

/// One line of a bid's price breakdown, stored inside a JSONB column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct BidBreakdown(pub Vec<BreakdownLine>);

/// SeaORM entity for the `bids` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub bidder_id: Uuid,
    pub bidder_type: BidderType,
    #[sea_orm(column_type = "Double")]
    pub amount_total: f64,
    pub currency: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub breakdown: Option<BidBreakdown>,
    pub estimated_duration_days: Option<i32>,
    pub start_available_from: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub included_services: StringList,
    pub status: BidStatus,
    pub submitted_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::BidderId",
        to = "super::users::Column::Id"
    )]
    Bidder,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bidder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/jobs/{id}/bids. The job id comes from the
/// path and the bidder from the JWT, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBid {
    pub amount_total: f64,
    pub currency: String,
    pub breakdown: Option<Vec<BreakdownLine>>,
    pub estimated_duration_days: Option<i32>,
    pub start_available_from: Option<Date>,
    pub notes: Option<String>,
    #[serde(default)]
    pub included_services: Vec<String>,
}

/// Request body for PUT /api/bids/{id}/status.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionBid {
    pub status: BidStatus,
}
