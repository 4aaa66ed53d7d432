use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `jobs` table and its columns.
#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    Title,
    Description,
    MovieRef,
    AssignmentMode,
    AssignedTo,
    PaymentType,
    Currency,
    MinBudget,
    MaxBudget,
    TotalShots,
    TotalFrames,
    Resolution,
    FrameRate,
    ShotBreakdown,
    RequiredSkills,
    SoftwarePreferences,
    Deliverables,
    BidDeadline,
    ExpectedStartDate,
    FinalDeliveryDate,
    NotesForBidders,
    Status,
    CreatedBy,
    ViewCount,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::Title).string().not_null())
                    .col(ColumnDef::new(Jobs::Description).text().not_null())
                    .col(ColumnDef::new(Jobs::MovieRef).string())
                    .col(ColumnDef::new(Jobs::AssignmentMode).string().not_null())
                    .col(ColumnDef::new(Jobs::AssignedTo).json_binary().not_null())
                    .col(ColumnDef::new(Jobs::PaymentType).string().not_null())
                    .col(ColumnDef::new(Jobs::Currency).string().not_null())
                    .col(ColumnDef::new(Jobs::MinBudget).double())
                    .col(ColumnDef::new(Jobs::MaxBudget).double())
                    .col(ColumnDef::new(Jobs::TotalShots).integer())
                    .col(ColumnDef::new(Jobs::TotalFrames).integer())
                    .col(ColumnDef::new(Jobs::Resolution).string())
                    .col(ColumnDef::new(Jobs::FrameRate).string())
                    .col(ColumnDef::new(Jobs::ShotBreakdown).json_binary().not_null())
                    .col(
                        ColumnDef::new(Jobs::RequiredSkills)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Jobs::SoftwarePreferences)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Jobs::Deliverables).json_binary().not_null())
                    .col(ColumnDef::new(Jobs::BidDeadline).timestamp_with_time_zone())
                    .col(ColumnDef::new(Jobs::ExpectedStartDate).date())
                    .col(ColumnDef::new(Jobs::FinalDeliveryDate).date().not_null())
                    .col(ColumnDef::new(Jobs::NotesForBidders).text())
                    .col(ColumnDef::new(Jobs::Status).string().not_null())
                    .col(ColumnDef::new(Jobs::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Jobs::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Jobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}
