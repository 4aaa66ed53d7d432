use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `bids` table and its columns.
#[derive(DeriveIden)]
enum Bids {
    Table,
    Id,
    JobId,
    BidderId,
    BidderType,
    AmountTotal,
    Currency,
    Breakdown,
    EstimatedDurationDays,
    StartAvailableFrom,
    Notes,
    IncludedServices,
    Status,
    SubmittedAt,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bids::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bids::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bids::JobId).uuid().not_null())
                    .col(ColumnDef::new(Bids::BidderId).uuid().not_null())
                    .col(ColumnDef::new(Bids::BidderType).string().not_null())
                    .col(ColumnDef::new(Bids::AmountTotal).double().not_null())
                    .col(ColumnDef::new(Bids::Currency).string().not_null())
                    .col(ColumnDef::new(Bids::Breakdown).json_binary())
                    .col(ColumnDef::new(Bids::EstimatedDurationDays).integer())
                    .col(ColumnDef::new(Bids::StartAvailableFrom).date())
                    .col(ColumnDef::new(Bids::Notes).text())
                    .col(
                        ColumnDef::new(Bids::IncludedServices)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bids::Status).string().not_null())
                    .col(
                        ColumnDef::new(Bids::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bids::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bids::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bids::Table).to_owned())
            .await
    }
}
