use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Status,
    CreatedBy,
}

#[derive(DeriveIden)]
enum Bids {
    Table,
    JobId,
    BidderId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on jobs.status for the public open-jobs listing
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_status")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .to_owned(),
            )
            .await?;

        // Index on jobs.created_by for "my jobs" queries
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_created_by")
                    .table(Jobs::Table)
                    .col(Jobs::CreatedBy)
                    .to_owned(),
            )
            .await?;

        // Index on bids.job_id for fetching a job's bids
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_job_id")
                    .table(Bids::Table)
                    .col(Bids::JobId)
                    .to_owned(),
            )
            .await?;

        // Index on bids.bidder_id for the "my bids" listing
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_bidder_id")
                    .table(Bids::Table)
                    .col(Bids::BidderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_jobs_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_jobs_created_by").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bids_job_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bids_bidder_id").to_owned())
            .await?;

        Ok(())
    }
}
