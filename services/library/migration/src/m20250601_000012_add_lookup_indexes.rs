use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Ebooks::Table)
                    .col(Ebooks::CategoryId)
                    .name("idx_ebooks_category_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Ebooks::Table)
                    .col(Ebooks::IsActive)
                    .col(Ebooks::Priority)
                    .name("idx_ebooks_is_active_priority")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Annotations::Table)
                    .col(Annotations::UserId)
                    .col(Annotations::EbookId)
                    .name("idx_annotations_user_id_ebook_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Transactions::Table)
                    .col(Transactions::SubscriptionId)
                    .name("idx_transactions_subscription_id")
                    .to_owned(),
            )
            .await?;
        // Expiry sweep scans active subscriptions by end date.
        manager
            .create_index(
                Index::create()
                    .table(Subscriptions::Table)
                    .col(Subscriptions::Status)
                    .col(Subscriptions::EndDate)
                    .name("idx_subscriptions_status_end_date")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(AdminEvents::Table)
                    .col(AdminEvents::CreatedAt)
                    .name("idx_admin_events_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_admin_events_created_at",
            "idx_subscriptions_status_end_date",
            "idx_transactions_subscription_id",
            "idx_annotations_user_id_ebook_id",
            "idx_ebooks_is_active_priority",
            "idx_ebooks_category_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Ebooks {
    Table,
    CategoryId,
    IsActive,
    Priority,
}

#[derive(Iden)]
enum Annotations {
    Table,
    UserId,
    EbookId,
}

#[derive(Iden)]
enum Transactions {
    Table,
    SubscriptionId,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Status,
    EndDate,
}

#[derive(Iden)]
enum AdminEvents {
    Table,
    CreatedAt,
}
