use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subscriptions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Subscriptions::UserId).uuid().not_null().unique_key())
                    .col(
                        ColumnDef::new(Subscriptions::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Subscriptions::PlanName).string().not_null())
                    .col(ColumnDef::new(Subscriptions::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Subscriptions::EndDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Subscriptions::OrderId).string())
                    .col(ColumnDef::new(Subscriptions::TransactionId).string())
                    .col(ColumnDef::new(Subscriptions::GrossAmount).big_integer())
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subscriptions::Table, Subscriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    Status,
    PlanName,
    StartDate,
    EndDate,
    OrderId,
    TransactionId,
    GrossAmount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
