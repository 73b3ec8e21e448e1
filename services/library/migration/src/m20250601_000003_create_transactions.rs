use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transactions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Transactions::SubscriptionId).uuid().not_null())
                    .col(ColumnDef::new(Transactions::OrderId).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Transactions::TransactionStatus)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Transactions::GrossAmount).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::PaymentType).string())
                    .col(ColumnDef::new(Transactions::TransactionTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Transactions::SettlementTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Transactions::WebhookPayload).json_binary())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Transactions::Table, Transactions::SubscriptionId)
                            .to(Subscriptions::Table, Subscriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    SubscriptionId,
    OrderId,
    TransactionStatus,
    GrossAmount,
    PaymentType,
    TransactionTime,
    SettlementTime,
    WebhookPayload,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
}
