use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReadingLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ReadingLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ReadingLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(ReadingLogs::EbookId).uuid().not_null())
                    .col(
                        ColumnDef::new(ReadingLogs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ReadingLogs::LastReadAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReadingLogs::Table, ReadingLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReadingLogs::Table, ReadingLogs::EbookId)
                            .to(Ebooks::Table, Ebooks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ReadingLogs::Table)
                    .col(ReadingLogs::UserId)
                    .col(ReadingLogs::EbookId)
                    .name("uq_reading_logs_user_id_ebook_id")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReadingLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReadingLogs {
    Table,
    Id,
    UserId,
    EbookId,
    StartedAt,
    LastReadAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Ebooks {
    Table,
    Id,
}
