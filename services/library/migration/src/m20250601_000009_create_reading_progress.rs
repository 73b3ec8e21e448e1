use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReadingProgress::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ReadingProgress::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ReadingProgress::UserId).uuid().not_null())
                    .col(ColumnDef::new(ReadingProgress::EbookId).uuid().not_null())
                    .col(ColumnDef::new(ReadingProgress::CurrentLocation).text())
                    .col(ColumnDef::new(ReadingProgress::Progress).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(ReadingProgress::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ReadingProgress::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReadingProgress::Table, ReadingProgress::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ReadingProgress::Table, ReadingProgress::EbookId)
                            .to(Ebooks::Table, Ebooks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ReadingProgress::Table)
                    .col(ReadingProgress::UserId)
                    .col(ReadingProgress::EbookId)
                    .name("uq_reading_progress_user_id_ebook_id")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReadingProgress::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReadingProgress {
    Table,
    Id,
    UserId,
    EbookId,
    CurrentLocation,
    Progress,
    CreatedAt,
    UpdatedAt,
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
