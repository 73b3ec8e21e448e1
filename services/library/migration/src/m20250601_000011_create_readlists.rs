use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Readlists::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Readlists::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Readlists::UserId).uuid().not_null())
                    .col(ColumnDef::new(Readlists::EbookId).uuid().not_null())
                    .col(
                        ColumnDef::new(Readlists::Status)
                            .string_len(16)
                            .not_null()
                            .default("WANT_TO_READ"),
                    )
                    .col(
                        ColumnDef::new(Readlists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Readlists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Readlists::Table, Readlists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Readlists::Table, Readlists::EbookId)
                            .to(Ebooks::Table, Ebooks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Readlists::Table)
                    .col(Readlists::UserId)
                    .col(Readlists::EbookId)
                    .name("uq_readlists_user_id_ebook_id")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Readlists::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Readlists {
    Table,
    Id,
    UserId,
    EbookId,
    Status,
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
