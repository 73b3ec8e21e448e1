use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Annotations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Annotations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Annotations::UserId).uuid().not_null())
                    .col(ColumnDef::new(Annotations::EbookId).uuid().not_null())
                    .col(ColumnDef::new(Annotations::CfiRange).text().not_null())
                    .col(ColumnDef::new(Annotations::Text).text().not_null())
                    .col(ColumnDef::new(Annotations::Type).string().not_null())
                    .col(ColumnDef::new(Annotations::Color).string())
                    .col(
                        ColumnDef::new(Annotations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Annotations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Annotations::Table, Annotations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Annotations::Table, Annotations::EbookId)
                            .to(Ebooks::Table, Ebooks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Annotations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Annotations {
    Table,
    Id,
    UserId,
    EbookId,
    CfiRange,
    Text,
    Type,
    Color,
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
