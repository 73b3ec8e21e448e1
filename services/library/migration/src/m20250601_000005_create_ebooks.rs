use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ebooks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ebooks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ebooks::Title).string().not_null())
                    .col(ColumnDef::new(Ebooks::Author).string().not_null())
                    .col(ColumnDef::new(Ebooks::Description).text())
                    .col(ColumnDef::new(Ebooks::CoverUrl).text())
                    .col(ColumnDef::new(Ebooks::PdfUrl).text())
                    .col(ColumnDef::new(Ebooks::PublicId).string())
                    .col(ColumnDef::new(Ebooks::Category).string().not_null())
                    .col(ColumnDef::new(Ebooks::CategoryId).uuid())
                    .col(ColumnDef::new(Ebooks::IsPremium).boolean().not_null().default(false))
                    .col(ColumnDef::new(Ebooks::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Ebooks::Priority).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Ebooks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Ebooks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Ebooks::Table, Ebooks::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ebooks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Ebooks {
    Table,
    Id,
    Title,
    Author,
    Description,
    CoverUrl,
    PdfUrl,
    PublicId,
    Category,
    CategoryId,
    IsPremium,
    IsActive,
    Priority,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}
