use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminEvents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdminEvents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AdminEvents::Type).string().not_null())
                    .col(ColumnDef::new(AdminEvents::Title).string().not_null())
                    .col(ColumnDef::new(AdminEvents::Description).text())
                    .col(ColumnDef::new(AdminEvents::Metadata).json_binary())
                    .col(
                        ColumnDef::new(AdminEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminEvents {
    Table,
    Id,
    Type,
    Title,
    Description,
    Metadata,
    CreatedAt,
}
