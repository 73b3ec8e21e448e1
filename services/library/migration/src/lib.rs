use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_subscriptions;
mod m20250601_000003_create_transactions;
mod m20250601_000004_create_categories;
mod m20250601_000005_create_ebooks;
mod m20250601_000006_create_banners;
mod m20250601_000007_create_reading_logs;
mod m20250601_000008_create_admin_events;
mod m20250601_000009_create_reading_progress;
mod m20250601_000010_create_annotations;
mod m20250601_000011_create_readlists;
mod m20250601_000012_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_subscriptions::Migration),
            Box::new(m20250601_000003_create_transactions::Migration),
            Box::new(m20250601_000004_create_categories::Migration),
            Box::new(m20250601_000005_create_ebooks::Migration),
            Box::new(m20250601_000006_create_banners::Migration),
            Box::new(m20250601_000007_create_reading_logs::Migration),
            Box::new(m20250601_000008_create_admin_events::Migration),
            Box::new(m20250601_000009_create_reading_progress::Migration),
            Box::new(m20250601_000010_create_annotations::Migration),
            Box::new(m20250601_000011_create_readlists::Migration),
            Box::new(m20250601_000012_add_lookup_indexes::Migration),
        ]
    }
}
