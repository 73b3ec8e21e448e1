use sea_orm_migration::prelude::*;

use lectern_library_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
