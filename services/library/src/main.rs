use std::sync::Arc;
use std::time::Duration;

use sea_orm::ConnectOptions;
use tracing::info;

use lectern_core::config::Config;
use lectern_core::tracing::init_tracing;
use lectern_library::config::LibraryConfig;
use lectern_library::router::build_router;
use lectern_library::state::AppState;
use lectern_library::worker::spawn_expiry_sweeper;
use lectern_library_client::LibraryClient;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = LibraryConfig::from_env();
    let plans = config.plans().expect("invalid SUBSCRIPTION_PLANS");

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .sqlx_logging(config.db_sql_logging);
    let client = LibraryClient::connect(options)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        client,
        plans: Arc::new(plans),
        payment_server_key: Arc::from(config.payment_server_key.as_str()),
    };

    spawn_expiry_sweeper(state.clone(), config.expiry_sweep_interval_secs);

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.library_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("library service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
