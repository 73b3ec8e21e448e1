use std::time::Duration;

use crate::state::AppState;
use crate::usecase::subscription::ExpireSubscriptionsUseCase;

/// Periodically flip overdue ACTIVE subscriptions to EXPIRED.
///
/// Does nothing when `interval_secs` is 0. The first sweep runs one interval
/// after startup.
pub fn spawn_expiry_sweeper(state: AppState, interval_secs: u64) {
    if interval_secs == 0 {
        tracing::info!("subscription expiry sweeper disabled");
        return;
    }
    let period = Duration::from_secs(interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            tracing::debug!("running subscription expiry sweep");
            let uc = ExpireSubscriptionsUseCase {
                repo: state.subscription_repo(),
            };
            if let Err(e) = uc.execute().await {
                tracing::warn!(error = %e, "subscription expiry sweep failed");
            }
        }
    });
}
