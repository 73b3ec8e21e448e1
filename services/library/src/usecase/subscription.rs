use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::SubscriptionRepository;
use crate::domain::types::{Checkout, PlanCatalog, Subscription};
use crate::error::LibraryServiceError;

/// Order ids sent to the payment gateway: `SUB-` and a simple-format UUIDv7.
pub fn new_order_id() -> String {
    format!("SUB-{}", Uuid::now_v7().simple())
}

// ── GetSubscription ──────────────────────────────────────────────────────────

pub struct GetSubscriptionUseCase<S: SubscriptionRepository> {
    pub repo: S,
}

impl<S: SubscriptionRepository> GetSubscriptionUseCase<S> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Subscription, LibraryServiceError> {
        self.repo
            .find_by_user(user_id)
            .await?
            .ok_or(LibraryServiceError::SubscriptionNotFound)
    }
}

// ── Checkout ─────────────────────────────────────────────────────────────────

pub struct CheckoutUseCase<S: SubscriptionRepository> {
    pub repo: S,
    pub plans: Arc<PlanCatalog>,
}

impl<S: SubscriptionRepository> CheckoutUseCase<S> {
    /// A pending checkout may be replaced; a running subscription may not.
    pub async fn execute(
        &self,
        user_id: Uuid,
        plan_name: &str,
    ) -> Result<Checkout, LibraryServiceError> {
        let plan = self
            .plans
            .get(plan_name)
            .ok_or(LibraryServiceError::UnknownPlan)?;
        let now = Utc::now();
        let order_id = new_order_id();
        let checkout = self
            .repo
            .checkout(user_id, &plan.name, &order_id, plan.amount, now)
            .await?;
        tracing::info!(%user_id, %order_id, plan = %plan.name, "checkout started");
        Ok(checkout)
    }
}

// ── ExpireSubscriptions ──────────────────────────────────────────────────────

pub struct ExpireSubscriptionsUseCase<S: SubscriptionRepository> {
    pub repo: S,
}

impl<S: SubscriptionRepository> ExpireSubscriptionsUseCase<S> {
    pub async fn execute(&self) -> Result<u64, LibraryServiceError> {
        let expired = self.repo.expire_overdue(Utc::now()).await?;
        if expired > 0 {
            tracing::info!(expired, "expired overdue subscriptions");
        }
        Ok(expired)
    }
}
