use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lectern_core::identity::IdentityHeaders;
use lectern_domain::subscription::{SubscriptionStatus, TransactionStatus};

use crate::domain::types::Subscription;
use crate::error::LibraryServiceError;
use crate::handlers::current_user;
use crate::state::AppState;
use crate::usecase::subscription::{CheckoutUseCase, GetSubscriptionUseCase};

#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub status: SubscriptionStatus,
    pub plan_name: String,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms_opt")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms_opt")]
    pub end_date: Option<DateTime<Utc>>,
    pub order_id: Option<String>,
    pub gross_amount: Option<i64>,
    #[serde(serialize_with = "lectern_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            status: s.status,
            plan_name: s.plan_name,
            start_date: s.start_date,
            end_date: s.end_date,
            order_id: s.order_id,
            gross_amount: s.gross_amount,
            updated_at: s.updated_at,
        }
    }
}

// ── GET /users/@me/subscription ──────────────────────────────────────────────

pub async fn get_subscription(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<SubscriptionResponse>, LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = GetSubscriptionUseCase {
        repo: state.subscription_repo(),
    };
    let subscription = uc.execute(user.id).await?;
    Ok(Json(subscription.into()))
}

// ── POST /subscriptions/checkout ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub plan_name: String,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub plan_name: String,
    pub gross_amount: i64,
    pub subscription_status: SubscriptionStatus,
    pub transaction_status: TransactionStatus,
}

pub async fn checkout(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), LibraryServiceError> {
    let user = current_user(&state, &identity).await?;
    let uc = CheckoutUseCase {
        repo: state.subscription_repo(),
        plans: state.plans.clone(),
    };
    let checkout = uc.execute(user.id, &body.plan_name).await?;
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: checkout.transaction.order_id,
            plan_name: checkout.subscription.plan_name,
            gross_amount: checkout.transaction.gross_amount,
            subscription_status: checkout.subscription.status,
            transaction_status: checkout.transaction.status,
        }),
    ))
}
