use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::domain::payment::PaymentNotification;
use crate::error::LibraryServiceError;
use crate::state::AppState;
use crate::usecase::payment::ProcessPaymentUseCase;

/// Notification body as posted by the gateway. Unknown fields are kept in the
/// stored raw payload only.
#[derive(Deserialize)]
pub struct PaymentNotificationRequest {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    pub transaction_status: String,
    pub transaction_id: Option<String>,
    pub payment_type: Option<String>,
    pub transaction_time: Option<String>,
    pub settlement_time: Option<String>,
    pub fraud_status: Option<String>,
}

impl From<PaymentNotificationRequest> for PaymentNotification {
    fn from(r: PaymentNotificationRequest) -> Self {
        Self {
            order_id: r.order_id,
            status_code: r.status_code,
            gross_amount: r.gross_amount,
            signature_key: r.signature_key,
            transaction_status: r.transaction_status,
            transaction_id: r.transaction_id,
            payment_type: r.payment_type,
            transaction_time: r.transaction_time,
            settlement_time: r.settlement_time,
            fraud_status: r.fraud_status,
        }
    }
}

#[derive(Serialize)]
pub struct PaymentNotificationResponse {
    pub status: &'static str,
}

// ── POST /payments/notifications ─────────────────────────────────────────────

pub async fn receive_notification(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<PaymentNotificationResponse>, LibraryServiceError> {
    let request: PaymentNotificationRequest = serde_json::from_value(payload.clone())
        .map_err(|e| {
            tracing::debug!(error = %e, "malformed payment notification");
            LibraryServiceError::MissingData
        })?;
    let uc = ProcessPaymentUseCase {
        repo: state.payment_repo(),
        plans: state.plans.clone(),
        server_key: state.payment_server_key.clone(),
    };
    let outcome = uc.execute(request.into(), payload).await?;
    Ok(Json(PaymentNotificationResponse {
        status: outcome.as_str(),
    }))
}
