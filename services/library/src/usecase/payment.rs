use std::sync::Arc;

use chrono::Utc;

use crate::domain::payment::{PaymentNotification, TransactionUpdate, verify_signature};
use crate::domain::repository::PaymentRepository;
use crate::domain::types::{PaymentOutcome, PlanCatalog};
use crate::error::LibraryServiceError;

pub struct ProcessPaymentUseCase<P: PaymentRepository> {
    pub repo: P,
    pub plans: Arc<PlanCatalog>,
    pub server_key: Arc<str>,
}

impl<P: PaymentRepository> ProcessPaymentUseCase<P> {
    /// Verify, validate and apply one gateway notification. `payload` is the
    /// raw body, stored on the transaction as received.
    pub async fn execute(
        &self,
        notification: PaymentNotification,
        payload: serde_json::Value,
    ) -> Result<PaymentOutcome, LibraryServiceError> {
        if !verify_signature(&notification, &self.server_key) {
            tracing::warn!(order_id = %notification.order_id, "payment notification signature mismatch");
            return Err(LibraryServiceError::InvalidSignature);
        }
        let update = TransactionUpdate::from_notification(&notification, payload)?;
        let outcome = self
            .repo
            .apply_notification(&notification.order_id, &update, &self.plans, Utc::now())
            .await?;
        tracing::info!(
            order_id = %notification.order_id,
            status = %update.status,
            outcome = outcome.as_str(),
            "payment notification processed"
        );
        Ok(outcome)
    }
}
