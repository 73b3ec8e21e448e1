//! Payment gateway notifications and the subscription state machine.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use sha2::{Digest, Sha512};

use lectern_domain::subscription::{SubscriptionStatus, TransactionStatus};

use crate::domain::types::{Subscription, SubscriptionPlan};
use crate::error::LibraryServiceError;

/// Offset of the naive `YYYY-MM-DD HH:MM:SS` timestamps the gateway sends.
const GATEWAY_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// A payment status notification as posted by the gateway.
#[derive(Debug, Clone, Default)]
pub struct PaymentNotification {
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

/// Transaction fields derived from a verified notification.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    pub status: TransactionStatus,
    pub gross_amount: i64,
    pub transaction_id: Option<String>,
    pub payment_type: Option<String>,
    pub transaction_time: Option<DateTime<Utc>>,
    pub settlement_time: Option<DateTime<Utc>>,
    pub payload: serde_json::Value,
}

// ── Signature ────────────────────────────────────────────────────────────────

/// `hex(sha512(order_id + status_code + gross_amount + server_key))`.
pub fn notification_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_signature(notification: &PaymentNotification, server_key: &str) -> bool {
    let expected = notification_signature(
        &notification.order_id,
        &notification.status_code,
        &notification.gross_amount,
        server_key,
    );
    constant_time_eq(
        expected.as_bytes(),
        notification.signature_key.to_ascii_lowercase().as_bytes(),
    )
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Map the gateway's `transaction_status` (and `fraud_status` for card
/// captures) onto a stored status.
pub fn map_gateway_status(
    status: &str,
    fraud_status: Option<&str>,
) -> Option<TransactionStatus> {
    match status {
        "settlement" => Some(TransactionStatus::Settlement),
        "capture" => match fraud_status {
            None | Some("accept") => Some(TransactionStatus::Settlement),
            Some("challenge") => Some(TransactionStatus::Pending),
            Some("deny") => Some(TransactionStatus::Deny),
            Some(_) => None,
        },
        "pending" => Some(TransactionStatus::Pending),
        "expire" => Some(TransactionStatus::Expire),
        "cancel" => Some(TransactionStatus::Cancel),
        "deny" => Some(TransactionStatus::Deny),
        _ => None,
    }
}

/// Parse a decimal amount such as `"49000.00"` into whole currency units.
/// Fractional parts other than zero are rejected.
pub fn parse_gross_amount(amount: &str) -> Option<i64> {
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if !fraction.chars().all(|c| c == '0') {
        return None;
    }
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}

/// Parse a gateway timestamp: RFC 3339, or naive `YYYY-MM-DD HH:MM:SS` in
/// the gateway's local offset.
pub fn parse_gateway_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").ok()?;
    let offset = FixedOffset::east_opt(GATEWAY_UTC_OFFSET_SECS)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|t| t.with_timezone(&Utc))
}

impl TransactionUpdate {
    /// Validate the non-signature parts of `notification`.
    pub fn from_notification(
        notification: &PaymentNotification,
        payload: serde_json::Value,
    ) -> Result<Self, LibraryServiceError> {
        let status = map_gateway_status(
            &notification.transaction_status,
            notification.fraud_status.as_deref(),
        )
        .ok_or(LibraryServiceError::UnknownTransactionStatus)?;
        let gross_amount = parse_gross_amount(&notification.gross_amount)
            .ok_or(LibraryServiceError::InvalidGrossAmount)?;
        Ok(Self {
            status,
            gross_amount,
            transaction_id: notification.transaction_id.clone(),
            payment_type: notification.payment_type.clone(),
            transaction_time: notification
                .transaction_time
                .as_deref()
                .and_then(parse_gateway_time),
            settlement_time: notification
                .settlement_time
                .as_deref()
                .and_then(parse_gateway_time),
            payload,
        })
    }
}

// ── Subscription transitions ─────────────────────────────────────────────────

/// Apply a payment status for `order_id` to `subscription`.
///
/// Returns the updated subscription, or `None` when the status leaves it as
/// is. Settlement requires the subscription's `plan`.
pub fn transition_subscription(
    subscription: &Subscription,
    order_id: &str,
    update: &TransactionUpdate,
    plan: Option<&SubscriptionPlan>,
    now: DateTime<Utc>,
) -> Result<Option<Subscription>, LibraryServiceError> {
    let pending_for_order = subscription.status == SubscriptionStatus::Pending
        && subscription.order_id.as_deref() == Some(order_id);

    let next = match update.status {
        TransactionStatus::Pending => return Ok(None),
        TransactionStatus::Settlement => {
            let plan = plan.ok_or(LibraryServiceError::UnknownPlan)?;
            // Renewal of a running period extends it instead of restarting.
            let start = if subscription.is_active_at(now) {
                subscription.end_date.unwrap_or(now)
            } else {
                now
            };
            Subscription {
                status: SubscriptionStatus::Active,
                start_date: Some(start),
                end_date: Some(start + plan.duration()),
                order_id: Some(order_id.to_owned()),
                transaction_id: update
                    .transaction_id
                    .clone()
                    .or_else(|| subscription.transaction_id.clone()),
                gross_amount: Some(update.gross_amount),
                updated_at: now,
                ..subscription.clone()
            }
        }
        TransactionStatus::Expire if pending_for_order => Subscription {
            status: SubscriptionStatus::Expired,
            updated_at: now,
            ..subscription.clone()
        },
        TransactionStatus::Cancel | TransactionStatus::Deny if pending_for_order => Subscription {
            status: SubscriptionStatus::Cancelled,
            updated_at: now,
            ..subscription.clone()
        },
        TransactionStatus::Expire | TransactionStatus::Cancel | TransactionStatus::Deny => {
            return Ok(None);
        }
    };
    Ok(Some(next))
}

/// Admin event kind recorded for a processed notification.
pub fn payment_event_kind(status: TransactionStatus) -> String {
    format!("PAYMENT_{}", status.as_str())
}
