//! Subscription and payment transaction status types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// Lifecycle state of a user's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
    Pending,
}

impl SubscriptionStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Expired, Self::Cancelled, Self::Pending];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Cancelled => "CANCELLED",
            Self::Pending => "PENDING",
        }
    }

    /// A terminal subscription can only be revived by a new checkout.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Cancelled)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "EXPIRED" => Ok(Self::Expired),
            "CANCELLED" => Ok(Self::Cancelled),
            "PENDING" => Ok(Self::Pending),
            other => Err(UnknownVariant::new("SubscriptionStatus", other)),
        }
    }
}

/// Status of a single payment transaction as reported by the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Settlement,
    Expire,
    Cancel,
    Deny,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Settlement => "SETTLEMENT",
            Self::Expire => "EXPIRE",
            Self::Cancel => "CANCEL",
            Self::Deny => "DENY",
        }
    }

    /// Final statuses never change again; repeated notifications are ignored.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "SETTLEMENT" => Ok(Self::Settlement),
            "EXPIRE" => Ok(Self::Expire),
            "CANCEL" => Ok(Self::Cancel),
            "DENY" => Ok(Self::Deny),
            other => Err(UnknownVariant::new("TransactionStatus", other)),
        }
    }
}
