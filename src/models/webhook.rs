//! Webhook payload for transfer notifications.
//!
//! When a notification webhook is configured, every notification produced by a
//! committed transfer is POSTed to it as a signed JSON document.
//!
//! # Security
//!
//! - Payloads are signed using HMAC-SHA256 with the configured secret
//! - The signature travels in the `X-Webhook-Signature` header

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::Account;

/// Webhook payload sent to the notification endpoint.
///
/// # Example
///
/// ```json
/// {
///   "event_type": "account.notification",
///   "event_id": "550e8400-e29b-41d4-a716-446655440000",
///   "created_at": "2025-01-15T10:30:00Z",
///   "data": {
///     "account_id": "acc-1",
///     "balance": 95.0,
///     "message": "Your account has been debited with amount 5 and has been transferred to acc-2"
///   }
/// }
/// ```
///
/// # Signature Verification
///
/// Receivers compute HMAC-SHA256(secret, json_body) and compare it with the
/// `X-Webhook-Signature: sha256=<hex>` header.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Type of event (always "account.notification")
    pub event_type: String,

    /// Unique identifier for this webhook event
    pub event_id: Uuid,

    /// When the event was created
    pub created_at: DateTime<Utc>,

    pub data: NotificationData,
}

/// Account state and message carried by a notification.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationData {
    pub account_id: String,

    /// Balance right after the transfer committed
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,

    pub message: String,
}

impl WebhookPayload {
    /// Create a new webhook payload for an account notification.
    pub fn new(event_id: Uuid, account: &Account, message: &str) -> Self {
        Self {
            event_type: "account.notification".to_string(),
            event_id,
            created_at: Utc::now(),
            data: NotificationData {
                account_id: account.id().to_string(),
                balance: account.balance(),
                message: message.to_string(),
            },
        }
    }
}
