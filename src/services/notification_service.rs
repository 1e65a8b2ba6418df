//! Notification service for telling account holders about transfers.
//!
//! The accounts service calls a [`Notifier`] after a transfer has committed.
//! Notifiers are fire-and-forget: they return nothing and their failures are
//! only logged, so a committed transfer is never undone or reported as failed
//! because a notification could not be delivered.

use std::{sync::Arc, time::Duration};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;
use uuid::Uuid;

use crate::models::{account::Account, webhook::WebhookPayload};

type HmacSha256 = Hmac<Sha256>;

/// Receiver of post-transfer notifications.
pub trait Notifier: Send + Sync {
    fn notify_about_transfer(&self, account: &Account, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_about_transfer(&self, account: &Account, message: &str) {
        tracing::info!(account_id = account.id(), "Sending notification: {}", message);
    }
}

/// Sends every notification to all of its inner notifiers, in order.
pub struct CompositeNotifier {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }
}

impl Notifier for CompositeNotifier {
    fn notify_about_transfer(&self, account: &Account, message: &str) {
        for notifier in &self.notifiers {
            notifier.notify_about_transfer(account, message);
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum WebhookError {
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Endpoint answered with status {0}")]
    Status(reqwest::StatusCode),
}

/// Delivers notifications as signed HTTP POSTs.
///
/// # Headers Sent
///
/// - `Content-Type: application/json`
/// - `X-Webhook-Signature: sha256=<hex>`
/// - `X-Webhook-Event-Id: <uuid>`
///
/// # Delivery
///
/// Each notification is sent on its own tokio task with a 5 second timeout.
/// Failures are logged and dropped. Outside a tokio runtime nothing is sent.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Url,
    secret: String,
}

impl WebhookNotifier {
    pub fn new(url: Url, secret: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            url,
            secret,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn notify_about_transfer(&self, account: &Account, message: &str) {
        let event_id = Uuid::new_v4();
        let payload = WebhookPayload::new(event_id, account, message);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                %event_id,
                "No async runtime available, dropping webhook notification"
            );
            return;
        };

        let notifier = self.clone();
        runtime.spawn(async move {
            if let Err(e) = notifier.send_webhook(&payload).await {
                tracing::error!("Failed to send webhook to {}: {}", notifier.url, e);
            }
        });
    }
}

impl WebhookNotifier {
    async fn send_webhook(&self, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let payload_json = serde_json::to_string(payload)?;
        let signature = generate_signature(&self.secret, &payload_json);

        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .header("X-Webhook-Signature", &signature)
            .header("X-Webhook-Event-Id", payload.event_id.to_string())
            .body(payload_json)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status));
        }

        tracing::debug!(event_id = %payload.event_id, %status, "Webhook delivered");
        Ok(())
    }
}

/// Generate HMAC-SHA256 signature for webhook payload.
///
/// # Format
///
/// `sha256=<hex_encoded_hmac>`
pub fn generate_signature(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key length is valid");
    mac.update(payload.as_bytes());
    let result = mac.finalize();
    format!("sha256={}", hex::encode(result.into_bytes()))
}

/// Test double that records every notification.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    received: std::sync::Mutex<Vec<(Account, String)>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<(Account, String)> {
        self.received.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify_about_transfer(&self, account: &Account, message: &str) {
        self.received
            .lock()
            .unwrap()
            .push((account.clone(), message.to_string()));
    }
}
