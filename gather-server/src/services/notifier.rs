//! Notification Dispatcher
//!
//! Best-effort fan-out to the external push relay. Delivery is never part
//! of an operation's correctness: every failure is logged and swallowed,
//! and callers treat the returned notification id as informational.

use serde_json::Value;

/// Notification relay client
#[derive(Clone, Debug)]
pub struct NotificationService {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl NotificationService {
    /// Create the dispatcher; `endpoint` is the relay URL, or `None` to
    /// log notifications instead of sending them (dev/test)
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Disabled dispatcher for tests
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Attempt to deliver one notification.
    ///
    /// Returns the relay-assigned notification id when delivery was
    /// accepted; `None` on any failure. Never returns an error.
    pub async fn notify(
        &self,
        user_id: &str,
        kind: &str,
        title: &str,
        body: &str,
        data: Value,
    ) -> Option<i64> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            tracing::debug!(user_id, kind, title, "notification relay not configured, skipping");
            return None;
        };

        let payload = serde_json::json!({
            "userId": user_id,
            "type": kind,
            "title": title,
            "body": body,
            "data": data,
        });

        let resp = match self.client.post(endpoint).json(&payload).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(user_id, kind, error = %e, "notification dispatch failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(user_id, kind, status = %resp.status(), "notification relay rejected dispatch");
            return None;
        }

        let body: Value = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(user_id, kind, error = %e, "notification relay returned malformed response");
                return None;
            }
        };

        body["notificationId"].as_i64().or_else(|| body["id"].as_i64())
    }
}
