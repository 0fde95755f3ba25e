use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::reaper_core::Notifier;

const CONNECT_TIMEOUT: u64 = 5;
const READ_TIMEOUT: u64 = 30;

/// Posts the report as JSON to a webhook endpoint.
pub struct WebhookNotifier {
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: String) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT))
            .timeout(Duration::from_secs(READ_TIMEOUT))
            .build()?;

        let resp = client
            .post(&self.endpoint)
            .json(&json!({ "subject": subject, "body": body }))
            .send()
            .await
            .map_err(|e| anyhow!("POST send error: {e}"))?;

        if !resp.status().is_success() {
            let code = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("POST failed: {code} - {text}"));
        }

        Ok(())
    }
}
