use std::sync::Arc;

use anyhow::Result;

use crate::config::ReaperConfig;
use crate::reaper_core::{Notifier, RunResult};

pub mod http;
pub mod sns;

/// Picks the configured sink, SNS first. None means the report step is a
/// logged skip.
pub fn build_notifier(
    config: &ReaperConfig,
    aws: &aws_config::SdkConfig,
) -> Option<Arc<dyn Notifier>> {
    if let Some(arn) = &config.sns_topic_arn {
        let client = aws_sdk_sns::Client::new(aws);
        return Some(Arc::new(sns::SnsNotifier::new(client, arn.clone())));
    }
    if let Some(url) = &config.webhook_url {
        return Some(Arc::new(http::WebhookNotifier::new(url.clone())));
    }
    None
}

pub fn emit_stdout(result: &RunResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
