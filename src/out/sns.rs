use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_sns as sns;

use crate::reaper_core::Notifier;

pub struct SnsNotifier {
    client: sns::Client,
    topic_arn: String,
}

impl SnsNotifier {
    pub fn new(client: sns::Client, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    fn name(&self) -> &'static str {
        "sns"
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(body)
            .send()
            .await?;
        Ok(())
    }
}
