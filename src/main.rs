use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_types::region::Region;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use ec2_reaper::config::ReaperConfig;
use ec2_reaper::mock::MockProvider;
use ec2_reaper::out;
use ec2_reaper::policy::Reaper;
use ec2_reaper::providers::Ec2Provider;
use ec2_reaper::reaper_core::ResourceProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ReaperConfig::from_env()?;
    tracing::info!(
        "retention sweep: kinds={:?} retention={}d dry_run={} env={}",
        config.kinds,
        config.retention_days,
        config.dry_run,
        config.environment
    );

    let result = if config.mock {
        tracing::warn!("mock mode: using a canned fleet, no AWS calls");
        let provider: Arc<dyn ResourceProvider> = Arc::new(MockProvider::demo_fleet(Utc::now()));
        Reaper::new(config.clone(), provider, None).run().await?
    } else {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let aws = loader.load().await;

        let provider: Arc<dyn ResourceProvider> =
            Arc::new(Ec2Provider::new(aws_sdk_ec2::Client::new(&aws)));
        let notifier = out::build_notifier(&config, &aws);

        let mut reaper = Reaper::new(config.clone(), provider, notifier);
        if let Some(account) = account_id(&aws).await {
            reaper = reaper.with_account_id(account);
        }
        reaper.run().await?
    };

    out::emit_stdout(&result)?;
    Ok(())
}

/// Best-effort caller identity for the report header.
async fn account_id(aws: &aws_config::SdkConfig) -> Option<String> {
    let client = aws_sdk_sts::Client::new(aws);
    match client.get_caller_identity().send().await {
        Ok(who) => who.account().map(|s| s.to_string()),
        Err(e) => {
            tracing::debug!("caller identity lookup failed: {e}");
            None
        }
    }
}
