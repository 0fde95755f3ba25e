use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::ReaperConfig;
use crate::error::{ReaperError, Result};
use crate::reaper_core::{
    KindSummary, ManagedResource, Notifier, ResourceKind, ResourceProvider, RunResult,
};

/// Whole days elapsed from `created_at` to `now`, truncated toward zero.
pub fn age_days(now: DateTime<Utc>, created_at: DateTime<Utc>) -> i64 {
    (now - created_at).num_days()
}

/// Strictly-older-than-retention rule: a resource exactly `retention_days`
/// old stays. Instances additionally must sit in an actionable state.
pub fn is_eligible(resource: &ManagedResource, now: DateTime<Utc>, retention_days: i64) -> bool {
    if let Some(state) = resource.state {
        if !state.actionable() {
            return false;
        }
    }
    age_days(now, resource.created_at) > retention_days
}

/// The retention policy evaluator. One `run` per invocation: list, classify,
/// act (or mark, in dry-run), report.
pub struct Reaper {
    config: ReaperConfig,
    provider: Arc<dyn ResourceProvider>,
    notifier: Option<Arc<dyn Notifier>>,
    account_id: Option<String>,
}

impl Reaper {
    pub fn new(
        config: ReaperConfig,
        provider: Arc<dyn ResourceProvider>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            config,
            provider,
            notifier,
            account_id: None,
        }
    }

    /// Account id is cosmetic (report header only), so it is attached when
    /// available rather than required.
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub async fn run(&self) -> Result<RunResult> {
        self.run_at(Utc::now()).await
    }

    /// `now` is pinned once here so every eligibility decision in the run
    /// compares against the same instant.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunResult> {
        let mut kinds = Vec::with_capacity(self.config.kinds.len());
        for kind in &self.config.kinds {
            kinds.push(self.sweep_kind(*kind, now).await?);
        }

        let result = RunResult {
            status: "completed".to_string(),
            environment: self.config.environment.clone(),
            dry_run: self.config.dry_run,
            kinds,
        };
        self.report(&result).await;
        Ok(result)
    }

    async fn sweep_kind(&self, kind: ResourceKind, now: DateTime<Utc>) -> Result<KindSummary> {
        let resources = self
            .provider
            .list(kind)
            .await
            .map_err(|source| ReaperError::Listing { kind, source })?;
        let total_seen = resources.len();

        let eligible: Vec<ManagedResource> = resources
            .into_iter()
            .filter(|r| is_eligible(r, now, self.config.retention_days))
            .collect();
        for r in &eligible {
            debug!(
                "{kind} {} is {} days old (retention {})",
                r.id,
                age_days(now, r.created_at),
                self.config.retention_days
            );
        }
        info!(
            "{kind}: {total_seen} seen, {} past retention",
            eligible.len()
        );

        let mut acted_on = Vec::new();
        let mut errors = HashMap::new();
        if self.config.dry_run {
            // Marked only; nothing is touched.
            acted_on.extend(eligible.iter().map(|r| r.id.clone()));
            if !acted_on.is_empty() {
                info!("{kind}: dry run, would remove {}", acted_on.join(", "));
            }
        } else {
            for r in &eligible {
                match self.provider.destroy(kind, &r.id).await {
                    Ok(()) => {
                        info!("{kind}: removed {}", r.id);
                        acted_on.push(r.id.clone());
                    }
                    Err(e) => {
                        warn!("{kind}: failed to remove {}: {e:#}", r.id);
                        errors.insert(r.id.clone(), format!("{e:#}"));
                    }
                }
            }
        }

        Ok(KindSummary {
            kind,
            total_seen,
            eligible: eligible.into_iter().map(|r| r.id).collect(),
            acted_on,
            errors,
        })
    }

    /// Best-effort: a missing sink is a skip, a publish failure a warning.
    /// The run result is returned unchanged either way.
    async fn report(&self, result: &RunResult) {
        let Some(notifier) = &self.notifier else {
            debug!("no notification sink configured, skipping report");
            return;
        };
        let subject = format!("EC2 retention sweep [{}]", result.environment);
        let body = render_report(result, self.account_id.as_deref());
        match notifier.publish(&subject, &body).await {
            Ok(()) => info!("published run report via {}", notifier.name()),
            Err(e) => warn!("notification via {} failed: {e:#}", notifier.name()),
        }
    }
}

/// Human-readable run summary for the notification body.
pub fn render_report(result: &RunResult, account_id: Option<&str>) -> String {
    let mut out = String::new();
    match account_id {
        Some(acct) => out.push_str(&format!(
            "EC2 retention sweep, environment {} (account {acct})\n",
            result.environment
        )),
        None => out.push_str(&format!(
            "EC2 retention sweep, environment {}\n",
            result.environment
        )),
    }
    if result.dry_run {
        out.push_str("mode: dry run, nothing was removed\n");
    } else {
        out.push_str("mode: live\n");
    }
    for k in &result.kinds {
        out.push_str(&format!(
            "{}: {} seen, {} past retention\n",
            k.kind,
            k.total_seen,
            k.eligible.len()
        ));
        if !k.acted_on.is_empty() {
            let verb = if result.dry_run { "marked" } else { "removed" };
            out.push_str(&format!("  {verb}: {}\n", k.acted_on.join(", ")));
        }
        for (id, err) in &k.errors {
            out.push_str(&format!("  failed {id}: {err}\n"));
        }
    }
    out
}
