use crate::error::{ReaperError, Result};
use crate::reaper_core::ResourceKind;
use crate::utils::parse_bool;

/// Everything a run needs, resolved up front. Defaults are conservative:
/// destructive actions require an explicit DRY_RUN=false.
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    pub retention_days: i64,
    pub dry_run: bool,
    pub kinds: Vec<ResourceKind>,
    pub environment: String,
    pub sns_topic_arn: Option<String>,
    pub webhook_url: Option<String>,
    pub region: Option<String>,
    pub mock: bool,
}

impl ReaperConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Env-shaped lookup, split out so tests can feed a plain closure.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let get_opt = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let raw_days = get_or("RETENTION_DAYS", "365");
        let retention_days: i64 = raw_days.trim().parse().map_err(|_| {
            ReaperError::Config(format!("RETENTION_DAYS must be an integer, got {raw_days:?}"))
        })?;
        if retention_days <= 0 {
            return Err(ReaperError::Config(format!(
                "RETENTION_DAYS must be positive, got {retention_days}"
            )));
        }

        let raw_kinds = get_or("RESOURCE_KINDS", "snapshots");
        let kinds = ResourceKind::parse_list(&raw_kinds);
        if kinds.is_empty() {
            return Err(ReaperError::Config(format!(
                "RESOURCE_KINDS selects no known kind: {raw_kinds:?}"
            )));
        }

        Ok(Self {
            retention_days,
            dry_run: parse_bool(&get_or("DRY_RUN", "true")),
            kinds,
            environment: get_or("ENVIRONMENT", "dev"),
            sns_topic_arn: get_opt("SNS_TOPIC_ARN"),
            webhook_url: get_opt("WEBHOOK_URL"),
            region: get_opt("REAPER_REGION"),
            mock: parse_bool(&get_or("MOCK", "false")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + '_ {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_are_safe() {
        let cfg = ReaperConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.retention_days, 365);
        assert!(cfg.dry_run);
        assert_eq!(cfg.kinds, vec![ResourceKind::Snapshot]);
        assert_eq!(cfg.environment, "dev");
        assert!(cfg.sns_topic_arn.is_none());
        assert!(cfg.webhook_url.is_none());
        assert!(!cfg.mock);
    }

    #[test]
    fn explicit_values_win() {
        let cfg = ReaperConfig::from_lookup(lookup(&[
            ("RETENTION_DAYS", "30"),
            ("DRY_RUN", "false"),
            ("RESOURCE_KINDS", "snapshots,instances"),
            ("ENVIRONMENT", "prod"),
            ("SNS_TOPIC_ARN", "arn:aws:sns:us-east-1:123456789012:reaper"),
        ]))
        .unwrap();
        assert_eq!(cfg.retention_days, 30);
        assert!(!cfg.dry_run);
        assert_eq!(
            cfg.kinds,
            vec![ResourceKind::Snapshot, ResourceKind::Instance]
        );
        assert_eq!(cfg.environment, "prod");
        assert!(cfg.sns_topic_arn.is_some());
    }

    #[test]
    fn rejects_bad_retention() {
        assert!(ReaperConfig::from_lookup(lookup(&[("RETENTION_DAYS", "soon")])).is_err());
        assert!(ReaperConfig::from_lookup(lookup(&[("RETENTION_DAYS", "0")])).is_err());
        assert!(ReaperConfig::from_lookup(lookup(&[("RETENTION_DAYS", "-1")])).is_err());
    }

    #[test]
    fn rejects_empty_kind_selection() {
        assert!(ReaperConfig::from_lookup(lookup(&[("RESOURCE_KINDS", "amis")])).is_err());
    }

    #[test]
    fn blank_optional_values_are_none() {
        let cfg = ReaperConfig::from_lookup(lookup(&[("SNS_TOPIC_ARN", "  ")])).unwrap();
        assert!(cfg.sns_topic_arn.is_none());
    }
}
