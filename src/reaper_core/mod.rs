use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Resource kinds the reaper knows how to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Snapshot,
    Instance,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Snapshot => "snapshot",
            ResourceKind::Instance => "instance",
        }
    }

    /// Parses a comma-separated kind list ("snapshots,instances").
    /// Unknown entries are dropped; duplicates keep their first position.
    pub fn parse_list(s: &str) -> Vec<ResourceKind> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let kind = match part.trim().to_lowercase().as_str() {
                "snapshot" | "snapshots" => Some(ResourceKind::Snapshot),
                "instance" | "instances" => Some(ResourceKind::Instance),
                _ => None,
            };
            if let Some(k) = kind {
                if !out.contains(&k) {
                    out.push(k);
                }
            }
        }
        out
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state for instances. Only Running and Stopped instances are
/// ever acted on; everything else (pending, shutting-down, ...) maps to
/// Other and is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstanceState {
    Running,
    Stopped,
    Other,
}

impl InstanceState {
    pub fn actionable(&self) -> bool {
        matches!(self, InstanceState::Running | InstanceState::Stopped)
    }
}

/// One resource as seen on a listing page. Transient: built per run,
/// discarded after classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedResource {
    pub id: String,
    pub kind: ResourceKind,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<InstanceState>,
}

/// Per-kind outcome of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSummary {
    pub kind: ResourceKind,
    pub total_seen: usize,
    pub eligible: Vec<String>,
    pub acted_on: Vec<String>,
    pub errors: HashMap<String, String>,
}

/// Structured result of a whole invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub status: String,
    pub environment: String,
    pub dry_run: bool,
    pub kinds: Vec<KindSummary>,
}

impl RunResult {
    pub fn summary_for(&self, kind: ResourceKind) -> Option<&KindSummary> {
        self.kinds.iter().find(|k| k.kind == kind)
    }
}

/// Capability over the cloud side: list self-owned resources of a kind
/// (all pages, provider order) and destroy one by id.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn list(&self, kind: ResourceKind) -> Result<Vec<ManagedResource>>;
    async fn destroy(&self, kind: ResourceKind, id: &str) -> Result<()>;
}

/// Capability over the notification side.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    async fn publish(&self, subject: &str, body: &str) -> Result<()>;
}
