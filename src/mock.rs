//! In-memory capability doubles: a scriptable provider with per-id failure
//! injection, and a notifier that records what it was asked to publish.
//! The binary's mock mode runs against [`MockProvider::demo_fleet`].

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::reaper_core::{
    InstanceState, ManagedResource, Notifier, ResourceKind, ResourceProvider,
};

#[derive(Default)]
pub struct MockProvider {
    resources: HashMap<ResourceKind, Vec<ManagedResource>>,
    fail_listing: HashSet<ResourceKind>,
    fail_destroy: HashMap<String, String>,
    calls: Mutex<Vec<(ResourceKind, String)>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(mut self, kind: ResourceKind, resources: Vec<ManagedResource>) -> Self {
        self.resources.entry(kind).or_default().extend(resources);
        self
    }

    /// Makes every `list` call for `kind` fail.
    pub fn failing_listing(mut self, kind: ResourceKind) -> Self {
        self.fail_listing.insert(kind);
        self
    }

    /// Makes `destroy` fail for one id with the given message.
    pub fn failing_destroy(mut self, id: &str, message: &str) -> Self {
        self.fail_destroy.insert(id.to_string(), message.to_string());
        self
    }

    /// Every destroy call received, in order, including failed ones.
    pub fn destroy_calls(&self) -> Vec<(ResourceKind, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Canned fleet for running the binary without AWS credentials: a pair
    /// of snapshots and instances straddling a one-year retention window,
    /// plus a pending instance that must never be touched.
    pub fn demo_fleet(now: DateTime<Utc>) -> Self {
        let snapshot = |id: &str, days: i64| ManagedResource {
            id: id.to_string(),
            kind: ResourceKind::Snapshot,
            created_at: now - Duration::days(days),
            state: None,
        };
        let instance = |id: &str, days: i64, state: InstanceState| ManagedResource {
            id: id.to_string(),
            kind: ResourceKind::Instance,
            created_at: now - Duration::days(days),
            state: Some(state),
        };

        Self::new()
            .with_resources(
                ResourceKind::Snapshot,
                vec![
                    snapshot("snap-0aa11bb22cc33dd44", 400),
                    snapshot("snap-0ee55ff66aa77bb88", 120),
                ],
            )
            .with_resources(
                ResourceKind::Instance,
                vec![
                    instance("i-0123456789abcdef0", 500, InstanceState::Stopped),
                    instance("i-0fedcba9876543210", 90, InstanceState::Running),
                    instance("i-00000000deadbeef0", 800, InstanceState::Other),
                ],
            )
    }
}

#[async_trait]
impl ResourceProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<ManagedResource>> {
        if self.fail_listing.contains(&kind) {
            return Err(anyhow!("injected listing failure for {kind}"));
        }
        Ok(self.resources.get(&kind).cloned().unwrap_or_default())
    }

    async fn destroy(&self, kind: ResourceKind, id: &str) -> Result<()> {
        self.calls.lock().unwrap().push((kind, id.to_string()));
        if let Some(msg) = self.fail_destroy.get(id) {
            return Err(anyhow!("{msg}"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    fail: bool,
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        self.messages
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(anyhow!("injected publish failure"));
        }
        Ok(())
    }
}
