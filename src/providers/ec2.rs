use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_ec2 as ec2;
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::reaper_core::{InstanceState, ManagedResource, ResourceKind, ResourceProvider};

/// Real capability over aws-sdk-ec2. Snapshots are listed self-owned only;
/// instances are account-scoped by the API itself.
pub struct Ec2Provider {
    client: ec2::Client,
}

impl Ec2Provider {
    pub fn new(client: ec2::Client) -> Self {
        Self { client }
    }

    fn to_utc(ts: &ec2::primitives::DateTime) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
    }

    fn map_state(name: Option<&ec2::types::InstanceStateName>) -> InstanceState {
        match name {
            Some(ec2::types::InstanceStateName::Running) => InstanceState::Running,
            Some(ec2::types::InstanceStateName::Stopped) => InstanceState::Stopped,
            _ => InstanceState::Other,
        }
    }

    async fn list_snapshots(&self) -> Result<Vec<ManagedResource>> {
        let mut out = Vec::new();

        let mut next: Option<String> = None;
        loop {
            let resp = self
                .client
                .describe_snapshots()
                .owner_ids("self")
                .set_next_token(next.clone())
                .send()
                .await?;

            for snap in resp.snapshots() {
                let id = match snap.snapshot_id() {
                    Some(v) => v.to_string(),
                    None => continue,
                };
                let created_at = match snap.start_time().and_then(Self::to_utc) {
                    Some(ts) => ts,
                    None => {
                        warn!("snapshot {id} has no start time, skipping");
                        continue;
                    }
                };
                out.push(ManagedResource {
                    id,
                    kind: ResourceKind::Snapshot,
                    created_at,
                    state: None,
                });
            }

            next = resp.next_token().map(|s| s.to_string());
            if next.is_none() {
                break;
            }
        }

        Ok(out)
    }

    async fn list_instances(&self) -> Result<Vec<ManagedResource>> {
        let mut out = Vec::new();

        let mut next: Option<String> = None;
        loop {
            let resp = self
                .client
                .describe_instances()
                .set_next_token(next.clone())
                .send()
                .await?;

            for res in resp.reservations() {
                for inst in res.instances() {
                    let id = match inst.instance_id() {
                        Some(v) => v.to_string(),
                        None => continue,
                    };
                    let created_at = match inst.launch_time().and_then(Self::to_utc) {
                        Some(ts) => ts,
                        None => {
                            warn!("instance {id} has no launch time, skipping");
                            continue;
                        }
                    };
                    let state = Self::map_state(inst.state().and_then(|s| s.name()));
                    out.push(ManagedResource {
                        id,
                        kind: ResourceKind::Instance,
                        created_at,
                        state: Some(state),
                    });
                }
            }

            next = resp.next_token().map(|s| s.to_string());
            if next.is_none() {
                break;
            }
        }

        Ok(out)
    }
}

#[async_trait]
impl ResourceProvider for Ec2Provider {
    fn name(&self) -> &'static str {
        "ec2"
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<ManagedResource>> {
        match kind {
            ResourceKind::Snapshot => self.list_snapshots().await,
            ResourceKind::Instance => self.list_instances().await,
        }
    }

    async fn destroy(&self, kind: ResourceKind, id: &str) -> Result<()> {
        match kind {
            ResourceKind::Snapshot => {
                self.client.delete_snapshot().snapshot_id(id).send().await?;
            }
            ResourceKind::Instance => {
                self.client
                    .terminate_instances()
                    .instance_ids(id)
                    .send()
                    .await?;
            }
        }
        Ok(())
    }
}
