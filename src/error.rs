use thiserror::Error;

use crate::reaper_core::ResourceKind;

/// Fatal failures only. Per-resource action failures are collected into the
/// run result's error map, and notification failures are logged and dropped;
/// neither shows up here.
#[derive(Debug, Error)]
pub enum ReaperError {
    #[error("listing {kind} resources failed: {source}")]
    Listing {
        kind: ResourceKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ReaperError>;
