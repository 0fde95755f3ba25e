pub mod config;
pub mod error;
pub mod mock;
pub mod out;
pub mod policy;
pub mod providers;
pub mod reaper_core;
pub mod utils;

pub use config::ReaperConfig;
pub use error::{ReaperError, Result};
pub use policy::Reaper;
pub use reaper_core::{
    InstanceState, KindSummary, ManagedResource, Notifier, ResourceKind, ResourceProvider,
    RunResult,
};
