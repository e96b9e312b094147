/*
[INPUT]:  Backend configuration and the transport client
[OUTPUT]: Container-host capability trait and its remote implementation
[POS]:    Backend layer - API facade over the remote host
[UPDATE]: When the host capability set changes
*/

pub mod config;
pub mod remote;

use std::time::Duration;

use async_trait::async_trait;

use crate::container::Container;
use crate::http::Result;
use crate::types::{BulkInfo, BulkMetrics, Capacity, ContainerSpec, Properties};

pub use config::BackendConfig;
pub use remote::RemoteBackend;

/// Full capability set of a container host.
///
/// Implementations must be safe to share between tasks.
#[async_trait]
pub trait ContainerBackend: Send + Sync {
    type Container: Container;

    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn stop(&self) {}

    /// Liveness check
    async fn ping(&self) -> Result<()>;

    async fn capacity(&self) -> Result<Capacity>;

    /// Create a container and apply its declared network rules.
    ///
    /// A failure after the container exists is reported as
    /// [`WardenError::PartialCreate`](crate::WardenError::PartialCreate),
    /// carrying the container; nothing is rolled back.
    async fn create(&self, spec: ContainerSpec) -> Result<Self::Container>;

    async fn destroy(&self, handle: &str) -> Result<()>;

    /// List containers, optionally only those whose properties match `filter`
    async fn containers(&self, filter: Option<&Properties>) -> Result<Vec<Self::Container>>;

    /// Build a container for `handle` without checking that it exists
    async fn lookup(&self, handle: &str) -> Result<Self::Container>;

    async fn bulk_info(&self, handles: &[String]) -> Result<BulkInfo>;

    async fn bulk_metrics(&self, handles: &[String]) -> Result<BulkMetrics>;

    /// Container-specific grace time, or the backend default when the
    /// container cannot report one
    async fn grace_time(&self, container: &Self::Container) -> Duration;
}
