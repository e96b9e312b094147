/*
[INPUT]:  Container handles and the shared transport client
[OUTPUT]: Container capability trait, remote proxy and process streams
[POS]:    Container layer - per-container operations
[UPDATE]: When the container capability set changes
*/

pub mod process;
pub mod proxy;

use std::time::Duration;

use async_trait::async_trait;

use crate::http::Result;
use crate::types::{
    BandwidthLimits, ContainerInfo, ContainerMetrics, CpuLimits, DiskLimits, MemoryLimits,
    NetOutRule, ProcessSpec, Properties,
};

pub use process::{Process, ProcessEvent, ProcessOutput};
pub use proxy::ContainerProxy;

/// Operations available on a single container.
///
/// A container value is only as valid as its remote handle: once the host
/// forgets the handle every call fails with a remote not-found error.
#[async_trait]
pub trait Container: Send + Sync {
    fn handle(&self) -> &str;

    /// Stop all processes; `kill` skips the graceful signal.
    async fn stop(&self, kill: bool) -> Result<()>;

    async fn info(&self) -> Result<ContainerInfo>;

    /// Write a file (or tar stream, host permitting) into the container
    async fn stream_in(&self, dst_path: &str, contents: Vec<u8>) -> Result<()>;

    /// Read a file out of the container
    async fn stream_out(&self, src_path: &str) -> Result<Vec<u8>>;

    async fn limit_bandwidth(&self, limits: BandwidthLimits) -> Result<()>;
    async fn current_bandwidth_limits(&self) -> Result<BandwidthLimits>;
    async fn limit_cpu(&self, limits: CpuLimits) -> Result<()>;
    async fn current_cpu_limits(&self) -> Result<CpuLimits>;
    async fn limit_disk(&self, limits: DiskLimits) -> Result<()>;
    async fn current_disk_limits(&self) -> Result<DiskLimits>;
    async fn limit_memory(&self, limits: MemoryLimits) -> Result<()>;
    async fn current_memory_limits(&self) -> Result<MemoryLimits>;

    /// Map a host port to a container port; returns the mapped pair.
    async fn net_in(&self, host_port: u32, container_port: u32) -> Result<(u32, u32)>;

    async fn net_out(&self, rule: NetOutRule) -> Result<()>;

    /// Apply rules in order, stopping at the first failure
    async fn bulk_net_out(&self, rules: Vec<NetOutRule>) -> Result<()>;

    async fn metrics(&self) -> Result<ContainerMetrics>;

    async fn properties(&self) -> Result<Properties>;
    async fn property(&self, name: &str) -> Result<String>;
    async fn set_property(&self, name: &str, value: &str) -> Result<()>;
    async fn remove_property(&self, name: &str) -> Result<()>;

    /// Idle time after which the host may reclaim this container
    async fn grace_time(&self) -> Result<Duration>;

    /// Launch a process and stream its output
    async fn run(&self, spec: ProcessSpec) -> Result<Process>;
}
