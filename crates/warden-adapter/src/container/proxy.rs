/*
[INPUT]:  Container handle and shared transport client
[OUTPUT]: Container-scoped round trips (info, metrics, limits, network, properties, files)
[POS]:    Container layer - handle-indexed remote proxy
[UPDATE]: When adding container sub-endpoints or changing their paths
*/

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::http::{Result, WardenClient, path_segment};
use crate::types::{
    BandwidthLimits, ContainerInfo, ContainerMetrics, CpuLimits, DiskLimits, GraceTimeResponse,
    MemoryLimits, NetInRequest, NetInResponse, NetOutRule, ProcessSpec, Properties, StopRequest,
};

use super::Container;
use super::process::Process;

/// Local stand-in for a container living on the remote host.
///
/// Holds only the handle and the shared transport; every call is a fresh
/// round trip. Dropping the proxy leaves the remote container untouched.
#[derive(Debug, Clone)]
pub struct ContainerProxy {
    client: Arc<WardenClient>,
    handle: String,
}

impl ContainerProxy {
    pub fn new(client: Arc<WardenClient>, handle: impl Into<String>) -> Self {
        Self {
            client,
            handle: handle.into(),
        }
    }

    /// Remote handle this proxy forwards to
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Transport shared with the backend that created this proxy
    pub fn client(&self) -> &Arc<WardenClient> {
        &self.client
    }

    /// `/api/containers/{handle}/{sub_path}`
    pub(crate) fn endpoint(&self, sub_path: &str) -> Result<String> {
        Ok(format!(
            "/api/containers/{}/{}",
            path_segment(&self.handle)?,
            sub_path
        ))
    }

    fn property_endpoint(&self, name: &str) -> Result<String> {
        self.endpoint(&format!("properties/{}", path_segment(name)?))
    }

    fn file_endpoint(&self, param: &str, path: &str) -> Result<String> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(param, path)
            .finish();
        self.endpoint(&format!("files?{query}"))
    }
}

#[async_trait]
impl Container for ContainerProxy {
    fn handle(&self) -> &str {
        &self.handle
    }

    /// POST /api/containers/{handle}/stop
    async fn stop(&self, kill: bool) -> Result<()> {
        self.client
            .post_empty(&self.endpoint("stop")?, &StopRequest { kill })
            .await
    }

    /// GET /api/containers/{handle}/info
    async fn info(&self) -> Result<ContainerInfo> {
        self.client.get(&self.endpoint("info")?).await
    }

    /// PUT /api/containers/{handle}/files?destination={dst_path}
    async fn stream_in(&self, dst_path: &str, contents: Vec<u8>) -> Result<()> {
        self.client
            .put_bytes(&self.file_endpoint("destination", dst_path)?, contents)
            .await
    }

    /// GET /api/containers/{handle}/files?source={src_path}
    async fn stream_out(&self, src_path: &str) -> Result<Vec<u8>> {
        self.client
            .get_bytes(&self.file_endpoint("source", src_path)?)
            .await
    }

    async fn limit_bandwidth(&self, limits: BandwidthLimits) -> Result<()> {
        self.client
            .post_empty(&self.endpoint("bandwidth_limit")?, &limits)
            .await
    }

    async fn current_bandwidth_limits(&self) -> Result<BandwidthLimits> {
        self.client.get(&self.endpoint("bandwidth_limit")?).await
    }

    async fn limit_cpu(&self, limits: CpuLimits) -> Result<()> {
        self.client
            .post_empty(&self.endpoint("cpu_limit")?, &limits)
            .await
    }

    async fn current_cpu_limits(&self) -> Result<CpuLimits> {
        self.client.get(&self.endpoint("cpu_limit")?).await
    }

    async fn limit_disk(&self, limits: DiskLimits) -> Result<()> {
        self.client
            .post_empty(&self.endpoint("disk_limit")?, &limits)
            .await
    }

    async fn current_disk_limits(&self) -> Result<DiskLimits> {
        self.client.get(&self.endpoint("disk_limit")?).await
    }

    async fn limit_memory(&self, limits: MemoryLimits) -> Result<()> {
        self.client
            .post_empty(&self.endpoint("memory_limit")?, &limits)
            .await
    }

    async fn current_memory_limits(&self) -> Result<MemoryLimits> {
        self.client.get(&self.endpoint("memory_limit")?).await
    }

    /// POST /api/containers/{handle}/net/in
    ///
    /// Returns the ports the host actually mapped, which may differ from the
    /// request when a zero port asks the host to pick one.
    async fn net_in(&self, host_port: u32, container_port: u32) -> Result<(u32, u32)> {
        let request = NetInRequest {
            host_port,
            container_port,
        };
        let response: NetInResponse = self
            .client
            .post(&self.endpoint("net/in")?, &request)
            .await?;
        Ok((response.host_port, response.container_port))
    }

    /// POST /api/containers/{handle}/net/out
    async fn net_out(&self, rule: NetOutRule) -> Result<()> {
        self.client.post_empty(&self.endpoint("net/out")?, &rule).await
    }

    async fn bulk_net_out(&self, rules: Vec<NetOutRule>) -> Result<()> {
        for rule in rules {
            self.net_out(rule).await?;
        }
        Ok(())
    }

    /// GET /api/containers/{handle}/metrics
    async fn metrics(&self) -> Result<ContainerMetrics> {
        self.client.get(&self.endpoint("metrics")?).await
    }

    async fn properties(&self) -> Result<Properties> {
        let properties: Option<Properties> =
            self.client.get(&self.endpoint("properties")?).await?;
        Ok(properties.unwrap_or_default())
    }

    async fn property(&self, name: &str) -> Result<String> {
        self.client.get(&self.property_endpoint(name)?).await
    }

    async fn set_property(&self, name: &str, value: &str) -> Result<()> {
        self.client
            .put_empty(&self.property_endpoint(name)?, value)
            .await
    }

    async fn remove_property(&self, name: &str) -> Result<()> {
        self.client.delete(&self.property_endpoint(name)?).await
    }

    /// GET /api/containers/{handle}/grace_time
    async fn grace_time(&self) -> Result<Duration> {
        let grace: GraceTimeResponse =
            self.client.get(&self.endpoint("grace_time")?).await?;
        Ok(grace.0)
    }

    async fn run(&self, spec: ProcessSpec) -> Result<Process> {
        let url = self.client.websocket_url(&self.endpoint("run")?)?;
        Process::spawn(url, spec).await
    }
}
