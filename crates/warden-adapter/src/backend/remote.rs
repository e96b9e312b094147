/*
[INPUT]:  Transport client, backend config, container specs and handles
[OUTPUT]: Container proxies, capacity, bulk info/metrics from the remote host
[POS]:    Backend layer - remote implementation of the host capability set
[UPDATE]: When adding facade endpoints or changing create/destroy semantics
*/

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::container::{Container, ContainerProxy};
use crate::http::{ClientConfig, Result, WardenClient, WardenError, path_segment};
use crate::types::{
    BulkInfo, BulkMetrics, Capacity, ContainerSpec, CreateContainerResponse, Properties,
};

use super::{BackendConfig, ContainerBackend};

const PING_ENDPOINT: &str = "/api/ping";
const CAPACITY_ENDPOINT: &str = "/api/capacity";
const CONTAINERS_ENDPOINT: &str = "/api/containers";
const BULK_INFO_ENDPOINT: &str = "/api/bulkcontainerinfo";
const BULK_METRICS_ENDPOINT: &str = "/api/bulkcontainermetrics";

/// Container host reached over HTTP
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: Arc<WardenClient>,
    config: BackendConfig,
}

impl RemoteBackend {
    pub fn new(client: WardenClient, config: BackendConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
        }
    }

    /// Build the transport and backend in one step
    pub fn connect(
        base_url: &str,
        client_config: ClientConfig,
        config: BackendConfig,
    ) -> Result<Self> {
        let client = WardenClient::with_config(client_config, base_url)?;
        Ok(Self::new(client, config))
    }

    pub fn client(&self) -> &Arc<WardenClient> {
        &self.client
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn container(&self, handle: impl Into<String>) -> ContainerProxy {
        ContainerProxy::new(Arc::clone(&self.client), handle)
    }
}

/// Apply the inbound mappings, then the outbound rules, stopping at the first failure
async fn configure_network(container: &ContainerProxy, spec: ContainerSpec) -> Result<()> {
    for mapping in &spec.net_in {
        container
            .net_in(mapping.host_port, mapping.container_port)
            .await?;
    }
    container.bulk_net_out(spec.net_out).await
}

#[async_trait]
impl ContainerBackend for RemoteBackend {
    type Container = ContainerProxy;

    /// GET /api/ping
    async fn ping(&self) -> Result<()> {
        self.client.get_empty(PING_ENDPOINT).await
    }

    /// GET /api/capacity
    async fn capacity(&self) -> Result<Capacity> {
        self.client.get(CAPACITY_ENDPOINT).await
    }

    /// POST /api/containers
    async fn create(&self, spec: ContainerSpec) -> Result<ContainerProxy> {
        let response: CreateContainerResponse =
            self.client.post(CONTAINERS_ENDPOINT, &spec).await?;
        let container = self.container(response.handle);
        info!(handle = container.handle(), "container created");

        if let Err(source) = configure_network(&container, spec).await {
            warn!(
                handle = container.handle(),
                error = %source,
                "container network setup failed"
            );
            return Err(WardenError::PartialCreate {
                container: Box::new(container),
                source: Box::new(source),
            });
        }

        Ok(container)
    }

    /// DELETE /api/containers/{handle}
    async fn destroy(&self, handle: &str) -> Result<()> {
        let endpoint = format!("{CONTAINERS_ENDPOINT}/{}", path_segment(handle)?);
        match self.client.delete(&endpoint).await {
            Ok(()) => {
                info!(handle, "container destroyed");
                Ok(())
            }
            Err(err) if err.is_not_found() && self.config.destroy_missing_ok => {
                debug!(handle, "container already gone");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// GET /api/containers?q={json}
    async fn containers(&self, filter: Option<&Properties>) -> Result<Vec<ContainerProxy>> {
        let endpoint = match filter {
            Some(properties) if !properties.is_empty() => {
                let json = serde_json::to_string(properties).map_err(WardenError::Encode)?;
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("q", &json)
                    .finish();
                format!("{CONTAINERS_ENDPOINT}?{query}")
            }
            _ => CONTAINERS_ENDPOINT.to_string(),
        };

        let handles: Option<Vec<String>> = self.client.get(&endpoint).await?;
        Ok(handles
            .unwrap_or_default()
            .into_iter()
            .map(|handle| self.container(handle))
            .collect())
    }

    /// No round trip; only rejects handles that cannot address a container
    async fn lookup(&self, handle: &str) -> Result<ContainerProxy> {
        path_segment(handle)?;
        Ok(self.container(handle))
    }

    /// POST /api/bulkcontainerinfo
    async fn bulk_info(&self, handles: &[String]) -> Result<BulkInfo> {
        if handles.is_empty() {
            return Ok(BulkInfo::new());
        }
        let info: Option<BulkInfo> = self.client.post(BULK_INFO_ENDPOINT, handles).await?;
        Ok(info.unwrap_or_default())
    }

    /// POST /api/bulkcontainermetrics
    async fn bulk_metrics(&self, handles: &[String]) -> Result<BulkMetrics> {
        if handles.is_empty() {
            return Ok(BulkMetrics::new());
        }
        let metrics: Option<BulkMetrics> =
            self.client.post(BULK_METRICS_ENDPOINT, handles).await?;
        Ok(metrics.unwrap_or_default())
    }

    async fn grace_time(&self, container: &ContainerProxy) -> Duration {
        match Container::grace_time(container).await {
            Ok(grace_time) => grace_time,
            Err(err) => {
                debug!(
                    handle = container.handle(),
                    error = %err,
                    default_secs = self.config.grace_time.as_secs(),
                    "container grace time unavailable, using default"
                );
                self.config.grace_time
            }
        }
    }
}
