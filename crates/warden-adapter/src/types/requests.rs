/*
[INPUT]:  Remote host schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the remote host schema changes or new types are added
*/

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::models::{BindMount, Limits, NetOutRule, Properties, serde_helpers};

/// Container creation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_duration_nanos"
    )]
    pub grace_time: Option<Duration>,
    #[serde(default, rename = "rootfs", skip_serializing_if = "Option::is_none")]
    pub rootfs_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bind_mounts: Vec<BindMount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
    #[serde(default)]
    pub privileged: bool,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default, rename = "netin", skip_serializing_if = "Vec::is_empty")]
    pub net_in: Vec<NetInRequest>,
    #[serde(default, rename = "netout", skip_serializing_if = "Vec::is_empty")]
    pub net_out: Vec<NetOutRule>,
}

/// Inbound port mapping, host port -> container port
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetInRequest {
    pub host_port: u32,
    pub container_port: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRequest {
    pub kill: bool,
}

/// Process to launch inside a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}
