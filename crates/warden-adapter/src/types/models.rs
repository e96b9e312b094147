/*
[INPUT]:  Remote host schema definitions and serde requirements
[OUTPUT]: Typed Rust structs for capacity, info, metrics, limits and network rules
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the remote host schema changes or new types are added
*/

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::enums::{BindMountMode, BindMountOrigin, DiskLimitScope, Protocol};

/// Container properties; ordered so query encoding is stable
pub type Properties = BTreeMap<String, String>;

/// Handle -> info entry, as returned by the bulk info endpoint
pub type BulkInfo = HashMap<String, ContainerInfoEntry>;

/// Handle -> metrics entry, as returned by the bulk metrics endpoint
pub type BulkMetrics = HashMap<String, ContainerMetricsEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    #[serde(default)]
    pub memory_in_bytes: u64,
    #[serde(default)]
    pub disk_in_bytes: u64,
    #[serde(default)]
    pub max_containers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    pub host_port: u32,
    pub container_port: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub host_ip: String,
    #[serde(default)]
    pub container_ip: String,
    #[serde(default)]
    pub external_ip: String,
    #[serde(default)]
    pub container_path: String,
    #[serde(default)]
    pub process_ids: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub mapped_ports: Vec<PortMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMemoryStat {
    #[serde(default)]
    pub cache: u64,
    #[serde(default)]
    pub rss: u64,
    #[serde(default)]
    pub mapped_file: u64,
    #[serde(default)]
    pub swap: u64,
    #[serde(default)]
    pub hierarchical_memory_limit: u64,
    #[serde(default)]
    pub total_cache: u64,
    #[serde(default)]
    pub total_rss: u64,
    #[serde(default)]
    pub total_swap: u64,
    #[serde(default)]
    pub total_usage_towards_limit: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerCpuStat {
    #[serde(default)]
    pub usage: u64,
    #[serde(default)]
    pub user: u64,
    #[serde(default)]
    pub system: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDiskStat {
    #[serde(default)]
    pub total_bytes_used: u64,
    #[serde(default)]
    pub total_inodes_used: u64,
    #[serde(default)]
    pub exclusive_bytes_used: u64,
    #[serde(default)]
    pub exclusive_inodes_used: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetrics {
    #[serde(default)]
    pub memory_stat: ContainerMemoryStat,
    #[serde(default)]
    pub cpu_stat: ContainerCpuStat,
    #[serde(default)]
    pub disk_stat: ContainerDiskStat,
}

/// Per-handle failure reported inside a bulk response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryError {
    #[serde(alias = "Message", alias = "Err")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfoEntry {
    #[serde(default)]
    pub info: ContainerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<EntryError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetricsEntry {
    #[serde(default)]
    pub metrics: ContainerMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<EntryError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandwidthLimits {
    #[serde(default)]
    pub rate_in_bytes_per_second: u64,
    #[serde(default)]
    pub burst_rate_in_bytes_per_second: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuLimits {
    #[serde(default)]
    pub limit_in_shares: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskLimits {
    #[serde(default)]
    pub inode_soft: u64,
    #[serde(default)]
    pub inode_hard: u64,
    #[serde(default)]
    pub byte_soft: u64,
    #[serde(default)]
    pub byte_hard: u64,
    #[serde(default)]
    pub scope: DiskLimitScope,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLimits {
    #[serde(default)]
    pub limit_in_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default)]
    pub bandwidth: BandwidthLimits,
    #[serde(default)]
    pub cpu: CpuLimits,
    #[serde(default)]
    pub disk: DiskLimits,
    #[serde(default)]
    pub memory: MemoryLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindMount {
    pub src_path: String,
    pub dst_path: String,
    #[serde(default)]
    pub mode: BindMountMode,
    #[serde(default)]
    pub origin: BindMountOrigin,
}

/// Inclusive IPv4 range; `end` may be omitted for a single address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRange {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// Inclusive port range; `end` may be omitted for a single port
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub start: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmpControl {
    #[serde(rename = "type")]
    pub icmp_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u8>,
}

/// Outbound traffic rule applied to a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetOutRule {
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<IpRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmps: Option<IcmpControl>,
    #[serde(default)]
    pub log: bool,
}

pub(crate) mod serde_helpers {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Durations travel as integer nanoseconds.
    pub mod duration_nanos {
        use super::*;

        pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let nanos = u64::try_from(value.as_nanos()).unwrap_or(u64::MAX);
            serializer.serialize_u64(nanos)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
        where
            D: Deserializer<'de>,
        {
            let nanos = u64::deserialize(deserializer)?;
            Ok(Duration::from_nanos(nanos))
        }
    }

    pub mod option_duration_nanos {
        use super::*;

        pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(duration) => super::duration_nanos::serialize(duration, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let nanos = Option::<u64>::deserialize(deserializer)?;
            Ok(nanos.map(Duration::from_nanos))
        }
    }
}
