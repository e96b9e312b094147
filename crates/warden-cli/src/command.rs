/*
[INPUT]:  Parsed command-line arguments, a container backend
[OUTPUT]: JSON value describing the result of one command
[POS]:    Command layer - maps subcommands onto backend operations
[UPDATE]: When adding subcommands or changing their output shape
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::{debug, info};
use warden_adapter::{
    Container, ContainerBackend, ContainerSpec, NetInRequest, ProcessSpec, Properties,
};

#[derive(Parser, Debug)]
#[command(name = "warden", version, about = "Remote container host client")]
pub struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,
    /// Overrides `base_url` from the config file
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the host is reachable
    Ping,
    /// Show host capacity
    Capacity,
    /// List container handles, optionally filtered by property
    List {
        #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Create a container
    Create {
        #[arg(long)]
        handle: Option<String>,
        #[arg(long = "net-in", value_name = "HOST:CONTAINER", value_parser = parse_net_in)]
        net_in: Vec<NetInRequest>,
        #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Destroy a container
    Destroy { handle: String },
    /// Show info for one or more containers
    Info {
        #[arg(required = true)]
        handles: Vec<String>,
    },
    /// Show metrics for one or more containers
    Metrics {
        #[arg(required = true)]
        handles: Vec<String>,
    },
    /// Show the idle grace time of a container
    GraceTime { handle: String },
    /// Run a process inside a container and wait for it to exit
    Run {
        handle: String,
        path: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// Parse `KEY=VALUE`
pub fn parse_property(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty property key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse `HOST:CONTAINER`; a host port of 0 lets the remote host pick one
pub fn parse_net_in(raw: &str) -> std::result::Result<NetInRequest, String> {
    let (host, container) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected HOST:CONTAINER, got `{raw}`"))?;
    let host_port = host
        .parse()
        .map_err(|err| format!("invalid host port `{host}`: {err}"))?;
    let container_port = container
        .parse()
        .map_err(|err| format!("invalid container port `{container}`: {err}"))?;
    Ok(NetInRequest {
        host_port,
        container_port,
    })
}

fn to_properties(pairs: Vec<(String, String)>) -> Properties {
    pairs.into_iter().collect()
}

/// Execute one command against the backend
pub async fn execute<B: ContainerBackend>(backend: &B, command: Command) -> Result<Value> {
    match command {
        Command::Ping => {
            backend.ping().await.context("ping")?;
            Ok(json!({ "status": "ok" }))
        }
        Command::Capacity => {
            let capacity = backend.capacity().await.context("capacity")?;
            Ok(serde_json::to_value(capacity)?)
        }
        Command::List { properties } => {
            let filter = to_properties(properties);
            let containers = backend
                .containers(Some(&filter))
                .await
                .context("list containers")?;
            let handles: Vec<&str> = containers.iter().map(|c| c.handle()).collect();
            Ok(json!(handles))
        }
        Command::Create {
            handle,
            net_in,
            properties,
        } => {
            let spec = ContainerSpec {
                handle,
                net_in,
                properties: to_properties(properties),
                ..Default::default()
            };
            let container = backend.create(spec).await.context("create container")?;
            info!(handle = container.handle(), "created");
            Ok(json!({ "handle": container.handle() }))
        }
        Command::Destroy { handle } => {
            backend
                .destroy(&handle)
                .await
                .with_context(|| format!("destroy {handle}"))?;
            Ok(json!({ "destroyed": handle }))
        }
        Command::Info { handles } => {
            let info = backend.bulk_info(&handles).await.context("bulk info")?;
            Ok(serde_json::to_value(info)?)
        }
        Command::Metrics { handles } => {
            let metrics = backend
                .bulk_metrics(&handles)
                .await
                .context("bulk metrics")?;
            Ok(serde_json::to_value(metrics)?)
        }
        Command::GraceTime { handle } => {
            let container = backend.lookup(&handle).await?;
            let grace_time = backend.grace_time(&container).await;
            let nanos = u64::try_from(grace_time.as_nanos()).unwrap_or(u64::MAX);
            Ok(json!({
                "handle": handle,
                "grace_time_secs": grace_time.as_secs_f64(),
                "grace_time_nanos": nanos,
            }))
        }
        Command::Run { handle, path, args } => {
            let container = backend.lookup(&handle).await?;
            let process = container
                .run(ProcessSpec {
                    path,
                    args,
                    ..Default::default()
                })
                .await
                .with_context(|| format!("run in {handle}"))?;
            info!(id = process.id(), pid = process.pid(), "process started");
            // The process may already have exited and closed the stream
            if let Err(err) = process.close_stdin().await {
                debug!(error = %err, "stdin already closed");
            }
            let output = process.wait().await.context("wait for process")?;
            Ok(serde_json::to_value(output)?)
        }
    }
}
