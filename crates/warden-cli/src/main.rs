/*
[INPUT]:  CLI arguments, YAML configuration file
[OUTPUT]: JSON results of remote container host operations on stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or the startup flow
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use warden_adapter::RemoteBackend;
use warden_cli::{Cli, CliConfig, execute};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = CliConfig::resolve(args.config_path.as_deref(), args.url.as_deref())?;
    info!(base_url = %config.base_url, dry_run = args.dry_run, "configuration loaded");

    let backend = RemoteBackend::connect(
        &config.base_url,
        config.client_config(),
        config.backend_config(),
    )
    .context("initialize backend")?;

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let command = args
        .command
        .ok_or_else(|| anyhow!("a command is required unless --dry-run is given"))?;
    debug!(?command, "executing");

    let output = execute(&backend, command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
