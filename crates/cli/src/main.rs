//! `proxyfleet`: point every managed agent in a scope at a new proxy.
//!
//! One invocation authenticates, enumerates the target hosts, opens a single
//! remote-response batch, and submits the registry commands for every
//! configured store, stopping at the first rejected command.
//!
//! Exit status: `0` when every command was accepted, `1` when the run
//! aborted, `2` when the configuration could not be loaded.

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use proxyfleet_core::{RolloutPorts, RolloutRunner};
use proxyfleet_domain::{Config, RunReport};
use proxyfleet_infra::{config, ApiClient, ApiClientConfig, FileTokenStore};
use tracing::{debug, error, info, warn};

const EXIT_ABORTED: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "proxyfleet")]
#[command(about = "Rewrite the agent proxy settings across a fleet", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML or JSON); probed in standard locations if omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();
    logging::init();
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "Could not load .env file"),
    }

    let config = match config::load(cli.config) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Configuration error");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    match run(&config).await {
        Ok(report) => exit_code(&report),
        Err(err) => {
            error!(error = %format!("{err:#}"), "Startup failed");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

async fn run(config: &Config) -> Result<RunReport> {
    let api = Arc::new(
        ApiClient::new(ApiClientConfig::from(&config.cloud)).context("Failed to build API client")?,
    );
    let token_store = Arc::new(FileTokenStore::new(config.token_cache.path.clone()));

    let ports = RolloutPorts {
        identity: api.clone(),
        token_store,
        directory: api.clone(),
        responder: api,
    };
    let runner = RolloutRunner::new(config, ports).context("Failed to prepare rollout")?;

    Ok(runner.run().await)
}

fn exit_code(report: &RunReport) -> ExitCode {
    info!(
        state = %report.final_state,
        batch_id = report.batch_id.as_deref().unwrap_or("-"),
        hosts_enumerated = report.hosts_enumerated,
        hosts_in_session = report.hosts_in_session,
        commands_acknowledged = report.commands_acknowledged,
        "Run finished"
    );

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_ABORTED)
    }
}
