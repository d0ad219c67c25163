//! chatlog entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chatlog-gateway -- migrate
//! some-gateway-client | cargo run -p chatlog-gateway -- ingest
//! cargo run -p chatlog-gateway -- backfill
//! ```
//!
//! Configuration is loaded from environment variables.

use std::path::PathBuf;

use chatlog_common::{
    try_init_tracing_with_config, AppConfig, AppError, AppResult, ConfigError, TracingConfig,
};
use chatlog_core::traits::MessageHistory;
use chatlog_core::Snowflake;
use chatlog_gateway::app::{connect_store, create_ledger, migrate};
use chatlog_gateway::run_ingest;
use chatlog_service::{BackfillService, RepairReport, RepairService};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "chatlog", version, about = "Append-only ledger of a chat platform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply database migrations
    Migrate,
    /// Record dispatch frames, one JSON object per line
    Ingest {
        /// Read frames from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Record channel history missing from the ledger
    Backfill {
        /// Only these channel ids (default: every readable text channel)
        #[arg(long = "channel")]
        channels: Vec<i64>,
    },
    /// Fill in raw text of rows recorded before it was captured
    Repair {
        /// Only these channel ids (default: every channel with such rows)
        #[arg(long = "channel")]
        channels: Vec<i64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    // Pick the log format before anything else can log
    let tracing_config = config
        .as_ref()
        .map(|c| TracingConfig::for_environment(c.app.env))
        .unwrap_or_default();
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(cli, config).await {
        error!(error = %e, code = e.error_code(), "chatlog failed");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, config: Result<AppConfig, ConfigError>) -> AppResult<()> {
    let config = config.inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;
    info!(env = ?config.app.env, command = ?cli.command, "Configuration loaded");

    match cli.command {
        Command::Migrate => migrate(&connect_store(&config).await?).await,
        Command::Ingest { file } => {
            let ledger = create_ledger(&config).await?;
            let handler = ledger.handler();
            let report = match file {
                Some(path) => {
                    let file = tokio::fs::File::open(&path).await.map_err(|e| {
                        AppError::invalid_input(format!("{}: {e}", path.display()))
                    })?;
                    run_ingest(&handler, BufReader::new(file)).await
                }
                None => run_ingest(&handler, BufReader::new(tokio::io::stdin())).await,
            }
            .map_err(AppError::internal)?;
            info!(?report, "Ingest finished");
            Ok(())
        }
        Command::Backfill { channels } => {
            let ledger = create_ledger(&config).await?;
            let service = BackfillService::new(&ledger.ctx);
            let report = if channels.is_empty() {
                service.backfill_all().await?
            } else {
                let wanted: Vec<Snowflake> = channels.into_iter().map(Snowflake::new).collect();
                let known = ledger.client.text_channels().await?;
                if let Some(missing) = wanted.iter().find(|id| !known.iter().any(|c| c.id == **id))
                {
                    return Err(AppError::invalid_input(format!(
                        "channel {missing} is not a readable text channel"
                    )));
                }
                let selected: Vec<_> = known
                    .into_iter()
                    .filter(|c| wanted.contains(&c.id))
                    .collect();
                service.backfill_channels(&selected).await
            };
            ledger.ctx.background().drain().await;
            info!(?report, "Backfill finished");
            Ok(())
        }
        Command::Repair { channels } => {
            let ledger = create_ledger(&config).await?;
            let service = RepairService::new(&ledger.ctx);
            let report = if channels.is_empty() {
                service.repair_all().await?
            } else {
                let mut report = RepairReport::default();
                for id in channels {
                    report += service.repair_channel(Snowflake::new(id)).await?;
                }
                report
            };
            info!(?report, "Content fix finished");
            Ok(())
        }
    }
}
