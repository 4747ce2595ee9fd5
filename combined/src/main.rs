//! Combined binary - runs the gateway with every service embedded in one process.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "shop-api")]
#[command(about = "Shop management backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API over the configured store
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Seconds between orphaned staff account sweeps; 0 disables them
        #[arg(long)]
        reconcile_interval: Option<u64>,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            reconcile_interval,
        } => {
            let config = GatewayConfig::from_env();
            let host = host.unwrap_or(config.host);
            let port = port.unwrap_or(config.port);
            let interval = reconcile_interval.unwrap_or(config.reconcile_interval_seconds);

            info!("Starting shop API on http://{}:{}", host, port);
            let state = gateway_lib::build_state().await?;

            let reconciler = (interval > 0).then(|| {
                info!("Sweeping orphaned staff accounts every {}s", interval);
                gateway_lib::spawn_reconciler(
                    state.services.staff.clone(),
                    Duration::from_secs(interval),
                )
            });

            if let Err(e) = gateway_lib::serve(&host, port, state).await {
                error!("Gateway failed: {}", e);
                if let Some(handle) = reconciler {
                    handle.abort();
                }
                return Err(e);
            }
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateAction::Up => user_service_lib::MigrateAction::Up,
                MigrateAction::Down => user_service_lib::MigrateAction::Down,
                MigrateAction::Status => user_service_lib::MigrateAction::Status,
                MigrateAction::Fresh => user_service_lib::MigrateAction::Fresh,
            };

            user_service_lib::run_migrations(migrate_action).await?;
        }
    }

    Ok(())
}
