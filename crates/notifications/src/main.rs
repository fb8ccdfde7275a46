//! Support Notifications Service - Main Application Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use config::{ConfigLoader, SharedConfiguration, WritableInfo};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "notifications", version, about = "Support notifications service")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "CONFIG_PATH", default_value = "configuration.yaml")]
    config: PathBuf,

    /// Write an example configuration to the config path and exit
    #[arg(long)]
    write_example: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let args = Args::parse();

    if args.write_example {
        ConfigLoader::create_example(&args.config)?;
        println!("Example configuration written to {}", args.config.display());
        return Ok(());
    }

    // The service starts from an empty configuration and is populated by
    // the same update path the registry uses
    let shared = SharedConfiguration::default();
    let loaded = ConfigLoader::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    shared
        .update_from_raw(loaded)
        .await
        .context("Configuration rejected")?;

    init_logging(&shared.writable().await)?;

    info!("Starting Support Notifications v{}", env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        info!("Loaded environment variables from .env file");
    }
    info!("Configuration loaded from: {}", args.config.display());

    log_configuration(&shared).await;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };
    shutdown_signal.await;

    info!("Support Notifications shutdown complete");
    Ok(())
}

/// Initialize logging from the writable log level, unless RUST_LOG overrides it
fn init_logging(writable: &WritableInfo) -> Result<()> {
    let level = writable
        .level_filter()
        .context("Invalid writable log level")?;
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::default().add_directive(level.into()));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format.as_str() {
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    info!(log_level = %writable.log_level, log_format = %log_format, "Logging initialized");
    if level >= tracing::level_filters::LevelFilter::DEBUG {
        warn!("Debug/trace logging enabled - may impact performance in production");
    }

    Ok(())
}

/// Report the sections the bootstrap and the mail sender work from
async fn log_configuration(shared: &SharedConfiguration) {
    let bootstrap = shared.bootstrap().await;
    let snapshot = shared.snapshot().await;

    info!(
        url = %bootstrap.service.url(),
        check_interval = %bootstrap.service.check_interval,
        "Service endpoint"
    );
    info!(
        host = %bootstrap.registry.host,
        port = bootstrap.registry.port,
        registry_type = %bootstrap.registry.registry_type,
        "Configuration registry"
    );
    for (name, client) in &bootstrap.clients {
        info!(client = %name, url = %client.url(), "Client configured");
    }
    info!(
        duration_secs = bootstrap.startup.duration,
        interval_secs = bootstrap.startup.interval,
        "Startup retry policy"
    );

    for (name, db) in shared.database_info().await {
        info!(database = %name, db_type = %db.db_type, host = %db.host, port = db.port, "Database configured");
    }

    info!(
        host = %snapshot.smtp.host,
        port = snapshot.smtp.port,
        username = %snapshot.smtp.check_username(),
        resend_limit = snapshot.writable.resend_limit,
        "SMTP relay"
    );
    if snapshot.smtp.enable_self_signed_cert {
        warn!("SMTP relay accepts self-signed certificates");
    }

    if !bootstrap.service.startup_msg.is_empty() {
        info!("{}", bootstrap.service.startup_msg);
    }
}
