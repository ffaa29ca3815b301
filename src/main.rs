//! User registry API entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use user_registry::api::{create_router, AppState};
use user_registry::config::{Config, Environment, LogFormat};
use user_registry::metrics;
use user_registry::utils::shutdown_signal;
use user_registry::AppError;

/// In-memory user registry HTTP API.
#[derive(Parser, Debug)]
#[command(name = "user-registry")]
#[command(about = "User management and health reporting API backed by an in-memory registry")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

/// Overrides for the configured bind address and deployment mode.
#[derive(clap::Args, Debug, Clone, Default)]
struct ServeArgs {
    /// Interface to bind (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Deployment mode (overrides APP_ENV).
    #[arg(long = "env")]
    environment: Option<Environment>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve(ServeArgs),

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load().map_err(AppError::from)?;

    // Initialize logging
    init_logging(&config, args.verbose);

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(config),
        Some(Command::Serve(overrides)) => cmd_serve(config, overrides).await,
        None => cmd_serve(config, args.serve).await,
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("user_registry=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// Check configuration validity.
fn cmd_check_config(config: Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("USER REGISTRY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}", config.bind_addr());
    println!("  Environment: {}", config.app_env);
    println!(
        "  Error Details: {}",
        if config.app_env.exposes_error_details() { "Exposed" } else { "Hidden" }
    );
    println!("  CORS Origins: {}", config.allowed_origins().join(", "));
    println!("  API Version: {}", config.api_version);
    println!("  Log Level: {} ({})", config.rust_log, config.log_format);
    println!(
        "  Metrics: {}",
        if config.metrics_enabled { "Enabled" } else { "Disabled" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(mut config: Config, overrides: ServeArgs) -> anyhow::Result<()> {
    // Override with CLI args if provided
    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(environment) = overrides.environment {
        config.app_env = environment;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(AppError::InvalidConfig(e).into());
    }

    info!("Configuration loaded successfully");
    info!("Environment: {}", config.app_env);
    info!("API version: {}", config.api_version);

    // Create app state
    let mut app_state = AppState::new(&config);

    if config.metrics_enabled {
        match metrics::install_prometheus() {
            Ok(handle) => app_state = app_state.with_prometheus(handle),
            Err(e) => warn!("Prometheus recorder not installed: {}", e),
        }
    }

    let router = create_router(app_state, &config);

    // Start HTTP server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await.map_err(AppError::from)?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
