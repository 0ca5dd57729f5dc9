//! prom2grafana - Turn Prometheus metric samples into Grafana dashboards
//!
//! A small web service that asks a language model to write a Grafana
//! dashboard and Prometheus alert rules for pasted metrics.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prom2grafana::config::{Config, LoggingConfig};
use prom2grafana::web;

#[derive(Parser)]
#[command(name = "prom2grafana")]
#[command(about = "Turn Prometheus metric samples into Grafana dashboards and alert rules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration from the environment
    Check,

    /// Show the models that will be tried, in order
    Models,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to this
/// crate and to tower_http.
fn init_tracing(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        l @ ("trace" | "debug" | "info" | "warn" | "error") => l.to_string(),
        _ => "info".to_string(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("prom2grafana={level},tower_http={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A .env file is optional; real environment variables take precedence.
    let dotenv_path = dotenvy::dotenv().ok();

    // Missing API key is fatal before anything is served.
    let mut config = Config::from_env()?;
    init_tracing(&config.logging);

    if let Some(path) = dotenv_path {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                tracing::info!(port, "Override listen port");
                config.server.port = port;
            }
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                port = config.server.port,
                "Starting prom2grafana"
            );
            web::run_server(config).await
        }

        Commands::Check => {
            println!("Configuration OK");
            println!("  port:     {}", config.server.port);
            println!("  log:      {}", config.logging.level);
            println!("  api url:  {}", config.provider.base_url);
            println!("  api key:  {}", config.provider.api_key);
            println!("  models:   {}", config.candidates());
            Ok(())
        }

        Commands::Models => {
            for (i, model) in config.candidates().iter().enumerate() {
                println!("{}. {}", i + 1, model);
            }
            Ok(())
        }
    }
}
