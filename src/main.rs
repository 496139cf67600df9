//! VitaScope CLI
//!
//! - `vitascope` / `vitascope dashboard`: the full-screen client
//! - `vitascope status`: one-shot live reading, plain output
//! - `vitascope config`: emit a default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitascope::client::ApiClient;
use vitascope::config::{generate_default_config, Config, LoggingConfig};
use vitascope::poller::ConnectionStatus;

#[derive(Parser)]
#[command(name = "vitascope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live vitals monitoring from the terminal")]
#[command(
    long_about = "VitaScope client: sign in to the dashboard server and watch\nheart rate, SpO2 and respiration in real time."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: standard lookup chain)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dashboard server URL override
    #[arg(long, global = true)]
    server: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full-screen dashboard client (default)
    Dashboard,

    /// Fetch the latest live reading once and print it
    Status,

    /// Generate a default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }

    let command = cli.command.unwrap_or(Commands::Dashboard);

    // The dashboard owns the terminal, so logs go to a file or nowhere.
    init_logging(&config.logging, matches!(command, Commands::Dashboard))?;

    match command {
        Commands::Dashboard => {
            tracing::info!(server = %config.server.base_url, "starting dashboard client");
            vitascope::ui::run(config).await?;
        }

        Commands::Status => {
            let api = ApiClient::new(&config.server)?;
            let sample = api.live_data().await?.validate();
            let status = ConnectionStatus::from_sample(&sample);

            println!("Server:      {}", config.server.base_url);
            println!("Status:      {}", status);
            for (kind, reading) in sample.readings() {
                println!("{:<12} {} {}", format!("{}:", kind.label()), reading.display(), kind.unit());
            }
            if !sample.timestamp.is_empty() {
                println!("Measured:    {}", sample.timestamp);
            }
        }

        Commands::Config { output } => match output {
            Some(path) => {
                std::fs::write(&path, generate_default_config())?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", generate_default_config()),
        },
    }

    Ok(())
}

/// Initialize tracing. While the dashboard owns the terminal, output is
/// routed to the configured file or dropped entirely.
fn init_logging(logging: &LoggingConfig, tui: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vitascope={}", logging.level)),
    );

    match (&logging.file, tui) {
        (Some(path), _) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(std::sync::Arc::new(file)),
                )
                .init();
        }
        (None, true) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
                .init();
        }
        (None, false) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
