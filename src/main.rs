//! Syntax highlighting HTTP service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               HIGHLIGHT SERVICE              │
//!                      │                                              │
//!                      │  startup:                                    │
//!                      │  ┌──────────┐  ┌──────────┐  ┌────────────┐  │
//!                      │  │ registry │─▶│ explicit │─▶│ route      │  │
//!                      │  │ (kinds)  │  │ + auto   │  │ table      │  │
//!                      │  └──────────┘  └──────────┘  └─────┬──────┘  │
//!                      │                                    ▼         │
//!     Client Request   │  ┌──────────┐  ┌──────────┐  ┌────────────┐  │
//!     ─────────────────┼─▶│  http    │─▶│ handlers │─▶│ highlight  │  │
//!     ◀────────────────┼──│  server  │◀─│          │◀─│ backend    │  │
//!                      │  └──────────┘  └──────────┘  └────────────┘  │
//!                      │                                              │
//!                      │  config · observability · lifecycle          │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use highlight_service::config::{load_config, AppConfig};
use highlight_service::highlight::PlainHighlighter;
use highlight_service::observability::{logging, metrics};
use highlight_service::{bootstrap, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "highlight-service")]
#[command(about = "Syntax highlighting over HTTP", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configured one.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log at debug level.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if args.debug {
        config.observability.log_level = "debug".to_string();
    }
    if let Some(port) = args.port {
        let mut addr: SocketAddr = config.listener.bind_address.parse()?;
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }

    logging::init(&config.observability.log_level);
    tracing::info!("highlight-service v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let application = bootstrap(&config)?;
    let server = HttpServer::new(&config, application, Arc::new(PlainHighlighter::new()))?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let receiver = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move { trigger.on_ctrl_c().await });

    server.run(listener, receiver).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
