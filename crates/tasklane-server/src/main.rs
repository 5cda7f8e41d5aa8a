//! Tasklane Server

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tasklane_server::{http, AppState, Config};

/// Tasklane task-management HTTP server.
#[derive(Parser, Debug)]
#[command(name = "tasklane-server", about = "Tasklane task-management HTTP server")]
struct Args {
    /// HTTP server address
    #[arg(long, default_value = "127.0.0.1:8080")]
    http_addr: String,

    /// Page size for paginated listings
    #[arg(long, default_value = "15")]
    items_per_page: u64,

    /// Locale for user-facing messages
    #[arg(long, default_value = "en")]
    locale: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            http_addr: args.http_addr,
            items_per_page: args.items_per_page,
            locale: args.locale,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tasklane=info,tower_http=info")),
        )
        .with_target(true)
        .init();

    // Load config
    let config = Config::from(Args::parse());
    let http_addr: SocketAddr = config.http_addr.parse()?;

    let state = AppState::in_memory(&config);
    let router = http::create_router(state);

    let listener = TcpListener::bind(http_addr).await?;
    info!(
        http_addr = %http_addr,
        items_per_page = config.items_per_page,
        locale = %config.locale,
        "Starting Tasklane server"
    );

    axum::serve(listener, router).await?;

    Ok(())
}
