//! Ticket desk HTTP server.
//!
//! ```bash
//! cargo run -p ticket-desk
//! curl -X POST localhost:8080/tickets \
//!   -H 'content-type: application/json' \
//!   -d '{"subject":"Broken pump","description":"Pump #4 stopped"}'
//! curl localhost:8080/tickets
//! ```

use std::sync::Arc;
use ticket_desk::{
    config::DEFAULT_LOG_FILTER, handlers::AppState, new_store, router::ticket_router, Config,
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.server.log_level)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ticket Desk HTTP Server");

    let addr = config.listen_addr()?;
    info!(
        %addr,
        reply_timeout_ms = config.tickets.reply_timeout_ms,
        "Configuration loaded"
    );

    let state = AppState::new(Arc::new(new_store()), config.reply_timeout());
    let app = ticket_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
