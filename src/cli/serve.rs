use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::load_config;
use crate::errors::SmugglerError;

pub async fn handle_serve(args: ServeArgs) -> Result<(), SmugglerError> {
    let file = load_config(args.scanner.config.as_deref()).await?;
    let scanner = Arc::new(file.scanner_config(&args.scanner.overrides()));
    let server = file.server_config(&args.overrides());

    if !scanner.smuggler_path.exists() {
        warn!(path = %scanner.smuggler_path.display(), "Smuggler script not found, tool calls will fail until it is installed");
    }

    info!(
        host = %server.host,
        port = server.port,
        python_bin = %scanner.python_bin.display(),
        smuggler_path = %scanner.smuggler_path.display(),
        max_duration_secs = ?scanner.max_duration.map(|d| d.as_secs()),
        "Starting tool server"
    );

    let app = api::build_router(api::AppState::new(scanner));

    let addr = server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| SmugglerError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
