use futures::stream::StreamExt;
use signal_hook::consts::signal::*;
use signal_hook_tokio::Signals;
use tracing::{error, info, warn};

/// Resolves on SIGTERM or SIGINT. Used to drive graceful shutdown.
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT, SIGHUP]) {
        Ok(signals) => signals.fuse(),
        Err(e) => {
            error!("Failed to install signal handlers: {}", e);
            return std::future::pending().await;
        }
    };

    while let Some(signal) = signals.next().await {
        match signal {
            SIGTERM | SIGINT => {
                info!("Received shutdown signal, gracefully shutting down...");
                return;
            }
            SIGHUP => {
                info!("Received HUP signal - configuration is read at startup only, restart to apply changes");
            }
            _ => {
                warn!("Received unknown signal: {}", signal);
            }
        }
    }
}
