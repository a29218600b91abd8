//! Graceful shutdown on Ctrl+C or SIGTERM

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install {signal} handler: {source}")]
    Install {
        signal: &'static str,

        #[source]
        source: io::Error,
    },
}

impl ShutdownSignalError {
    fn install(signal: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Install { signal, source }
    }
}

#[cfg(unix)]
async fn terminate() -> Result<(), ShutdownSignalError> {
    use tokio::signal::unix::{SignalKind, signal as unix_signal};

    unix_signal(SignalKind::terminate())
        .map_err(ShutdownSignalError::install("SIGTERM"))?
        .recv()
        .await;

    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> Result<(), ShutdownSignalError> {
    std::future::pending().await
}

/// Wait for a stop signal, then let in-flight requests finish.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownSignalError> {
    let received = tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownSignalError::install("Ctrl+C"))?;

            "ctrl_c"
        }
        result = terminate() => {
            result?;

            "terminate"
        }
    };

    info!(signal = received, "shutdown signal received, draining requests");

    handle.stop_graceful(None);

    Ok(())
}
