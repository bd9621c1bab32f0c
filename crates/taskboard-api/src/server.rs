use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};

/// Serve until Ctrl+C or SIGTERM, then drain for at most `grace`.
pub async fn serve(listener: TcpListener, app: Router, grace: Duration) -> io::Result<()> {
    serve_until(listener, app, shutdown_signal(), grace).await
}

/// Serve until `shutdown` resolves. In-flight requests get `grace` to finish;
/// connections still open after that are dropped.
pub async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = drain_rx.await;
            })
            .await
    });

    supervise(server, drain_tx, shutdown, grace).await
}

/// Wait for either `shutdown` or the server exiting on its own. An early exit
/// is returned as is; a requested shutdown drains for at most `grace`.
async fn supervise<F>(
    mut server: JoinHandle<io::Result<()>>,
    drain: oneshot::Sender<()>,
    shutdown: F,
    grace: Duration,
) -> io::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        _ = shutdown => {}
        result = &mut server => {
            tracing::error!("Server exited before shutdown was requested");
            return flatten(result);
        }
    }

    tracing::info!(
        "Gracefully stopping server, draining for up to {}s",
        grace.as_secs()
    );
    let _ = drain.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => flatten(result),
        Err(_) => {
            tracing::warn!("Drain window elapsed, closing remaining connections");
            server.abort();
            Ok(())
        }
    }
}

fn flatten(result: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    match result {
        Ok(result) => result,
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM");
        },
    }
}
