mod error;
mod service;

use std::process::ExitCode;
use std::sync::Arc;

use bull_scaler_core::{RedisStore, Scaler, ScalerConfig};
use bull_scaler_proto::external_scaler_server::ExternalScalerServer;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{error, info, warn};

use service::ExternalScalerService;

#[tokio::main]
async fn main() -> ExitCode {
    bull_scaler_core::telemetry::init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "bull-scaler failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ScalerConfig::load()?;
    info!(
        store = %config.store.addr(),
        listen_addr = %config.server.listen_addr,
        "configuration loaded"
    );

    // No listener is opened until the store has answered a PING.
    let store = RedisStore::connect(&config.store)
        .await
        .map_err(|e| format!("failed to connect to redis at {}: {e}", config.store.addr()))?;

    let scaler = Scaler::new(Arc::new(store), config.store.response_timeout());

    let listener = TcpListener::bind(config.server.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", config.server.listen_addr))?;
    let addr = listener.local_addr()?;
    info!(%addr, "starting gRPC server");

    Server::builder()
        .add_service(ExternalScalerServer::new(ExternalScalerService::new(scaler)))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown_signal())
        .await?;

    info!("gRPC server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                if let Err(e) = ctrl_c.await {
                    warn!(error = %e, "failed to install CTRL+C handler");
                    std::future::pending::<()>().await;
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = ctrl_c.await {
            warn!(error = %e, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    }

    info!("received shutdown signal");
}
