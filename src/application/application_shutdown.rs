use super::ApplicationStateToClose;
use std::sync::Arc;

pub async fn close(state: ApplicationStateToClose) {
    tracing::info!("closing delay queue publisher");
    match Arc::try_unwrap(state.delay_queue_service) {
        Ok(delay_queue_service) => delay_queue_service.close().await,
        Err(_) => tracing::error!("cannot close delay queue publisher"),
    }

    tracing::info!("closing rabbitmq connection");
    if let Err(err) = state.rabbitmq_connection.close().await {
        tracing::warn!(%err, "closing rabbitmq connection failed");
    }

    tracing::info!("closing connection with database");
    state.db_pool.close().await;
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("starting shutdown");
}
