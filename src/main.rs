mod application;
mod consumer;
mod dto;
mod error;
mod model;
mod notifier;
mod repository;
mod routing;
mod service;

use application::ApplicationEnv;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    {
        // Ignore error because .env file is not required
        // as long as env variables are set
        let _ = dotenvy::dotenv();
    }

    let env = ApplicationEnv::parse()?;

    application::setup_tracing(&env)?;

    tracing::info!("creating application state");
    let (state, state_to_close, notifications_consumer) = application::create_state(&env).await?;

    tracing::info!("starting workers");
    let cancellation_token = CancellationToken::new();
    let worker_handles = notifications_consumer
        .start(
            &state_to_close.rabbitmq_connection,
            cancellation_token.clone(),
        )
        .await?;

    tracing::info!("creating application");
    let application = application::create_application(state);

    tracing::info!(address = %env.bind_address, "starting server");
    let listener = tokio::net::TcpListener::bind(env.bind_address).await?;
    axum::serve(listener, application)
        .with_graceful_shutdown(application::shutdown_signal())
        .await?;

    tracing::info!("stopping workers");
    cancellation_token.cancel();
    for worker_handle in worker_handles {
        // workers never panic
        worker_handle.await.unwrap();
    }
    drop(notifications_consumer);

    application::close(state_to_close).await;

    tracing::info!("application closed");

    Ok(())
}
