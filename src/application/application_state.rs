use super::ApplicationEnv;
use crate::{
    consumer::{NotificationsConsumer, NotificationsConsumerConfig},
    notifier::{Notifier, NotifierDispatcher},
    repository::{
        CachedNotificationsRepository, NotificationsRepository, PostgresNotificationsRepository,
        RedisNotificationsCache,
    },
    service::{
        delay_queue_service::{DelayQueueService, RabbitmqDelayQueueService},
        notifications_service::{NotificationsService, NotificationsServiceImpl},
    },
};
use amqprs::{
    callbacks::DefaultConnectionCallback,
    connection::{Connection, OpenConnectionArguments},
};
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;

#[derive(Clone, FromRef)]
pub struct ApplicationState {
    pub notifications_service: Arc<dyn NotificationsService>,
}

pub struct ApplicationStateToClose {
    pub db_pool: PgPool,
    pub rabbitmq_connection: Connection,
    pub delay_queue_service: Arc<RabbitmqDelayQueueService>,
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(
    ApplicationState,
    ApplicationStateToClose,
    NotificationsConsumer,
)> {
    tracing::info!("connecting to database");
    let db_pool = PgPoolOptions::new()
        .max_connections(env.db_max_connections)
        .connect(&env.db_connection_string)
        .await?;

    tracing::info!("running database migrations");
    sqlx::migrate!().run(&db_pool).await?;

    tracing::info!("connecting to cache");
    let cache = RedisNotificationsCache::new(&env.cache_connection_string).await?;

    tracing::info!("connecting to rabbitmq");
    let open_connection_args =
        OpenConnectionArguments::try_from(env.rabbitmq_connection_uri.as_str())?;
    let rabbitmq_connection = Connection::open(&open_connection_args).await?;
    rabbitmq_connection
        .register_callback(DefaultConnectionCallback)
        .await?;

    tracing::info!("creating repositories");
    let notifications_repository = PostgresNotificationsRepository::new(db_pool.clone());
    let notifications_repository: Arc<dyn NotificationsRepository> = Arc::new(
        CachedNotificationsRepository::new(Arc::new(notifications_repository), Arc::new(cache)),
    );

    tracing::info!("creating delay queue publisher");
    let delay_queue_service = Arc::new(RabbitmqDelayQueueService::new(&rabbitmq_connection).await?);

    tracing::info!("creating services");
    let notifications_service: Arc<dyn NotificationsService> =
        Arc::new(NotificationsServiceImpl::new(
            notifications_repository,
            Arc::clone(&delay_queue_service) as Arc<dyn DelayQueueService>,
        ));

    tracing::info!("creating notifier dispatcher");
    let dispatcher: Arc<dyn Notifier> = Arc::new(NotifierDispatcher::new(env.notifiers_config())?);

    tracing::info!("creating consumer");
    let consumer = NotificationsConsumer::new(
        NotificationsConsumerConfig {
            workers_count: env.workers_count,
        },
        Arc::clone(&notifications_service),
        Arc::clone(&delay_queue_service) as Arc<dyn DelayQueueService>,
        dispatcher,
    );

    Ok((
        ApplicationState {
            notifications_service,
        },
        ApplicationStateToClose {
            db_pool,
            rabbitmq_connection,
            delay_queue_service,
        },
        consumer,
    ))
}
