use super::{DelayQueueService, Error};
use crate::model::Notification;
use amqprs::{
    callbacks::DefaultChannelCallback,
    channel::{
        BasicPublishArguments, Channel, ExchangeDeclareArguments, ExchangeType,
        QueueBindArguments, QueueDeclareArguments,
    },
    connection::Connection,
    BasicProperties, FieldTable, FieldValue,
};
use axum::async_trait;
use std::time::Duration;
use time::OffsetDateTime;

pub const NOTIFICATIONS_EXCHANGE: &str = "notifications.exchange";
pub const WAIT_EXCHANGE: &str = "wait.exchange";
pub const RETRY_EXCHANGE: &str = "retry.exchange";

pub const NOTIFICATIONS_QUEUE: &str = "notifications.queue.process";
pub const WAIT_QUEUE: &str = "wait.queue.delay";
pub const RETRY_QUEUE: &str = "retry.queue.delay";

const DEAD_LETTER_EXCHANGE_ARGUMENT: &str = "x-dead-letter-exchange";

///
/// Publisher realizing delayed delivery entirely through broker
/// topology. Messages published to the wait and retry exchanges sit
/// in their delay queues until the per-message TTL expires, at which
/// point dead-letter routing forwards them to the ready queue
/// consumed by the workers. No in-process timers are involved, so
/// schedules survive restarts.
///
pub struct RabbitmqDelayQueueService {
    channel: Channel,
}

impl RabbitmqDelayQueueService {
    #[tracing::instrument(name = "Delay Queue", skip_all)]
    pub async fn new(connection: &Connection) -> anyhow::Result<Self> {
        tracing::info!("opening publisher channel");
        let channel = connection.open_channel(None).await?;
        channel.register_callback(DefaultChannelCallback).await?;

        tracing::info!("declaring topology");
        declare_topology(&channel).await?;

        Ok(Self { channel })
    }

    pub async fn close(self) {
        if let Err(err) = self.channel.close().await {
            tracing::warn!(%err, "failed to close publisher channel");
        }
    }

    async fn send(
        &self,
        exchange: &str,
        notification: &Notification,
        delay: u64,
    ) -> Result<(), Error> {
        let content = serde_json::to_vec(notification)?;

        let basic_properties = BasicProperties::default()
            .with_content_type("application/json")
            .with_persistence(true)
            .with_expiration(&delay.to_string())
            .finish();
        let args = BasicPublishArguments::new(exchange, "");

        self.channel
            .basic_publish(basic_properties, content, args)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl DelayQueueService for RabbitmqDelayQueueService {
    async fn publish(&self, notification: &Notification) -> Result<(), Error> {
        let delay = delay_millis(notification.scheduled_at, OffsetDateTime::now_utc());

        tracing::debug!(id = %notification.id, delay, "publishing to wait queue");
        self.send(WAIT_EXCHANGE, notification, delay).await
    }

    async fn publish_retry(
        &self,
        notification: &Notification,
        delay: Duration,
    ) -> Result<(), Error> {
        let delay = delay.as_millis().min(u64::MAX as u128) as u64;

        tracing::debug!(id = %notification.id, delay, "publishing to retry queue");
        self.send(RETRY_EXCHANGE, notification, delay).await
    }
}

///
/// Declares the exchanges, queues and bindings of the delay
/// pipeline. Idempotent; every process declares on startup.
///
pub async fn declare_topology(channel: &Channel) -> Result<(), amqprs::error::Error> {
    for exchange in [NOTIFICATIONS_EXCHANGE, WAIT_EXCHANGE, RETRY_EXCHANGE] {
        let args = ExchangeDeclareArguments::of_type(exchange, ExchangeType::Direct)
            .durable(true)
            .finish();
        channel.exchange_declare(args).await?;
    }

    let args = QueueDeclareArguments::new(NOTIFICATIONS_QUEUE)
        .durable(true)
        .finish();
    channel.queue_declare(args).await?;

    for queue in [WAIT_QUEUE, RETRY_QUEUE] {
        let args = QueueDeclareArguments::new(queue)
            .durable(true)
            .arguments(dead_letter_arguments())
            .finish();
        channel.queue_declare(args).await?;
    }

    channel
        .queue_bind(QueueBindArguments::new(
            NOTIFICATIONS_QUEUE,
            NOTIFICATIONS_EXCHANGE,
            "",
        ))
        .await?;
    channel
        .queue_bind(QueueBindArguments::new(WAIT_QUEUE, WAIT_EXCHANGE, ""))
        .await?;
    channel
        .queue_bind(QueueBindArguments::new(RETRY_QUEUE, RETRY_EXCHANGE, ""))
        .await?;

    Ok(())
}

fn dead_letter_arguments() -> FieldTable {
    let mut arguments = FieldTable::new();

    // static names, conversion cannot fail
    arguments.insert(
        DEAD_LETTER_EXCHANGE_ARGUMENT.to_owned().try_into().unwrap(),
        FieldValue::S(NOTIFICATIONS_EXCHANGE.to_owned().try_into().unwrap()),
    );

    arguments
}

fn delay_millis(scheduled_at: OffsetDateTime, now: OffsetDateTime) -> u64 {
    let delay = (scheduled_at - now).whole_milliseconds();

    delay.clamp(0, u64::MAX as i128) as u64
}
