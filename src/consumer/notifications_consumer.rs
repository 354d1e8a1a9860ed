use crate::{
    model::{Notification, Status},
    notifier::{self, Notifier},
    service::{
        delay_queue_service::{DelayQueueService, NOTIFICATIONS_QUEUE},
        notifications_service::NotificationsService,
    },
};
use amqprs::{
    callbacks::DefaultChannelCallback,
    channel::{
        BasicAckArguments, BasicConsumeArguments, BasicNackArguments, BasicQosArguments, Channel,
    },
    connection::Connection,
};
use std::{sync::Arc, time::Duration};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const MAX_RETRIES: i32 = 5;
const BASE_RETRY_DELAY_SECS: u64 = 5;

pub struct NotificationsConsumerConfig {
    pub workers_count: usize,
}

///
/// Pool of workers consuming the ready queue.
///
/// Each worker owns a private channel on the shared connection with
/// prefetch = 1 and manual acknowledgement, so the broker hands out
/// one unacknowledged message per worker at a time.
///
pub struct NotificationsConsumer {
    config: NotificationsConsumerConfig,
    notifications_service: Arc<dyn NotificationsService>,
    delay_queue_service: Arc<dyn DelayQueueService>,
    dispatcher: Arc<dyn Notifier>,
}

impl NotificationsConsumer {
    pub fn new(
        config: NotificationsConsumerConfig,
        notifications_service: Arc<dyn NotificationsService>,
        delay_queue_service: Arc<dyn DelayQueueService>,
        dispatcher: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            notifications_service,
            delay_queue_service,
            dispatcher,
        }
    }

    ///
    /// Spawns the worker tasks. Workers run until the token is
    /// cancelled; an in-flight message always reaches a terminal
    /// broker decision before its worker returns.
    ///
    pub async fn start(
        &self,
        connection: &Connection,
        cancellation_token: CancellationToken,
    ) -> anyhow::Result<Vec<JoinHandle<()>>> {
        tracing::info!(count = self.config.workers_count, "starting worker pool");

        let mut handles = Vec::with_capacity(self.config.workers_count);

        for worker_id in 1..=self.config.workers_count {
            let channel = connection.open_channel(None).await?;
            channel.register_callback(DefaultChannelCallback).await?;

            let worker = Worker {
                worker_id,
                notifications_service: Arc::clone(&self.notifications_service),
                delay_queue_service: Arc::clone(&self.delay_queue_service),
                dispatcher: Arc::clone(&self.dispatcher),
                max_retries: MAX_RETRIES,
            };
            let cancellation_token = cancellation_token.clone();

            handles.push(tokio::spawn(async move {
                worker.run(channel, cancellation_token).await;
            }));
        }

        Ok(handles)
    }
}

///
/// Terminal broker decision for a consumed message.
///
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Ack,
    /// Nack with requeue; the message will be redelivered.
    Requeue,
    /// Nack without requeue; the message is poison and leaves
    /// the system.
    Reject,
}

struct Worker {
    worker_id: usize,
    notifications_service: Arc<dyn NotificationsService>,
    delay_queue_service: Arc<dyn DelayQueueService>,
    dispatcher: Arc<dyn Notifier>,
    max_retries: i32,
}

impl Worker {
    #[tracing::instrument(name = "Worker", skip_all, fields(worker_id = self.worker_id))]
    async fn run(self, channel: Channel, cancellation_token: CancellationToken) {
        if let Err(err) = self.consume(&channel, &cancellation_token).await {
            tracing::error!(%err, "worker failed");
        }

        if let Err(err) = channel.close().await {
            tracing::warn!(%err, "failed to close worker channel");
        }

        tracing::info!("worker stopped");
    }

    async fn consume(
        &self,
        channel: &Channel,
        cancellation_token: &CancellationToken,
    ) -> anyhow::Result<()> {
        channel.basic_qos(BasicQosArguments::new(0, 1, false)).await?;

        let consumer_tag = format!("worker-{}", self.worker_id);
        let args = BasicConsumeArguments::new(NOTIFICATIONS_QUEUE, &consumer_tag)
            .manual_ack(true)
            .finish();
        let (_, mut messages_rx) = channel.basic_consume_rx(args).await?;

        tracing::info!("worker waiting for messages");

        loop {
            tokio::select! {
                biased;

                _ = cancellation_token.cancelled() => {
                    tracing::info!("worker stopping");
                    break;
                }
                message = messages_rx.recv() => {
                    let Some(message) = message else {
                        tracing::warn!("message stream closed by broker");
                        break;
                    };
                    let Some(deliver) = message.deliver else {
                        continue;
                    };

                    let content = message.content.unwrap_or_default();
                    let outcome = self.handle_message(&content).await;
                    self.settle(channel, deliver.delivery_tag(), outcome).await;
                }
            }
        }

        Ok(())
    }

    async fn settle(&self, channel: &Channel, delivery_tag: u64, outcome: Outcome) {
        let settle_result = match outcome {
            Outcome::Ack => {
                channel
                    .basic_ack(BasicAckArguments::new(delivery_tag, false))
                    .await
            }
            Outcome::Requeue => {
                channel
                    .basic_nack(BasicNackArguments::new(delivery_tag, false, true))
                    .await
            }
            Outcome::Reject => {
                channel
                    .basic_nack(BasicNackArguments::new(delivery_tag, false, false))
                    .await
            }
        };

        if let Err(err) = settle_result {
            tracing::warn!(%err, delivery_tag, "failed to settle message");
        }
    }

    async fn handle_message(&self, content: &[u8]) -> Outcome {
        let notification = match serde_json::from_slice::<Notification>(content) {
            Ok(notification) => notification,
            Err(err) => {
                tracing::warn!(%err, "failed to decode message, rejecting");
                return Outcome::Reject;
            }
        };

        self.process_notification(notification).await
    }

    async fn process_notification(&self, notification: Notification) -> Outcome {
        // The store, not the message, is the source of truth for
        // status. This is the cancellation observation point and also
        // handles replays of already-sent messages.
        let current_status = match self
            .notifications_service
            .get_notification(notification.id)
            .await
        {
            Ok(current) => current.status,
            Err(err) => {
                tracing::warn!(%err, id = %notification.id, "failed to revalidate, discarding");
                return Outcome::Ack;
            }
        };

        if current_status != Status::Scheduled {
            tracing::info!(
                id = %notification.id,
                status = %current_status,
                "notification no longer scheduled, discarding"
            );
            return Outcome::Ack;
        }

        tracing::info!(
            id = %notification.id,
            attempt = notification.attempts + 1,
            "processing notification"
        );

        match self.dispatcher.send(&notification).await {
            Ok(()) => self.complete(notification).await,
            Err(err) => self.retry(notification, err).await,
        }
    }

    async fn complete(&self, mut notification: Notification) -> Outcome {
        notification.status = Status::Sent;
        notification.sent_at = Some(OffsetDateTime::now_utc());

        match self
            .notifications_service
            .update_notification(&notification)
            .await
        {
            Ok(()) => {
                tracing::info!(id = %notification.id, "notification sent");
                Outcome::Ack
            }
            Err(err) => {
                // never mark sent without a durable record
                tracing::error!(%err, id = %notification.id, "failed to record successful send");
                Outcome::Requeue
            }
        }
    }

    async fn retry(&self, mut notification: Notification, send_err: notifier::Error) -> Outcome {
        notification.attempts += 1;

        if notification.attempts >= self.max_retries {
            tracing::error!(
                %send_err,
                id = %notification.id,
                attempts = notification.attempts,
                "retries exhausted, failing notification"
            );
            notification.status = Status::Failed;

            return match self
                .notifications_service
                .update_notification(&notification)
                .await
            {
                Ok(()) => Outcome::Ack,
                Err(err) => {
                    tracing::error!(%err, id = %notification.id, "failed to record failure");
                    Outcome::Requeue
                }
            };
        }

        let backoff = exponential_backoff(notification.attempts);
        tracing::warn!(
            %send_err,
            id = %notification.id,
            attempt = notification.attempts,
            backoff_secs = backoff.as_secs(),
            "send failed, scheduling retry"
        );

        match self
            .delay_queue_service
            .publish_retry(&notification, backoff)
            .await
        {
            Ok(()) => Outcome::Ack,
            Err(err) => {
                // prefer a redelivery over silent loss
                tracing::error!(%err, id = %notification.id, "failed to publish retry");
                Outcome::Requeue
            }
        }
    }
}

fn exponential_backoff(attempts: i32) -> Duration {
    Duration::from_secs(BASE_RETRY_DELAY_SECS * 2u64.pow(attempts as u32))
}
