use super::Error;
use crate::model::Notification;
use axum::async_trait;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DelayQueueService: Send + Sync {
    ///
    /// Publishes the notification to the wait queue with a
    /// per-message expiration so that it reaches the ready queue
    /// no earlier than `notification.scheduled_at`.
    ///
    async fn publish(&self, notification: &Notification) -> Result<(), Error>;

    ///
    /// Publishes the notification to the retry queue with a
    /// per-message expiration of `delay`.
    ///
    async fn publish_retry(
        &self,
        notification: &Notification,
        delay: Duration,
    ) -> Result<(), Error>;
}
