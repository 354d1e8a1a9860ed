use super::NotificationsService;
use crate::{
    error::Error,
    model::{Channel, Notification, Status},
    repository::{self, NotificationsRepository},
    service::delay_queue_service::DelayQueueService,
};
use axum::async_trait;
use lettre::Address;
use std::{str::FromStr, sync::Arc};
use time::OffsetDateTime;
use uuid::Uuid;

pub struct NotificationsServiceImpl {
    repository: Arc<dyn NotificationsRepository>,
    delay_queue: Arc<dyn DelayQueueService>,
}

impl NotificationsServiceImpl {
    pub fn new(
        repository: Arc<dyn NotificationsRepository>,
        delay_queue: Arc<dyn DelayQueueService>,
    ) -> Self {
        Self {
            repository,
            delay_queue,
        }
    }

    fn build_notification(
        recipient: String,
        channel: String,
        subject: String,
        message: String,
        scheduled_at: OffsetDateTime,
        author_id: Option<String>,
    ) -> Result<Notification, Error> {
        if subject.is_empty() {
            return Err(Error::Validation("subject cannot be empty"));
        }

        let channel =
            Channel::from_str(&channel).map_err(|_| Error::Validation("unknown channel"))?;

        let notification = match channel {
            Channel::Email => {
                let address = recipient
                    .parse::<Address>()
                    .map_err(|_| Error::Validation("invalid email address"))?;

                Notification::new_email(
                    address.to_string(),
                    subject,
                    message,
                    scheduled_at,
                    author_id,
                )
            }
            Channel::Telegram => {
                let chat_id = recipient
                    .parse::<i64>()
                    .map_err(|_| Error::Validation("invalid telegram chat id"))?;

                Notification::new_telegram(chat_id, subject, message, scheduled_at, author_id)
            }
        };

        Ok(notification)
    }
}

#[async_trait]
impl NotificationsService for NotificationsServiceImpl {
    async fn create_notification(
        &self,
        recipient: String,
        channel: String,
        subject: String,
        message: String,
        scheduled_at: OffsetDateTime,
        author_id: Option<String>,
    ) -> Result<Notification, Error> {
        tracing::info!(channel, "creating notification");

        let notification = Self::build_notification(
            recipient,
            channel,
            subject,
            message,
            scheduled_at,
            author_id,
        )?;

        let notification =
            self.repository
                .save(&notification)
                .await
                .map_err(|err| match err {
                    repository::Error::DuplicateRecord => Error::NotificationAlreadyExist,
                    err => Error::Database(err),
                })?;
        tracing::info!(id = %notification.id, "notification saved");

        // Save and publish are not atomic. A publish failure leaves a
        // scheduled row with no broker message; the error is surfaced
        // to the caller.
        self.delay_queue.publish(&notification).await?;
        tracing::info!(id = %notification.id, "notification published to delay queue");

        Ok(notification)
    }

    async fn get_notification(&self, id: Uuid) -> Result<Notification, Error> {
        let notification =
            self.repository
                .find_by_id(id)
                .await
                .map_err(|err| match err {
                    repository::Error::NotFound => Error::NotificationNotExist,
                    err => Error::Database(err),
                })?;

        Ok(notification)
    }

    async fn cancel_notification(&self, id: Uuid) -> Result<(), Error> {
        tracing::info!(%id, "cancelling notification");

        let notification = self.get_notification(id).await?;

        if notification.status != Status::Scheduled {
            return Err(Error::InvalidState(notification.status));
        }

        self.repository
            .cancel(id)
            .await
            .map_err(|err| match err {
                repository::Error::NotFound => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;
        tracing::info!(%id, "notification cancelled");

        Ok(())
    }

    async fn update_notification(&self, notification: &Notification) -> Result<(), Error> {
        self.repository
            .update(notification)
            .await
            .map_err(|err| match err {
                repository::Error::NotFound => Error::NotificationNotExist,
                err => Error::Database(err),
            })?;

        Ok(())
    }
}
