use crate::{error::Error, model::Notification};
use axum::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    ///
    /// Validates the recipient for the channel, persists the
    /// notification and publishes it to the delay queue.
    ///
    /// ### Errors
    /// - [Error::Validation] when the channel is unknown, the subject
    /// is empty or the recipient does not parse for the channel
    /// - [Error::NotificationAlreadyExist] on id collision
    ///
    async fn create_notification(
        &self,
        recipient: String,
        channel: String,
        subject: String,
        message: String,
        scheduled_at: OffsetDateTime,
        author_id: Option<String>,
    ) -> Result<Notification, Error>;

    ///
    /// Finds a notification by id.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when notification does not exist
    ///
    async fn get_notification(&self, id: Uuid) -> Result<Notification, Error>;

    ///
    /// Cancels a scheduled notification. The in-flight broker message
    /// is not purged; workers drop it on revalidation.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when notification does not exist
    /// - [Error::InvalidState] when notification is not scheduled
    ///
    async fn cancel_notification(&self, id: Uuid) -> Result<(), Error>;

    ///
    /// Persists a delivery attempt outcome. Used by the workers.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when notification does not exist
    ///
    async fn update_notification(&self, notification: &Notification) -> Result<(), Error>;
}
