use super::Error;
use crate::model::Notification;
use axum::async_trait;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    ///
    /// Inserts a new notification and returns the stored projection.
    ///
    /// ### Errors
    /// - [Error::DuplicateRecord] when a notification with the
    /// same id already exists
    ///
    async fn save(&self, notification: &Notification) -> Result<Notification, Error>;

    ///
    /// Finds a notification by its id.
    ///
    /// ### Errors
    /// - [Error::NotFound] when notification does not exist
    ///
    async fn find_by_id(&self, id: Uuid) -> Result<Notification, Error>;

    ///
    /// Updates status, attempts and sent_at of the notification
    /// identified by `notification.id` in a single statement.
    ///
    /// ### Errors
    /// - [Error::NotFound] when notification does not exist
    ///
    async fn update(&self, notification: &Notification) -> Result<(), Error>;

    ///
    /// Sets status to cancelled. Unconditional at storage; callers
    /// check the prior state when a business rule demands it.
    ///
    /// ### Errors
    /// - [Error::NotFound] when notification does not exist
    ///
    async fn cancel(&self, id: Uuid) -> Result<(), Error>;
}
