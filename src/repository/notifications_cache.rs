use super::Error;
use crate::model::Notification;
use axum::async_trait;
use std::time::Duration;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsCache: Send + Sync {
    ///
    /// Finds a cached notification.
    ///
    /// ### Errors
    /// - [Error::NotFound] on cache miss
    ///
    async fn find_by_id(&self, id: Uuid) -> Result<Notification, Error>;

    ///
    /// Caches the notification for `ttl`.
    ///
    async fn insert(&self, notification: &Notification, ttl: Duration) -> Result<(), Error>;

    ///
    /// Removes the notification from the cache.
    ///
    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}
