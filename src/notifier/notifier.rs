use super::Error;
use crate::model::Notification;
use axum::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    ///
    /// Delivers the notification through the channel transport.
    ///
    /// Transport failures drive the worker retry state machine and
    /// are never surfaced to API callers.
    ///
    async fn send(&self, notification: &Notification) -> Result<(), Error>;
}
