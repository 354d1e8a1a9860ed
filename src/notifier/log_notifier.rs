use super::{Error, Notifier};
use crate::model::Notification;
use axum::async_trait;

///
/// Transport that only logs the would-be delivery. Default for every
/// channel in `log_only` mode so the whole pipeline can be exercised
/// without external credentials.
///
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), Error> {
        tracing::info!(
            id = %notification.id,
            channel = %notification.channel,
            recipient = notification.recipient_description(),
            subject = notification.subject,
            "mock send: notification dispatched"
        );

        Ok(())
    }
}
