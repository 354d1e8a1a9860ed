use crate::model::{self, Channel, Status};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

///
/// Projection returned by the API. Recipient details are
/// deliberately not exposed.
///
#[derive(Debug, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub status: Status,
    pub channel: Channel,
    pub subject: String,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<model::Notification> for Notification {
    fn from(notification: model::Notification) -> Self {
        Self {
            id: notification.id,
            status: notification.status,
            channel: notification.channel,
            subject: notification.subject,
            scheduled_at: notification.scheduled_at,
            created_at: notification.created_at,
        }
    }
}
