use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

///
/// Delivery channel of a notification. Determines which
/// recipient field is populated.
///
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "channel_type", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Channel {
    Email,
    Telegram,
}

///
/// Lifecycle state of a notification.
///
/// Transitions form a DAG: `scheduled` can move to `sent`,
/// `failed` or `cancelled`; those three are terminal.
///
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "notification_status", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Scheduled,
    Sent,
    Failed,
    Cancelled,
}

///
/// A single scheduled delivery request.
///
/// Exactly one recipient field is populated, matching [Self::channel].
/// The factory functions uphold this; the database enforces it again
/// with a CHECK constraint.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub subject: String,
    pub message: String,
    pub channel: Channel,
    pub status: Status,
    pub attempts: i32,
    pub author_id: Option<String>,

    pub email_to: Option<String>,
    pub chat_id: Option<i64>,

    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub sent_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Notification {
    pub fn new_email(
        email_to: String,
        subject: String,
        message: String,
        scheduled_at: OffsetDateTime,
        author_id: Option<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            id: Uuid::new_v4(),
            subject,
            message,
            channel: Channel::Email,
            status: Status::Scheduled,
            attempts: 0,
            author_id,
            email_to: Some(email_to),
            chat_id: None,
            scheduled_at,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_telegram(
        chat_id: i64,
        subject: String,
        message: String,
        scheduled_at: OffsetDateTime,
        author_id: Option<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();

        Self {
            id: Uuid::new_v4(),
            subject,
            message,
            channel: Channel::Telegram,
            status: Status::Scheduled,
            attempts: 0,
            author_id,
            email_to: None,
            chat_id: Some(chat_id),
            scheduled_at,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    ///
    /// Replaces the generated id. Meant for tests that need
    /// a predictable primary key.
    ///
    #[cfg(test)]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    ///
    /// Human readable recipient used in logs.
    ///
    pub fn recipient_description(&self) -> String {
        match self.channel {
            Channel::Email => self.email_to.clone().unwrap_or_default(),
            Channel::Telegram => self
                .chat_id
                .map(|chat_id| format!("chat {chat_id}"))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    use time::macros::datetime;

    #[test]
    fn new_email_notification_scheduled_with_zero_attempts() {
        let notification = Notification::new_email(
            "someone@example.com".to_string(),
            "subject".to_string(),
            "message".to_string(),
            datetime!(2024-05-01 12:00:00 UTC),
            None,
        );

        assert_eq!(notification.status, Status::Scheduled);
        assert_eq!(notification.attempts, 0);
        assert_eq!(notification.channel, Channel::Email);
        assert_eq!(notification.email_to.as_deref(), Some("someone@example.com"));
        assert!(notification.chat_id.is_none());
        assert!(notification.sent_at.is_none());
    }

    #[test]
    fn new_telegram_notification_recipient_matches_channel() {
        let notification = Notification::new_telegram(
            481209312,
            "subject".to_string(),
            "message".to_string(),
            datetime!(2024-05-01 12:00:00 UTC),
            Some("author".to_string()),
        );

        assert_eq!(notification.channel, Channel::Telegram);
        assert_eq!(notification.chat_id, Some(481209312));
        assert!(notification.email_to.is_none());
    }

    #[test]
    fn notification_json_round_trip_email() {
        let notification = Notification::new_email(
            "someone@example.com".to_string(),
            "subject".to_string(),
            String::new(),
            datetime!(2024-05-01 12:00:00 UTC),
            None,
        );

        let json = serde_json::to_string(&notification).unwrap();
        let decoded = serde_json::from_str::<Notification>(&json).unwrap();

        assert_eq!(decoded, notification);
    }

    #[test]
    fn notification_json_round_trip_telegram_with_sent_at() {
        let mut notification = Notification::new_telegram(
            -100123,
            "subject".to_string(),
            "message".to_string(),
            datetime!(2024-05-01 12:00:00 UTC),
            Some("author".to_string()),
        );
        notification.status = Status::Sent;
        notification.sent_at = Some(datetime!(2024-05-01 12:00:03 UTC));

        let json = serde_json::to_string(&notification).unwrap();
        let decoded = serde_json::from_str::<Notification>(&json).unwrap();

        assert_eq!(decoded, notification);
    }

    #[test]
    fn channel_parses_from_lowercase_string() {
        assert_eq!(Channel::from_str("email").unwrap(), Channel::Email);
        assert_eq!(Channel::from_str("telegram").unwrap(), Channel::Telegram);
        assert!(Channel::from_str("sms").is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Scheduled).unwrap();
        assert_eq!(json, r#""scheduled""#);
    }
}
