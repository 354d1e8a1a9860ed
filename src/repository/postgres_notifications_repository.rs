use super::{Error, NotificationsRepository};
use crate::model::{Channel, Notification, Status};
use axum::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

const UNIQUE_VIOLATION_CODE: &str = "23505";

pub struct PostgresNotificationsRepository {
    pool: PgPool,
}

impl PostgresNotificationsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    subject: String,
    message: String,
    channel: Channel,
    status: Status,
    attempts: i16,
    author_id: Option<String>,
    email_to: Option<String>,
    telegram_chat_id: Option<i64>,
    scheduled_at: OffsetDateTime,
    sent_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            subject: row.subject,
            message: row.message,
            channel: row.channel,
            status: row.status,
            attempts: row.attempts.into(),
            author_id: row.author_id,
            email_to: row.email_to,
            chat_id: row.telegram_chat_id,
            scheduled_at: row.scheduled_at,
            sent_at: row.sent_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl NotificationsRepository for PostgresNotificationsRepository {
    async fn save(&self, notification: &Notification) -> Result<Notification, Error> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (
                id, subject, message, channel, status, attempts, author_id,
                email_to, telegram_chat_id, scheduled_at, sent_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING
                id, subject, message, channel, status, attempts, author_id,
                email_to, telegram_chat_id, scheduled_at, sent_at, created_at, updated_at
            "#,
        )
        .bind(notification.id)
        .bind(&notification.subject)
        .bind(&notification.message)
        .bind(notification.channel)
        .bind(notification.status)
        .bind(notification.attempts as i16)
        .bind(&notification.author_id)
        .bind(&notification.email_to)
        .bind(notification.chat_id)
        .bind(notification.scheduled_at)
        .bind(notification.sent_at)
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION_CODE) =>
            {
                Error::DuplicateRecord
            }
            _ => Error::Sqlx(err),
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Notification, Error> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT
                id, subject, message, channel, status, attempts, author_id,
                email_to, telegram_chat_id, scheduled_at, sent_at, created_at, updated_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound)?;

        Ok(row.into())
    }

    async fn update(&self, notification: &Notification) -> Result<(), Error> {
        let update_result = sqlx::query(
            r#"
            UPDATE notifications
            SET status = $2,
                attempts = $3,
                sent_at = $4
            WHERE id = $1
            "#,
        )
        .bind(notification.id)
        .bind(notification.status)
        .bind(notification.attempts as i16)
        .bind(notification.sent_at)
        .execute(&self.pool)
        .await?;

        match update_result.rows_affected() {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    async fn cancel(&self, id: Uuid) -> Result<(), Error> {
        let update_result = sqlx::query(
            r#"
            UPDATE notifications
            SET status = 'cancelled'
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        match update_result.rows_affected() {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }
}
