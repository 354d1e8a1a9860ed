use super::{Error, NotificationsCache};
use crate::model::Notification;
use axum::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use uuid::Uuid;

pub struct RedisNotificationsCache {
    connection: ConnectionManager,
}

impl RedisNotificationsCache {
    pub async fn new(connection_string: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(connection_string)?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self { connection })
    }
}

fn notification_key(id: Uuid) -> String {
    format!("redis:notification:{id}")
}

#[async_trait]
impl NotificationsCache for RedisNotificationsCache {
    async fn find_by_id(&self, id: Uuid) -> Result<Notification, Error> {
        let key = notification_key(id);
        let mut connection = self.connection.clone();

        let value: Option<String> = connection.get(&key).await?;
        let value = value.ok_or(Error::NotFound)?;

        let notification = serde_json::from_str(&value)?;

        Ok(notification)
    }

    async fn insert(&self, notification: &Notification, ttl: Duration) -> Result<(), Error> {
        let key = notification_key(notification.id);
        let value = serde_json::to_string(notification)?;
        let mut connection = self.connection.clone();

        let _: () = connection.set_ex(&key, value, ttl.as_secs()).await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        let key = notification_key(id);
        let mut connection = self.connection.clone();

        let _: () = connection.del(&key).await?;

        Ok(())
    }
}
