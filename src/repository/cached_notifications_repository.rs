use super::{Error, NotificationsCache, NotificationsRepository};
use crate::model::Notification;
use axum::async_trait;
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

///
/// Decorator composing the primary repository with a cache.
///
/// The primary repository is authoritative; the cache is an
/// accelerator whose failures are logged and never surfaced.
/// Writes invalidate the cached entry instead of rewriting it.
///
pub struct CachedNotificationsRepository {
    primary: Arc<dyn NotificationsRepository>,
    cache: Arc<dyn NotificationsCache>,
    ttl: Duration,
}

impl CachedNotificationsRepository {
    pub fn new(
        primary: Arc<dyn NotificationsRepository>,
        cache: Arc<dyn NotificationsCache>,
    ) -> Self {
        Self {
            primary,
            cache,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

#[async_trait]
impl NotificationsRepository for CachedNotificationsRepository {
    async fn save(&self, notification: &Notification) -> Result<Notification, Error> {
        let saved = self.primary.save(notification).await?;

        if let Err(err) = self.cache.insert(&saved, self.ttl).await {
            tracing::warn!(%err, id = %saved.id, "failed to cache notification after save");
        }

        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Notification, Error> {
        match self.cache.find_by_id(id).await {
            Ok(notification) => {
                tracing::debug!(%id, "cache hit");
                return Ok(notification);
            }
            Err(Error::NotFound) => tracing::debug!(%id, "cache miss"),
            Err(err) => tracing::warn!(%err, %id, "cache read failed, falling back to store"),
        }

        let notification = self.primary.find_by_id(id).await?;

        if let Err(err) = self.cache.insert(&notification, self.ttl).await {
            tracing::warn!(%err, %id, "failed to cache notification after read");
        }

        Ok(notification)
    }

    async fn update(&self, notification: &Notification) -> Result<(), Error> {
        self.primary.update(notification).await?;

        if let Err(err) = self.cache.delete(notification.id).await {
            tracing::warn!(%err, id = %notification.id, "failed to invalidate cache after update");
        }

        Ok(())
    }

    async fn cancel(&self, id: Uuid) -> Result<(), Error> {
        self.primary.cancel(id).await?;

        if let Err(err) = self.cache.delete(id).await {
            tracing::warn!(%err, %id, "failed to invalidate cache after cancel");
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        model::Notification,
        repository::{MockNotificationsCache, MockNotificationsRepository},
    };
    use time::macros::datetime;

    fn create_notification() -> Notification {
        Notification::new_email(
            "someone@example.com".to_string(),
            "subject".to_string(),
            "message".to_string(),
            datetime!(2024-05-01 12:00:00 UTC),
            None,
        )
    }

    fn cache_error() -> Error {
        Error::Serialization(serde_json::from_str::<Notification>("{").unwrap_err())
    }

    #[tokio::test]
    async fn save_caches_stored_projection() {
        let notification = create_notification();
        let saved = notification.clone();
        let saved_id = saved.id;

        let mut primary = MockNotificationsRepository::new();
        primary
            .expect_save()
            .times(1)
            .returning(move |_| Ok(saved.clone()));

        let mut cache = MockNotificationsCache::new();
        cache
            .expect_insert()
            .times(1)
            .withf(move |cached, ttl| cached.id == saved_id && *ttl == DEFAULT_CACHE_TTL)
            .returning(|_, _| Ok(()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let result = repository.save(&notification).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn save_cache_failure_not_surfaced() {
        let notification = create_notification();
        let saved = notification.clone();

        let mut primary = MockNotificationsRepository::new();
        primary.expect_save().returning(move |_| Ok(saved.clone()));

        let mut cache = MockNotificationsCache::new();
        cache.expect_insert().returning(|_, _| Err(cache_error()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let result = repository.save(&notification).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn save_duplicate_id_skips_cache() {
        let id = Uuid::from_u128(7498127391);
        let first = create_notification().with_id(id);
        let second = create_notification().with_id(id);

        let mut primary = MockNotificationsRepository::new();
        let mut saved_ids = Vec::new();
        primary.expect_save().times(2).returning(move |notification| {
            match saved_ids.contains(&notification.id) {
                true => Err(Error::DuplicateRecord),
                false => {
                    saved_ids.push(notification.id);
                    Ok(notification.clone())
                }
            }
        });

        let mut cache = MockNotificationsCache::new();
        cache.expect_insert().times(1).returning(|_, _| Ok(()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let first_result = repository.save(&first).await;
        let second_result = repository.save(&second).await;

        assert!(first_result.is_ok());
        assert!(matches!(second_result, Err(Error::DuplicateRecord)));
    }

    #[tokio::test]
    async fn find_by_id_cache_hit_skips_primary() {
        let notification = create_notification();
        let id = notification.id;

        let mut primary = MockNotificationsRepository::new();
        primary.expect_find_by_id().times(0);

        let mut cache = MockNotificationsCache::new();
        let cached = notification.clone();
        cache
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(cached.clone()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let found = repository.find_by_id(id).await.unwrap();

        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn find_by_id_cache_miss_falls_through_and_backfills() {
        let notification = create_notification();
        let id = notification.id;

        let mut primary = MockNotificationsRepository::new();
        let stored = notification.clone();
        primary
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(stored.clone()));

        let mut cache = MockNotificationsCache::new();
        cache
            .expect_find_by_id()
            .returning(|_| Err(Error::NotFound));
        cache
            .expect_insert()
            .times(1)
            .withf(move |cached, _| cached.id == id)
            .returning(|_, _| Ok(()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let found = repository.find_by_id(id).await.unwrap();

        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn find_by_id_cache_error_falls_through() {
        let notification = create_notification();
        let id = notification.id;

        let mut primary = MockNotificationsRepository::new();
        let stored = notification.clone();
        primary
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(stored.clone()));

        let mut cache = MockNotificationsCache::new();
        cache
            .expect_find_by_id()
            .returning(|_| Err(cache_error()));
        cache.expect_insert().returning(|_, _| Ok(()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let result = repository.find_by_id(id).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn find_by_id_not_in_store() {
        let mut primary = MockNotificationsRepository::new();
        primary
            .expect_find_by_id()
            .returning(|_| Err(Error::NotFound));

        let mut cache = MockNotificationsCache::new();
        cache
            .expect_find_by_id()
            .returning(|_| Err(Error::NotFound));
        cache.expect_insert().times(0);

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let result = repository.find_by_id(Uuid::new_v4()).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn update_invalidates_cache() {
        let notification = create_notification();
        let id = notification.id;

        let mut primary = MockNotificationsRepository::new();
        primary.expect_update().times(1).returning(|_| Ok(()));

        let mut cache = MockNotificationsCache::new();
        cache
            .expect_delete()
            .times(1)
            .withf(move |deleted_id| *deleted_id == id)
            .returning(|_| Ok(()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let result = repository.update(&notification).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn update_primary_failure_skips_invalidation() {
        let notification = create_notification();

        let mut primary = MockNotificationsRepository::new();
        primary.expect_update().returning(|_| Err(Error::NotFound));

        let mut cache = MockNotificationsCache::new();
        cache.expect_delete().times(0);

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let result = repository.update(&notification).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn cancel_invalidates_cache() {
        let id = Uuid::new_v4();

        let mut primary = MockNotificationsRepository::new();
        primary.expect_cancel().times(1).returning(|_| Ok(()));

        let mut cache = MockNotificationsCache::new();
        cache
            .expect_delete()
            .times(1)
            .withf(move |deleted_id| *deleted_id == id)
            .returning(|_| Ok(()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let result = repository.cancel(id).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn cancel_cache_failure_not_surfaced() {
        let mut primary = MockNotificationsRepository::new();
        primary.expect_cancel().returning(|_| Ok(()));

        let mut cache = MockNotificationsCache::new();
        cache.expect_delete().returning(|_| Err(cache_error()));

        let repository =
            CachedNotificationsRepository::new(Arc::new(primary), Arc::new(cache));

        let result = repository.cancel(Uuid::new_v4()).await;

        assert!(result.is_ok());
    }
}
