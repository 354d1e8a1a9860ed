mod cached_notifications_repository;
mod error;
mod notifications_cache;
mod notifications_repository;
mod postgres_notifications_repository;
mod redis_notifications_cache;

pub use cached_notifications_repository::CachedNotificationsRepository;
pub use error::Error;
pub use notifications_cache::NotificationsCache;
pub use notifications_repository::NotificationsRepository;
pub use postgres_notifications_repository::PostgresNotificationsRepository;
pub use redis_notifications_cache::RedisNotificationsCache;

#[cfg(test)]
pub use notifications_cache::MockNotificationsCache;
#[cfg(test)]
pub use notifications_repository::MockNotificationsRepository;
