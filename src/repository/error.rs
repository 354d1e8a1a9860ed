#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("record not found")]
    NotFound,

    #[error("duplicate record")]
    DuplicateRecord,

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("cache error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
