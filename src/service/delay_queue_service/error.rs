#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("broker error: {0}")]
    Broker(#[from] amqprs::error::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
