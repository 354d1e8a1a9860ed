use crate::model::Channel;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no notifier registered for channel {0}")]
    ChannelNotSupported(Channel),

    #[error("notification is not addressed for channel {0}")]
    MissingRecipient(Channel),

    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("email error: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("telegram api error: {0}")]
    Telegram(#[from] reqwest::Error),

    #[error("telegram api rejected message: {0}")]
    TelegramRejected(String),
}
