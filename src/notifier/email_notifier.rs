use super::{Error, Notifier};
use crate::model::Notification;
use axum::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Clone)]
pub struct EmailNotifierConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

///
/// SMTP transport for the email channel.
///
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailNotifier {
    pub fn new(config: EmailNotifierConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();
        let from = config.from.parse::<Mailbox>()?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), Error> {
        let Some(email_to) = notification.email_to.as_deref() else {
            return Err(Error::MissingRecipient(notification.channel));
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(email_to.parse::<Mailbox>()?)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.message.clone())?;

        self.transport.send(message).await?;

        tracing::info!(
            id = %notification.id,
            recipient = email_to,
            "email sent"
        );

        Ok(())
    }
}
