use super::{
    EmailNotifier, EmailNotifierConfig, Error, LogNotifier, Notifier, TelegramNotifier,
    TelegramNotifierConfig,
};
use crate::model::{Channel, Notification};
use axum::async_trait;
use std::{collections::HashMap, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum NotifiersMode {
    LogOnly,
    Production,
}

#[derive(Clone)]
pub struct NotifiersConfig {
    pub mode: NotifiersMode,
    pub email: Option<EmailNotifierConfig>,
    pub telegram: Option<TelegramNotifierConfig>,
}

///
/// Composite notifier routing each notification to the transport of
/// its channel. Every channel is populated with [LogNotifier] first;
/// in production mode configured channels are overridden with real
/// transports, so a channel without credentials keeps the log-only
/// behaviour.
///
pub struct NotifierDispatcher {
    notifiers: HashMap<Channel, Arc<dyn Notifier>>,
}

impl NotifierDispatcher {
    pub fn new(config: NotifiersConfig) -> anyhow::Result<Self> {
        let log_notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        let mut notifiers: HashMap<Channel, Arc<dyn Notifier>> = HashMap::from([
            (Channel::Email, Arc::clone(&log_notifier)),
            (Channel::Telegram, Arc::clone(&log_notifier)),
        ]);

        if config.mode == NotifiersMode::Production {
            if let Some(email_config) = config.email {
                notifiers.insert(Channel::Email, Arc::new(EmailNotifier::new(email_config)?));
                tracing::info!("email notifier enabled");
            }
            if let Some(telegram_config) = config.telegram {
                notifiers.insert(
                    Channel::Telegram,
                    Arc::new(TelegramNotifier::new(telegram_config)),
                );
                tracing::info!("telegram notifier enabled");
            }
        }

        Ok(Self { notifiers })
    }

    #[cfg(test)]
    pub fn from_notifiers(notifiers: HashMap<Channel, Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }
}

#[async_trait]
impl Notifier for NotifierDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), Error> {
        let notifier = self
            .notifiers
            .get(&notification.channel)
            .ok_or(Error::ChannelNotSupported(notification.channel))?;

        notifier.send(notification).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notifier::MockNotifier;
    use time::macros::datetime;

    fn create_notification(channel: Channel) -> Notification {
        match channel {
            Channel::Email => Notification::new_email(
                "someone@example.com".to_string(),
                "subject".to_string(),
                "message".to_string(),
                datetime!(2024-05-01 12:00:00 UTC),
                None,
            ),
            Channel::Telegram => Notification::new_telegram(
                123,
                "subject".to_string(),
                "message".to_string(),
                datetime!(2024-05-01 12:00:00 UTC),
                None,
            ),
        }
    }

    #[tokio::test]
    async fn send_routes_to_channel_notifier() {
        let mut email_notifier = MockNotifier::new();
        email_notifier.expect_send().times(1).returning(|_| Ok(()));

        let mut telegram_notifier = MockNotifier::new();
        telegram_notifier.expect_send().times(0);

        let dispatcher = NotifierDispatcher::from_notifiers(HashMap::from([
            (Channel::Email, Arc::new(email_notifier) as Arc<dyn Notifier>),
            (
                Channel::Telegram,
                Arc::new(telegram_notifier) as Arc<dyn Notifier>,
            ),
        ]));

        let result = dispatcher.send(&create_notification(Channel::Email)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn send_missing_mapping_fails() {
        let dispatcher = NotifierDispatcher::from_notifiers(HashMap::new());

        let result = dispatcher
            .send(&create_notification(Channel::Telegram))
            .await;

        assert!(matches!(
            result,
            Err(Error::ChannelNotSupported(Channel::Telegram))
        ));
    }

    #[tokio::test]
    async fn log_only_mode_populates_every_channel() {
        let dispatcher = NotifierDispatcher::new(NotifiersConfig {
            mode: NotifiersMode::LogOnly,
            email: None,
            telegram: None,
        })
        .unwrap();

        assert!(dispatcher
            .send(&create_notification(Channel::Email))
            .await
            .is_ok());
        assert!(dispatcher
            .send(&create_notification(Channel::Telegram))
            .await
            .is_ok());
    }

    #[test]
    fn notifiers_mode_parses_from_snake_case() {
        assert_eq!(
            "log_only".parse::<NotifiersMode>().unwrap(),
            NotifiersMode::LogOnly
        );
        assert_eq!(
            "production".parse::<NotifiersMode>().unwrap(),
            NotifiersMode::Production
        );
        assert!("staging".parse::<NotifiersMode>().is_err());
    }
}
