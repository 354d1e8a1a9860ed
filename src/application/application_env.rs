use crate::notifier::{
    EmailNotifierConfig, NotifiersConfig, NotifiersMode, TelegramNotifierConfig,
};
use anyhow::{anyhow, Context};
use std::net::SocketAddr;

const DEFAULT_WORKERS_COUNT: usize = 5;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SMTP_PORT: u16 = 587;

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,

    pub bind_address: SocketAddr,

    pub db_connection_string: String,
    pub db_max_connections: u32,

    pub cache_connection_string: String,

    pub rabbitmq_connection_uri: String,

    pub workers_count: usize,

    pub notifiers_mode: NotifiersMode,
    pub email_notifier: Option<EmailNotifierConfig>,
    pub telegram_notifier: Option<TelegramNotifierConfig>,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        let log_directory = Self::env_var("DELAYED_NOTIFIER_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("DELAYED_NOTIFIER_LOG_FILENAME")?;

        let bind_address = Self::env_var("DELAYED_NOTIFIER_BIND_ADDRESS")?.parse()?;

        let db_connection_string = Self::env_var("DELAYED_NOTIFIER_DB_CONNECTION_STRING")?;
        let db_max_connections = match Self::env_var_opt("DELAYED_NOTIFIER_DB_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .context("invalid DELAYED_NOTIFIER_DB_MAX_CONNECTIONS")?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let cache_connection_string = Self::env_var("DELAYED_NOTIFIER_CACHE_CONNECTION_STRING")?;

        let rabbitmq_connection_uri = Self::env_var("DELAYED_NOTIFIER_RABBITMQ_CONNECTION_URI")?;

        let workers_count = match Self::env_var_opt("DELAYED_NOTIFIER_WORKERS_COUNT") {
            Some(value) => value
                .parse()
                .context("invalid DELAYED_NOTIFIER_WORKERS_COUNT")?,
            None => DEFAULT_WORKERS_COUNT,
        };

        let notifiers_mode = match Self::env_var_opt("DELAYED_NOTIFIER_NOTIFIERS_MODE") {
            Some(value) => value
                .parse()
                .map_err(|_| anyhow!("invalid DELAYED_NOTIFIER_NOTIFIERS_MODE: {value}"))?,
            None => NotifiersMode::LogOnly,
        };

        let email_notifier = match Self::env_var_opt("DELAYED_NOTIFIER_SMTP_HOST") {
            Some(host) => Some(EmailNotifierConfig {
                host,
                port: match Self::env_var_opt("DELAYED_NOTIFIER_SMTP_PORT") {
                    Some(value) => value.parse().context("invalid DELAYED_NOTIFIER_SMTP_PORT")?,
                    None => DEFAULT_SMTP_PORT,
                },
                username: Self::env_var_opt("DELAYED_NOTIFIER_SMTP_USERNAME").unwrap_or_default(),
                password: Self::env_var_opt("DELAYED_NOTIFIER_SMTP_PASSWORD").unwrap_or_default(),
                from: Self::env_var("DELAYED_NOTIFIER_SMTP_FROM")?,
            }),
            None => None,
        };

        let telegram_notifier = Self::env_var_opt("DELAYED_NOTIFIER_TELEGRAM_BOT_TOKEN")
            .map(|bot_token| TelegramNotifierConfig { bot_token });

        Ok(Self {
            log_directory,
            log_filename,
            bind_address,
            db_connection_string,
            db_max_connections,
            cache_connection_string,
            rabbitmq_connection_uri,
            workers_count,
            notifiers_mode,
            email_notifier,
            telegram_notifier,
        })
    }

    pub fn notifiers_config(&self) -> NotifiersConfig {
        NotifiersConfig {
            mode: self.notifiers_mode,
            email: self.email_notifier.clone(),
            telegram: self.telegram_notifier.clone(),
        }
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }

    fn env_var_opt(name: &'static str) -> Option<String> {
        std::env::var(name).ok()
    }
}
