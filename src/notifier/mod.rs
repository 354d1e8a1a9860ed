mod email_notifier;
mod error;
mod log_notifier;
mod notifier;
mod notifier_dispatcher;
mod telegram_notifier;

pub use email_notifier::{EmailNotifier, EmailNotifierConfig};
pub use error::Error;
pub use log_notifier::LogNotifier;
pub use notifier::Notifier;
pub use notifier_dispatcher::{NotifierDispatcher, NotifiersConfig, NotifiersMode};
pub use telegram_notifier::{TelegramNotifier, TelegramNotifierConfig};

#[cfg(test)]
pub use notifier::MockNotifier;
