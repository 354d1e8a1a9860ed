mod notifications_consumer;

pub use notifications_consumer::{NotificationsConsumer, NotificationsConsumerConfig};
