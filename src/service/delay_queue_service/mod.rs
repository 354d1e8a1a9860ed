mod delay_queue_service;
mod error;
mod rabbitmq_delay_queue_service;

pub use delay_queue_service::DelayQueueService;
pub use error::Error;
pub use rabbitmq_delay_queue_service::{
    RabbitmqDelayQueueService, NOTIFICATIONS_EXCHANGE, NOTIFICATIONS_QUEUE, RETRY_EXCHANGE,
    RETRY_QUEUE, WAIT_EXCHANGE, WAIT_QUEUE,
};

#[cfg(test)]
pub use delay_queue_service::MockDelayQueueService;
