pub mod delay_queue_service;
pub mod notifications_service;
