mod notifications_service;
mod notifications_service_impl;

pub use notifications_service::NotificationsService;
pub use notifications_service_impl::NotificationsServiceImpl;

#[cfg(test)]
pub use notifications_service::MockNotificationsService;
