mod notification;

pub use notification::{Channel, Notification, Status};
