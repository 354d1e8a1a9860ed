use crate::{model::Status, repository, service::delay_queue_service};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("notification not exist")]
    NotificationNotExist,

    #[error("validation error: {0}")]
    Validation(&'static str),

    #[error("notification already exist")]
    NotificationAlreadyExist,

    #[error("notification is not scheduled (status {0})")]
    InvalidState(Status),

    #[error("database error: {0}")]
    Database(repository::Error),

    #[error("queue error: {0}")]
    Queue(#[from] delay_queue_service::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::warn!(err = %self);

        match self {
            Error::NotificationNotExist => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotificationAlreadyExist => StatusCode::CONFLICT,
            Error::InvalidState(_) => StatusCode::CONFLICT,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Queue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
        .into_response()
    }
}
