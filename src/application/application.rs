use super::ApplicationState;
use crate::routing::routing;
use axum::{http::Request, Router};
use tower_http::trace::{MakeSpan, TraceLayer};
use uuid::Uuid;

pub fn create_application(application_state: ApplicationState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(RequestMakeSpan);

    routing().layer(trace).with_state(application_state)
}

#[derive(Clone)]
struct RequestMakeSpan;

impl<B> MakeSpan<B> for RequestMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> tracing::Span {
        let request_id = Uuid::new_v4();
        tracing::info_span!(
            "Request",
            %request_id,
            method = %request.method(),
            uri = %request.uri(),
        )
    }
}
