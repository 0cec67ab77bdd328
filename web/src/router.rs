use crate::controller::{health_check_controller, notification_controller};
use crate::sse::handler::sse_handler;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(sse_routes(app_state.clone()))
        .merge(hook_routes(app_state))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn sse_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/events", get(sse_handler))
        .with_state(app_state)
}

// Called by the message store, not by end users
fn hook_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/hooks/message_created",
            post(notification_controller::message_created),
        )
        .with_state(app_state)
}
