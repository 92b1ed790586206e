use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::health_assistant::HealthQueryResponder;
use shared::repos::Store;

mod authn;
mod chat;
mod errors;
mod health;
mod observability;
mod session_token;

#[derive(Clone)]
pub struct AppState {
    pub responder: HealthQueryResponder,
    pub store: Option<Store>,
    pub jwt_secret: String,
}

#[derive(Clone)]
pub(super) struct AuthUser {
    pub(super) user_id: String,
}

pub fn build_router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .with_state(app_state.clone());

    let auth_layer_state = app_state.clone();

    let protected_routes = Router::new()
        .route("/api/chat", post(chat::post_chat))
        .route("/api/chat/history", get(chat::get_history))
        .layer(middleware::from_fn_with_state(
            auth_layer_state,
            authn::auth_middleware,
        ))
        .with_state(app_state);

    public_routes
        .merge(protected_routes)
        .layer(middleware::from_fn(
            observability::request_observability_middleware,
        ))
}
