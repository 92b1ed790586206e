use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::models::{ChatHistoryResponse, ChatRequest, ChatResponse};
use tracing::{debug, warn};

use super::errors::bad_request_response;
use super::{AppState, AuthUser};

pub(super) async fn post_chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(user_id = %user.user_id, "chat request body rejected: {rejection}");
            return bad_request_response("invalid_request", "Request body must be JSON");
        }
    };

    let Some(message) = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
    else {
        return bad_request_response("message_required", "Message is required");
    };

    debug!(user_id = %user.user_id, chars = message.chars().count(), "chat query received");
    let reply = state.responder.respond(message, Some(&user.user_id)).await;

    (StatusCode::OK, Json(ChatResponse { message: reply })).into_response()
}

pub(super) async fn get_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let turns = state.responder.conversations().get(&user.user_id).await;
    (StatusCode::OK, Json(ChatHistoryResponse { turns })).into_response()
}
