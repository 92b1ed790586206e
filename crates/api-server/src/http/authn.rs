use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::errors::unauthorized_response;
use super::session_token::{extract_session_token, verify_session_token};
use super::{AppState, AuthUser};

pub(super) async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(req.headers()) else {
        warn!("missing session token");
        return unauthorized_response();
    };

    let session = match verify_session_token(&token, &state.jwt_secret) {
        Ok(session) => session,
        Err(err) => {
            warn!(code = err.code(), "session token rejected");
            return unauthorized_response();
        }
    };

    req.extensions_mut().insert(AuthUser {
        user_id: session.user_id,
    });
    next.run(req).await
}
