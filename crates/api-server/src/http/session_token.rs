use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

const SESSION_COOKIE_NAME: &str = "auth_token";
const CLIENT_TOKEN_HEADER: &str = "x-auth-token";
const MAX_CLOCK_SKEW_SECONDS: u64 = 30;

#[derive(Debug, Deserialize)]
struct SessionClaims {
    id: String,
}

#[derive(Debug, Clone)]
pub(super) struct VerifiedSession {
    pub(super) user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SessionTokenError {
    Expired,
    Invalid,
    MissingSubject,
}

impl SessionTokenError {
    pub(super) fn code(self) -> &'static str {
        match self {
            Self::Expired => "expired_session_token",
            Self::Invalid => "invalid_session_token",
            Self::MissingSubject => "session_token_missing_id",
        }
    }
}

/// Finds the session token: bearer header first, then the session cookie,
/// then the client-side token header.
pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    let cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE_NAME && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string());
    if cookie.is_some() {
        return cookie;
    }

    headers
        .get(CLIENT_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

pub(super) fn verify_session_token(
    token: &str,
    secret: &str,
) -> Result<VerifiedSession, SessionTokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.leeway = MAX_CLOCK_SKEW_SECONDS;
    validation.required_spec_claims = ["exp"].into_iter().map(str::to_string).collect();

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionTokenError::Expired,
        _ => SessionTokenError::Invalid,
    })?;

    let user_id = token_data.claims.id.trim();
    if user_id.is_empty() {
        return Err(SessionTokenError::MissingSubject);
    }

    Ok(VerifiedSession {
        user_id: user_id.to_string(),
    })
}
