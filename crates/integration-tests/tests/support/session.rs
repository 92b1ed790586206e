use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;

pub const TEST_JWT_SECRET: &str = "integration-test-jwt-secret";

#[derive(Debug, Serialize)]
struct TestClaims {
    id: String,
    email: String,
    iat: i64,
    exp: i64,
}

pub fn token_for_user(user_id: &str) -> String {
    sign(user_id, Duration::days(7), TEST_JWT_SECRET)
}

pub fn bearer_for_user(user_id: &str) -> String {
    format!("Bearer {}", token_for_user(user_id))
}

pub fn expired_token_for_user(user_id: &str) -> String {
    sign(user_id, Duration::hours(-1), TEST_JWT_SECRET)
}

pub fn token_signed_with(user_id: &str, secret: &str) -> String {
    sign(user_id, Duration::days(7), secret)
}

fn sign(user_id: &str, ttl: Duration, secret: &str) -> String {
    let now = Utc::now();
    let claims = TestClaims {
        id: user_id.to_string(),
        email: format!("{user_id}@example.test"),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("test token should sign")
}
