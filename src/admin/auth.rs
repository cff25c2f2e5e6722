//! Admin login and session handling.
//!
//! Credentials come from the environment (one operator account); a
//! successful login mints an opaque random token kept in process memory.
//! Tokens die with the process, like the original's server-side sessions.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{AppError, AppResult};
use super::AppState;

const TOKEN_LEN: usize = 32;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.username != state.settings.admin_username
        || req.password != state.settings.admin_password
    {
        warn!(username = %req.username, "Login failed - invalid credentials");
        return Err(AppError::InvalidCredentials);
    }

    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    state.sessions.write().await.insert(token.clone());

    info!(username = %req.username, "Admin logged in");
    Ok(Json(LoginResponse { token }))
}

/// POST /admin/logout — revokes the presented token.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Json<bool>> {
    let Some(token) = bearer_token(&headers) else {
        return Err(AppError::Unauthorized);
    };
    let removed = state.sessions.write().await.remove(token);
    Ok(Json(removed))
}

/// Middleware guarding every admin route except login.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = match bearer_token(request.headers()) {
        Some(token) => state.sessions.read().await.contains(token),
        None => false,
    };
    if !authorized {
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);
    }
}
