//! Authentication API
//!
//! 1. POST /api/auth/register - Create an account
//! 2. POST /api/auth/login - Exchange username/password for a bearer token
//! 3. GET /api/auth/me - Current user (requires auth)
//! 4. GET /api/auth/premium - Premium-only probe (requires auth)
//! 5. POST /api/auth/logout - Revoke the current token

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::services::AuthError;
use crate::types::{AuthenticatedUser, LoginRequest, RegisterRequest, Role, TokenResponse, User};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_me))
        .route("/premium", get(premium))
        .route("/logout", post(logout))
}

/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AuthError> {
    let user = state.auth_service.register(&request)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = state
        .auth_service
        .login(&request.username, &request.password)?;
    Ok(Json(token))
}

/// GET /api/auth/me
async fn get_me(auth: Authenticated) -> Json<AuthenticatedUser> {
    Json(auth.user)
}

#[derive(Debug, Serialize)]
struct PremiumResponse {
    message: String,
}

/// GET /api/auth/premium
async fn premium(auth: Authenticated) -> Result<Json<PremiumResponse>, AuthError> {
    if auth.user.role != Role::Premium {
        return Err(AuthError::Forbidden);
    }
    Ok(Json(PremiumResponse {
        message: format!("Welcome, {}", auth.user.username),
    }))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// POST /api/auth/logout
async fn logout(State(state): State<AppState>, auth: Authenticated) -> Json<LogoutResponse> {
    let success = state.auth_service.logout(&auth.user.token);
    Json(LogoutResponse { success })
}

/// Authenticated user extractor.
///
/// Use this in route handlers to require a valid bearer token:
/// ```ignore
/// async fn my_handler(auth: Authenticated) -> impl IntoResponse {
///     let user = auth.user;
///     // ...
/// }
/// ```
pub struct Authenticated {
    pub user: AuthenticatedUser,
}

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get("Authorization")?.to_str().ok()?;
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::Unauthorized)?;

        let session = state
            .auth_service
            .validate_session(token)
            .ok_or(AuthError::Unauthorized)?;

        Ok(Authenticated {
            user: AuthenticatedUser {
                username: session.username,
                role: session.role,
                token: session.token,
            },
        })
    }
}
