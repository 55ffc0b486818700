//! Authentication Service
//!
//! Username/password accounts stored in SQLite and in-memory bearer
//! sessions with a fixed lifetime.
//!
//! Passwords are stored as hex HMAC-SHA256 keyed by a per-user random salt.

use crate::services::SqliteStore;
use crate::types::{RegisterRequest, Role, Session, TokenResponse, User};
use dashmap::DashMap;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type HmacSha256 = Hmac<Sha256>;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 6;

/// Authentication service for accounts and sessions.
#[derive(Clone)]
pub struct AuthService {
    /// Active sessions (session_token -> Session)
    sessions: Arc<DashMap<String, Session>>,
    store: Arc<SqliteStore>,
    ttl_minutes: i64,
}

fn hash_password(salt: &[u8], password: &str) -> Result<HmacSha256, AuthError> {
    let mut mac = HmacSha256::new_from_slice(salt)
        .map_err(|e| AuthError::Storage(format!("hmac key: {}", e)))?;
    mac.update(password.as_bytes());
    Ok(mac)
}

fn validate_username(username: &str) -> Result<(), AuthError> {
    let len = username.chars().count();
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) || !valid_chars {
        return Err(AuthError::InvalidUsername);
    }
    Ok(())
}

impl AuthService {
    pub fn new(store: Arc<SqliteStore>, ttl_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            store,
            ttl_minutes,
        }
    }

    /// Create a `free` account.
    pub fn register(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        let username = request.username.trim();
        validate_username(username)?;
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidPassword);
        }

        let salt: [u8; 16] = rand::thread_rng().gen();
        let hash = hash_password(&salt, &request.password)?
            .finalize()
            .into_bytes();

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: hex::encode(hash),
            salt: hex::encode(salt),
            role: Role::Free,
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let created = self.store.create_user(&user).map_err(|e| {
            error!("Failed to create user {}: {}", username, e);
            AuthError::Storage(e.to_string())
        })?;
        if !created {
            return Err(AuthError::UserExists);
        }

        info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Check credentials and issue a bearer token.
    pub fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .store
            .get_user(username.trim())
            .map_err(|e| AuthError::Storage(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !Self::verify_password(&user, password) {
            warn!("Failed login for {}", user.username);
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::new(user.username.clone(), user.role, self.ttl_minutes);
        self.sessions.insert(session.token.clone(), session.clone());
        info!("Authenticated user {}", user.username);

        Ok(TokenResponse {
            access_token: session.token,
            token_type: "bearer".to_string(),
            expires_at: session.expires_at,
        })
    }

    fn verify_password(user: &User, password: &str) -> bool {
        let (Ok(salt), Ok(expected)) = (hex::decode(&user.salt), hex::decode(&user.password_hash))
        else {
            return false;
        };
        match hash_password(&salt, password) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }

    /// Validate a session token, dropping it if expired.
    pub fn validate_session(&self, token: &str) -> Option<Session> {
        // Clone and drop the ref before removing to avoid deadlocks
        let session = self.sessions.get(token).map(|s| s.clone())?;
        if session.is_expired() {
            self.sessions.remove(token);
            debug!("Session for {} expired", session.username);
            return None;
        }
        Some(session)
    }

    /// Revoke a token. Returns whether it existed.
    pub fn logout(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Remove expired sessions. Returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        before.saturating_sub(self.sessions.len())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn get_user(&self, username: &str) -> Option<User> {
        self.store.get_user(username).ok().flatten()
    }
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username must be 3-32 characters of letters, digits, '_' or '-'")]
    InvalidUsername,

    #[error("Password must be at least 6 characters")]
    InvalidPassword,

    #[error("Username already registered")]
    UserExists,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Premium access required")]
    Forbidden,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match self {
            AuthError::InvalidUsername | AuthError::InvalidPassword => StatusCode::BAD_REQUEST,
            AuthError::UserExists => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
