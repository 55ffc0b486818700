//! Authentication Types
//!
//! Types for username/password login and bearer-token sessions.

use serde::{Deserialize, Serialize};

/// Access tier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Free,
    Premium,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Free => "free",
            Role::Premium => "premium",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Role::Free),
            "premium" => Some(Role::Premium),
            _ => None,
        }
    }
}

/// User account stored in SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: String,
    pub username: String,
    /// Hex-encoded HMAC-SHA256 of the password keyed by `salt`
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Hex-encoded random salt
    #[serde(skip_serializing)]
    pub salt: String,
    pub role: Role,
    /// When account was created (ms)
    pub created_at: i64,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token issued on successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// When the token expires (ms)
    pub expires_at: i64,
}

/// Bearer session held in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session token
    pub token: String,
    pub username: String,
    pub role: Role,
    /// When session was created (ms)
    pub created_at: i64,
    /// When session expires (ms)
    pub expires_at: i64,
}

impl Session {
    /// Create a new session with a random 32-byte token.
    pub fn new(username: String, role: Role, ttl_minutes: i64) -> Self {
        use rand::Rng;
        let now = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let bytes: [u8; 32] = rng.gen();

        Self {
            token: hex::encode(bytes),
            username,
            role,
            created_at: now,
            expires_at: now + ttl_minutes * 60 * 1000,
        }
    }

    /// Check if session has expired.
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp_millis() > self.expires_at
    }
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Role,
    #[serde(skip)]
    pub token: String,
}
