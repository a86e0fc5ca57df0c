use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Domain driver (auth view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthDriver {
    pub id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub driver_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Server-side session as the auth layer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub driver: AuthDriver,
    pub session_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT payload. `uid` and `sid` are the driver and session ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub sid: String,
    pub exp: usize,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentDriver {
    pub driver_id: Uuid,
    pub session_id: Uuid,
}
