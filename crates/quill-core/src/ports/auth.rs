//! Authentication ports. Session state is a signed token carried in a
//! cookie; the web layer treats these services as given infrastructure.

use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub username: String,
    pub exp: i64,
}

/// Issues and verifies signed session tokens.
pub trait SessionTokenService: Send + Sync {
    /// Issue a session token for a user.
    fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Verify and decode a session token.
    fn verify(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Session lifetime, for the cookie's Max-Age.
    fn ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("No session")]
    MissingSession,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
