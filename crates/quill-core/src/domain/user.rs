use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// User entity - an author identified by a unique username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamp.
    ///
    /// Usernames are addressable in URLs (`/profile/{username}/`), so the
    /// accepted alphabet is restricted to `[A-Za-z0-9_.-]`.
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<Self, DomainError> {
        validate_username(&username)?;

        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        })
    }
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::Validation("username must not be empty".into()));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(DomainError::Validation(format!(
            "username `{username}` contains characters outside [A-Za-z0-9_.-]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_url_safe_usernames() {
        assert!(User::new("leo_42".into(), "leo@example.com".into(), "hash".into()).is_ok());
    }

    #[test]
    fn rejects_empty_and_unsafe_usernames() {
        assert!(User::new(String::new(), "a@b.c".into(), "hash".into()).is_err());
        assert!(User::new("space name".into(), "a@b.c".into(), "hash".into()).is_err());
        assert!(User::new("sla/sh".into(), "a@b.c".into(), "hash".into()).is_err());
    }
}
