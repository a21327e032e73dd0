use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Group entity - a named, slug-addressed category grouping posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group. The slug must be non-empty and URL-safe
    /// (`[a-z0-9-]`); uniqueness is enforced by the store.
    pub fn new(title: String, slug: String, description: String) -> Result<Self, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::Validation("group title must not be empty".into()));
        }
        validate_slug(&slug)?;

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description,
            created_at: Utc::now(),
        })
    }
}

fn validate_slug(slug: &str) -> Result<(), DomainError> {
    if slug.is_empty() {
        return Err(DomainError::Validation("slug must not be empty".into()));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(DomainError::Validation(format!(
            "slug `{slug}` contains characters outside [a-z0-9-]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_must_be_url_safe() {
        assert!(Group::new("Rust".into(), "rust-lang".into(), String::new()).is_ok());
        assert!(Group::new("Rust".into(), "Rust Lang".into(), String::new()).is_err());
        assert!(Group::new("Rust".into(), "rust/lang".into(), String::new()).is_err());
        assert!(Group::new("Rust".into(), String::new(), String::new()).is_err());
    }

    #[test]
    fn title_must_not_be_blank() {
        assert!(Group::new("  ".into(), "t1".into(), String::new()).is_err());
    }
}
