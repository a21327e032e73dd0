//! Form payloads and field-level validation.
//!
//! A failed validation is not an error: the handler re-renders the form with
//! the messages below and HTTP 200.

use serde::Deserialize;

/// One field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn optional(value: &Option<String>) -> Option<&str> {
    // HTML forms submit empty strings for untouched optional fields.
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// New-post / edit-post form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostForm {
    pub text: String,
    pub group: Option<String>,
    pub image_url: Option<String>,
}

impl PostForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.text.trim().is_empty() {
            errors.push(FieldError::new("text", "Post text must not be empty"));
        }
        errors
    }

    /// Selected group slug, if any.
    pub fn group(&self) -> Option<&str> {
        optional(&self.group)
    }

    pub fn image_url(&self) -> Option<&str> {
        optional(&self.image_url)
    }
}

/// Comment form on the post detail page.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.text.trim().is_empty() {
            errors.push(FieldError::new("text", "Comment text must not be empty"));
        }
        errors
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.username.is_empty() {
            errors.push(FieldError::new("username", "Username must not be empty"));
        } else if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            errors.push(FieldError::new(
                "username",
                "Usernames may only contain letters, digits, `_`, `.` and `-`",
            ));
        }
        if self.email.is_empty() || !self.email.contains('@') {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
        if self.password.len() < 8 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters",
            ));
        }
        errors
    }
}

/// Login form. `next` round-trips the destination the visitor was headed to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

impl LoginForm {
    /// Post-login destination. Only same-site paths are honored.
    pub fn next(&self) -> &str {
        match optional(&self.next) {
            Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
            _ => "/",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_text_is_required() {
        let form = PostForm {
            text: "  ".into(),
            ..PostForm::default()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "text");
    }

    #[test]
    fn empty_optional_fields_normalize_to_none() {
        let form = PostForm {
            text: "hello".into(),
            group: Some(String::new()),
            image_url: Some("  ".into()),
        };
        assert!(form.validate().is_empty());
        assert_eq!(form.group(), None);
        assert_eq!(form.image_url(), None);
    }

    #[test]
    fn signup_rules_match_the_login_form_fields() {
        let form = SignupForm {
            username: "bad name".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let fields: Vec<_> = form.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn login_next_rejects_offsite_targets() {
        let mut form = LoginForm {
            next: Some("/create/".into()),
            ..LoginForm::default()
        };
        assert_eq!(form.next(), "/create/");

        form.next = Some("https://evil.example".into());
        assert_eq!(form.next(), "/");

        form.next = Some("//evil.example".into());
        assert_eq!(form.next(), "/");

        form.next = None;
        assert_eq!(form.next(), "/");
    }
}
