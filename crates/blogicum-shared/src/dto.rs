//! Data Transfer Objects - submitted forms and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

const REQUIRED: &str = "This field is required.";

fn default_published() -> bool {
    true
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(REQUIRED.into()));
    }
    Ok(())
}

fn valid_username(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    let valid = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !valid {
        return Err(ValidationError::new("invalid_username").with_message(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .into(),
        ));
    }
    Ok(())
}

fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && !value.validate_email() {
        return Err(ValidationError::new("email").with_message("Enter a valid email address.".into()));
    }
    Ok(())
}

/// Post create/edit form. The author is never part of the form.
///
/// Omitted fields deserialize to blanks so that validation reports them per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 256, message = "Ensure this value has at most 256 characters.")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    /// A future date schedules the publication.
    #[serde(default)]
    #[validate(required(message = "This field is required."))]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub image: Option<String>,
    #[serde(default)]
    pub location: Option<Uuid>,
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

/// Comment add/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

/// Profile edit form, always bound to the requester's own account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(
        custom(function = "valid_username"),
        length(max = 150, message = "Ensure this value has at most 150 characters.")
    )]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,
    #[serde(default)]
    #[validate(custom(function = "blank_or_email"))]
    pub email: String,
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[serde(default)]
    #[validate(
        custom(function = "valid_username"),
        length(max = 150, message = "Ensure this value has at most 150 characters.")
    )]
    pub username: String,
    #[serde(default)]
    #[validate(length(
        min = 8,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "blank_or_email"))]
    pub email: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Query of the login prompt; `next` is where the guard bounced the client from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginPrompt {
    pub next: Option<String>,
}

/// `?page=` of a listing, kept raw so that junk falls back to the first page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_form() -> PostForm {
        PostForm {
            title: "Белые ночи".to_string(),
            text: "Text".to_string(),
            pub_date: Some(Utc::now()),
            image: None,
            location: None,
            category: None,
            is_published: true,
        }
    }

    #[test]
    fn test_valid_post_form() {
        assert!(post_form().validate().is_ok());
    }

    #[test]
    fn test_blank_and_long_titles_rejected() {
        let mut form = post_form();
        form.title = "   ".to_string();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        // Length is counted in characters, not bytes.
        form.title = "ж".repeat(256);
        assert!(form.validate().is_ok());
        form.title = "ж".repeat(257);
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_post_form_defaults() {
        let form: PostForm = serde_json::from_value(serde_json::json!({
            "title": "t",
            "text": "x",
            "pub_date": "2024-01-01T00:00:00Z",
            "author": "00000000-0000-0000-0000-000000000000"
        }))
        .unwrap();
        assert!(form.is_published);
        assert_eq!(form.category, None);
    }

    #[test]
    fn test_omitted_post_fields_reported_per_field() {
        let form: PostForm = serde_json::from_value(serde_json::json!({ "text": "x" })).unwrap();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("pub_date"));
        assert!(!fields.contains_key("text"));
        let message = fields["pub_date"][0].message.as_deref();
        assert_eq!(message, Some(REQUIRED));
    }

    #[test]
    fn test_profile_form_rules() {
        let form = ProfileForm {
            username: "bad name".into(),
            first_name: String::new(),
            last_name: String::new(),
            email: "not-an-email".into(),
        };
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));

        let blank_email = ProfileForm {
            username: "good.name".into(),
            first_name: "Lev".into(),
            last_name: String::new(),
            email: String::new(),
        };
        assert!(blank_email.validate().is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let request = RegisterUserRequest {
            username: "reader".into(),
            password: "short".into(),
            email: String::new(),
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("password"));
    }
}
