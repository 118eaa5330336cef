//! User domain models and DTOs.
//!
//! The `users` row never leaves the service layer with its password hash:
//! [`User`] omits it, and the narrower [`UserSummary`] / [`UserProfile`]
//! projections are what endpoints return.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use lousa_core::normalize::{is_valid_phone, normalize_email};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    #[default]
    Student,
    Teacher,
    Admin,
}

/// A user as stored, minus the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub school_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub cpf: Option<String>,
    /// Digits only, 10 or 11 of them.
    pub phone: String,
    pub user_type: UserType,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// Columns needed to authenticate.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_active: bool,
}

/// Minimal public view returned by login and `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<&UserCredentials> for UserSummary {
    fn from(user: &UserCredentials) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// View returned by profile updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message(Cow::Borrowed("Phone must contain 10 or 11 digits.")))
    }
}

/// Longest email the `users.email` column holds.
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 150;

/// Checks the email format after normalization, so surrounding whitespace
/// and case never cause a rejection on their own.
pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    let email = normalize_email(email);
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::new("email").with_message(Cow::Borrowed(
            "Ensure this field has no more than 254 characters.",
        )));
    }
    if email.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email")
            .with_message(Cow::Borrowed("Enter a valid email address.")))
    }
}

/// Names are stored trimmed, so the length rule applies to the trimmed value.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let length = name.trim().chars().count();
    if (1..=MAX_NAME_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(ValidationError::new("name").with_message(Cow::Borrowed(
            "Name must have between 1 and 150 characters.",
        )))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUserDto {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Ana")]
    pub name: String,
    #[validate(custom(function = "validate_email_address"))]
    #[schema(example = "ana@x.com")]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    #[schema(example = "(11) 91234-5678")]
    pub phone: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    #[schema(example = "secret1")]
    pub password: String,
    /// National ID (CPF). Optional, unique when present.
    #[validate(length(max = 14, message = "CPF must have at most 14 characters."))]
    #[serde(default)]
    pub cpf: Option<String>,
}

/// Partial update of the authenticated user's own profile.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_email_address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: Option<String>,
}
