//! Authentication request and response bodies.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::users::UserSummary;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required").with_message(Cow::Borrowed("This field is required.")))
    } else {
        Ok(())
    }
}

/// Credentials for `POST /auth/login` and `POST /token`.
///
/// The email is deliberately not format-checked: any mismatch yields the same
/// generic credential error.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "ana@x.com")]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    #[schema(example = "secret1")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "This field is required."))]
    pub refresh: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(custom(function = "not_blank"))]
    #[schema(example = "ana@x.com")]
    pub email: String,
}

/// Reset passwords are held to 8 characters, stricter than registration's 6.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "This field is required."))]
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    #[schema(example = "newpass1")]
    pub password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    #[schema(example = "newpass1")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ValidateResetTokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidTokenResponse {
    pub valid: bool,
}

/// Error body of the reset token validation endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct DetailResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
