//! Application error type.
//!
//! [`AppError`] pairs an HTTP status with an [`anyhow::Error`] and, for input
//! validation failures, a map of per-field messages. Handlers return
//! `Result<_, AppError>` and the error renders itself as JSON:
//!
//! ```json
//! { "error": "email: This email is already in use.", "errors": { "email": ["This email is already in use."] } }
//! ```
//!
//! Any error convertible into [`anyhow::Error`] (for example `sqlx::Error`) becomes
//! a 500 through `?`. Server errors are logged and their cause is not exposed.

use std::collections::BTreeMap;

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Field name to list of human-readable messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub fields: Option<FieldErrors>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow!(message))
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message))
    }

    /// A 400 carrying a single field-level message.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        Self::from_fields(fields)
    }

    /// A 400 carrying the given field-level messages.
    pub fn from_fields(fields: FieldErrors) -> Self {
        let summary = fields
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |msg| format!("{}: {}", field, msg))
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow!(summary),
            fields: Some(fields),
        }
    }

    /// Converts `validator` output into a 400 with per-field messages.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self::from_fields(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = ?self.error, "Request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(ErrorResponse {
            error: message,
            errors: self.fields,
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
