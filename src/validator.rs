use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use lousa_core::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that runs `validator` rules after deserializing.
///
/// Malformed bodies become a plain 400; a missing field is reported against
/// that field, and rule failures carry every offending field's messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

fn missing_field(message: &str) -> Option<&str> {
    message
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let message = rejection.body_text();

    if let Some(field) = missing_field(&message) {
        return AppError::field(field, "This field is required.");
    }

    if message.contains("invalid type") {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        value.validate().map_err(|errors| AppError::validation(&errors))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_name() {
        let message = "Failed to deserialize the JSON body into the target type: missing field `email` at line 1 column 2";
        assert_eq!(missing_field(message), Some("email"));
        assert_eq!(missing_field("expected value at line 1 column 1"), None);
    }
}
