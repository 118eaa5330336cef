//! Password reset tokens.
//!
//! A token row is created when a reset is requested, deleted when it is
//! consumed, and otherwise left alone: expiry is evaluated against the
//! current time on every use rather than swept in the background.

use chrono::{DateTime, Utc};
use lousa_core::AppError;
use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: Uuid,
    /// SHA-256 of the token handed to the user, hex encoded.
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// A token expires once its expiry instant is strictly in the past.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn ensure_usable(&self, now: DateTime<Utc>) -> Result<(), ResetTokenError> {
        if self.is_expired_at(now) {
            Err(ResetTokenError::Expired)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Error)]
pub enum ResetTokenError {
    #[error("Invalid token.")]
    NotFound,
    #[error("Token expired.")]
    Expired,
    #[error("Passwords do not match.")]
    Mismatch,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{}", .0.error)]
    Internal(AppError),
}

impl ResetTokenError {
    /// Maps the error onto the HTTP error taxonomy: token problems are
    /// reported on the `token` field, a mismatch on `confirm_password`.
    pub fn into_app_error(self) -> AppError {
        match self {
            Self::NotFound | Self::Expired => AppError::field("token", self.to_string()),
            Self::Mismatch => AppError::field("confirm_password", self.to_string()),
            Self::Database(err) => AppError::internal(err),
            Self::Internal(err) => err,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound | Self::Expired | Self::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> PasswordResetToken {
        PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "0".repeat(64),
            created_at: expires_at - Duration::hours(24),
            expires_at,
        }
    }

    #[test]
    fn test_token_usable_before_expiry() {
        let now = Utc::now();
        let token = token_expiring_at(now + Duration::hours(24));
        assert!(!token.is_expired_at(now));
        assert!(token.ensure_usable(now).is_ok());
    }

    #[test]
    fn test_token_usable_at_exact_expiry() {
        let now = Utc::now();
        let token = token_expiring_at(now);
        assert!(!token.is_expired_at(now));
    }

    #[test]
    fn test_token_expired_after_time_advances() {
        let issued = Utc::now();
        let token = token_expiring_at(issued + Duration::hours(24));

        assert!(token.ensure_usable(issued).is_ok());

        let later = issued + Duration::hours(24) + Duration::seconds(1);
        assert!(matches!(token.ensure_usable(later), Err(ResetTokenError::Expired)));
    }

    #[test]
    fn test_error_mapping() {
        let not_found = ResetTokenError::NotFound.into_app_error();
        assert_eq!(not_found.status.as_u16(), 400);
        assert_eq!(not_found.fields.unwrap()["token"], vec!["Invalid token.".to_string()]);

        let expired = ResetTokenError::Expired.into_app_error();
        assert_eq!(expired.fields.unwrap()["token"], vec!["Token expired.".to_string()]);

        let mismatch = ResetTokenError::Mismatch.into_app_error();
        assert!(mismatch.fields.unwrap().contains_key("confirm_password"));

        let database = ResetTokenError::Database(sqlx::Error::PoolTimedOut).into_app_error();
        assert_eq!(database.status.as_u16(), 500);
    }

    #[test]
    fn test_token_hash_not_serialized() {
        let token = token_expiring_at(Utc::now());
        let value = serde_json::to_value(&token).unwrap();
        assert!(value.get("token_hash").is_none());
    }
}
