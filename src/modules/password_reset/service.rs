use chrono::{Duration, Utc};
use lousa_config::PasswordResetConfig;
use lousa_core::hash_password;
use lousa_models::{PasswordResetToken, ResetTokenError, UserSummary};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use super::token::{generate_token, hash_token};

const TOKEN_COLUMNS: &str = "id, user_id, token_hash, created_at, expires_at";

pub struct PasswordResetService;

impl PasswordResetService {
    /// Creates a token for `user_id` and returns the raw value, which is
    /// never stored. With `revoke_previous_tokens`, the user's earlier tokens
    /// are deleted in the same transaction.
    #[instrument(skip(db, config))]
    pub async fn issue(
        db: &PgPool,
        user_id: Uuid,
        config: &PasswordResetConfig,
    ) -> Result<String, ResetTokenError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(config.token_ttl_hours);

        let mut tx = db.begin().await?;

        if config.revoke_previous_tokens {
            sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(hash_token(&token))
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(user_id = %user_id, expires_at = %expires_at, "Password reset token issued");
        Ok(token)
    }

    /// Read-only check. An expired row is reported but left in place.
    #[instrument(skip(db, token))]
    pub async fn validate(db: &PgPool, token: &str) -> Result<PasswordResetToken, ResetTokenError> {
        let row = sqlx::query_as::<_, PasswordResetToken>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM password_reset_tokens WHERE token_hash = $1"
        ))
        .bind(hash_token(token))
        .fetch_optional(db)
        .await?
        .ok_or(ResetTokenError::NotFound)?;

        row.ensure_usable(Utc::now())?;
        Ok(row)
    }

    /// Consumes `token` and sets the owner's password.
    ///
    /// The confirmation is compared before the store is touched. The token
    /// row is locked, its expiry re-checked and the row deleted in the same
    /// transaction as the password update, so two concurrent resets with one
    /// token cannot both succeed: the loser observes `NotFound`.
    #[instrument(skip(db, token, password, confirm_password, config))]
    pub async fn reset(
        db: &PgPool,
        token: &str,
        password: &str,
        confirm_password: &str,
        config: &PasswordResetConfig,
    ) -> Result<UserSummary, ResetTokenError> {
        if password != confirm_password {
            return Err(ResetTokenError::Mismatch);
        }

        let hashed_password = hash_password(password).map_err(ResetTokenError::Internal)?;

        let mut tx = db.begin().await?;

        let row = sqlx::query_as::<_, PasswordResetToken>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM password_reset_tokens WHERE token_hash = $1 FOR UPDATE"
        ))
        .bind(hash_token(token))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ResetTokenError::NotFound)?;

        row.ensure_usable(Utc::now())?;

        let user = sqlx::query_as::<_, UserSummary>(
            "UPDATE users SET password = $1 WHERE id = $2 RETURNING id, name, email",
        )
        .bind(&hashed_password)
        .bind(row.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ResetTokenError::NotFound)?;

        if config.revoke_previous_tokens {
            sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
                .bind(row.user_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("DELETE FROM password_reset_tokens WHERE id = $1")
                .bind(row.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(user_id = %user.id, "Password reset completed");
        Ok(user)
    }
}
