use lousa_core::{AppError, hash_password, normalize_email, normalize_phone};
use lousa_db::unique_violation;
use lousa_models::{UpdateProfileDto, User, UserProfile};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub(crate) const USER_COLUMNS: &str =
    "id, school_id, name, email, cpf, phone, user_type, is_active, is_staff, is_superuser, created_at";

pub(crate) const EMAIL_TAKEN: &str = "A user with this email already exists.";
pub(crate) const CPF_TAKEN: &str = "A user with this CPF already exists.";

/// Maps a unique-constraint violation on `users` to the field it guards.
/// Any other error is a 500.
pub(crate) fn user_write_error(err: sqlx::Error) -> AppError {
    match unique_violation(&err) {
        Some("users_email_key") => AppError::field("email", EMAIL_TAKEN),
        Some("users_cpf_key") => AppError::field("cpf", CPF_TAKEN),
        _ => AppError::internal(err),
    }
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_active_user(db: &PgPool, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_active"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// True when `email` (already normalized) belongs to a user other than
    /// `exclude`.
    #[instrument(skip(db))]
    pub async fn email_taken(
        db: &PgPool,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(db)
        .await?;

        Ok(taken)
    }

    /// Applies the present fields of `dto` to the user's own record.
    ///
    /// Returns 401 when the user no longer exists or is inactive, since the
    /// caller's token no longer names a usable account.
    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<UserProfile, AppError> {
        let email = dto.email.as_deref().map(normalize_email);
        let phone = dto.phone.as_deref().map(normalize_phone);

        if let Some(email) = &email {
            if Self::email_taken(db, email, Some(user_id)).await? {
                return Err(AppError::field("email", EMAIL_TAKEN));
            }
        }

        let hashed_password = dto.password.as_deref().map(hash_password).transpose()?;

        let profile = sqlx::query_as::<_, UserProfile>(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                password = COALESCE($5, password)
             WHERE id = $1 AND is_active
             RETURNING id, name, email, phone",
        )
        .bind(user_id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(email)
        .bind(phone)
        .bind(hashed_password)
        .fetch_optional(db)
        .await
        .map_err(user_write_error)?
        .ok_or_else(|| AppError::unauthorized("User not found or inactive".to_string()))?;

        Ok(profile)
    }
}
