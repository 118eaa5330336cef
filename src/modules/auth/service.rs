use anyhow::anyhow;
use lousa_auth::{create_access_token, create_token_pair, verify_refresh_token};
use lousa_config::{EmailConfig, JwtConfig, PasswordResetConfig};
use lousa_core::{
    AppError, hash_password, normalize_cpf, normalize_email, normalize_phone, verify_password,
};
use lousa_models::{
    AccessTokenResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest,
    RegisterUserDto, ResetPasswordRequest, ResetTokenError, TokenPairResponse, User,
    UserCredentials, UserSummary, UserType,
};
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::modules::password_reset::PasswordResetService;
use crate::modules::users::service::{
    CPF_TAKEN, EMAIL_TAKEN, USER_COLUMNS, UserService, user_write_error,
};
use crate::utils::email::EmailService;

pub const LOGIN_FAILED: &str = "Unable to log in with provided credentials.";
pub const TOKEN_OBTAIN_FAILED: &str = "No active account found with the given credentials.";

/// Role and privilege flags set when an account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountFlags {
    pub user_type: UserType,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl AccountFlags {
    pub fn superuser() -> Self {
        Self {
            user_type: UserType::Admin,
            is_staff: true,
            is_superuser: true,
        }
    }
}

pub struct AuthService;

impl AuthService {
    /// Creates an account after normalizing its identifiers.
    ///
    /// The email and CPF pre-checks only give early, friendly errors; the
    /// unique constraints decide races, and a violation on insert is reported
    /// on the same field.
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_user(db: &PgPool, dto: RegisterUserDto) -> Result<User, AppError> {
        Self::create_account(db, dto, AccountFlags::default()).await
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_account(
        db: &PgPool,
        dto: RegisterUserDto,
        flags: AccountFlags,
    ) -> Result<User, AppError> {
        let email = normalize_email(&dto.email);
        let phone = normalize_phone(&dto.phone);
        let cpf = normalize_cpf(dto.cpf.as_deref());

        if UserService::email_taken(db, &email, None).await? {
            return Err(AppError::field("email", EMAIL_TAKEN));
        }

        if let Some(cpf) = &cpf {
            let cpf_taken =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE cpf = $1)")
                    .bind(cpf)
                    .fetch_one(db)
                    .await?;
            if cpf_taken {
                return Err(AppError::field("cpf", CPF_TAKEN));
            }
        }

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, cpf, phone, password, user_type, is_staff, is_superuser)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(&email)
        .bind(&cpf)
        .bind(&phone)
        .bind(&hashed_password)
        .bind(flags.user_type)
        .bind(flags.is_staff)
        .bind(flags.is_superuser)
        .fetch_one(db)
        .await
        .map_err(user_write_error)?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Returns the active user matching the credentials, or `None` for an
    /// unknown email, wrong password or inactive account.
    #[instrument(skip(db, password))]
    pub async fn authenticate(
        db: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let user = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, name, email, password, is_active FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(db)
        .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        if !user.is_active || !verify_password(password, &user.password)? {
            return Ok(None);
        }

        Ok(Some(user))
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = Self::authenticate(db, &dto.email, &dto.password)
            .await?
            .ok_or_else(|| {
                warn!("Login failed");
                AppError::bad_request(anyhow!(LOGIN_FAILED))
            })?;

        let pair = create_token_pair(user.id, &user.email, jwt_config)?;

        Ok(LoginResponse {
            access: pair.access,
            refresh: pair.refresh,
            user: UserSummary::from(&user),
        })
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn obtain_token_pair(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPairResponse, AppError> {
        let user = Self::authenticate(db, &dto.email, &dto.password)
            .await?
            .ok_or_else(|| AppError::unauthorized(TOKEN_OBTAIN_FAILED.to_string()))?;

        let pair = create_token_pair(user.id, &user.email, jwt_config)?;

        Ok(TokenPairResponse {
            access: pair.access,
            refresh: pair.refresh,
        })
    }

    /// Mints a new access token. The refresh token itself is not rotated.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn refresh_access_token(
        db: &PgPool,
        dto: RefreshTokenRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AccessTokenResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh, jwt_config)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))?;

        let user = UserService::get_active_user(db, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found or inactive".to_string()))?;

        Ok(AccessTokenResponse {
            access: create_access_token(user.id, &user.email, jwt_config)?,
        })
    }

    /// Issues and mails a reset token when the email names an active user.
    ///
    /// The outcome is never revealed to the caller: unknown emails and mail
    /// delivery failures both end in `Ok(())`.
    #[instrument(skip(db, dto, email_config, reset_config))]
    pub async fn forgot_password(
        db: &PgPool,
        dto: ForgotPasswordRequest,
        email_config: &EmailConfig,
        reset_config: &PasswordResetConfig,
    ) -> Result<(), AppError> {
        let email = normalize_email(&dto.email);

        let user = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email FROM users WHERE email = $1 AND is_active",
        )
        .bind(&email)
        .fetch_optional(db)
        .await?;

        let Some(user) = user else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = PasswordResetService::issue(db, user.id, reset_config)
            .await
            .map_err(ResetTokenError::into_app_error)?;

        let email_service = EmailService::new(email_config.clone());
        if let Err(e) = email_service
            .send_password_reset_email(&user.email, &user.name, &token, reset_config.token_ttl_hours)
            .await
        {
            error!(user_id = %user.id, error = ?e.error, "Failed to send password reset email");
        }

        Ok(())
    }

    #[instrument(skip(db, dto, email_config, reset_config))]
    pub async fn reset_password(
        db: &PgPool,
        dto: ResetPasswordRequest,
        email_config: &EmailConfig,
        reset_config: &PasswordResetConfig,
    ) -> Result<(), AppError> {
        let user = PasswordResetService::reset(
            db,
            &dto.token,
            &dto.password,
            &dto.confirm_password,
            reset_config,
        )
        .await
        .map_err(ResetTokenError::into_app_error)?;

        let email_service = EmailService::new(email_config.clone());
        if let Err(e) = email_service
            .send_password_reset_confirmation(&user.email, &user.name)
            .await
        {
            error!(user_id = %user.id, error = ?e.error, "Failed to send password reset confirmation");
        }

        Ok(())
    }
}
