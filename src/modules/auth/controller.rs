use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lousa_core::{AppError, ErrorResponse};
use lousa_models::{
    AccessTokenResponse, DetailResponse, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RefreshTokenRequest, RegisterUserDto, ResetPasswordRequest, ResetTokenError, SuccessResponse,
    TokenPairResponse, User, ValidTokenResponse, ValidateResetTokenRequest,
};
use tracing::instrument;

use super::service::AuthService;
use crate::modules::password_reset::PasswordResetService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists with that email, a password reset link has been sent.";
pub const RESET_PASSWORD_MESSAGE: &str =
    "Password has been reset successfully. You can now log in with your new password.";

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserDto,
    responses(
        (status = 201, description = "User registered successfully", body = User),
        (status = 400, description = "Validation error, or email/CPF already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = AuthService::register_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login and receive an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials or missing fields", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Obtain an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let response = AuthService::obtain_token_pair(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Access token issued", body = AccessTokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let response = AuthService::refresh_access_token(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Request a password reset email
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent if the account exists", body = SuccessResponse),
        (status = 400, description = "Email missing", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    AuthService::forgot_password(
        &state.db,
        dto,
        &state.email_config,
        &state.password_reset_config,
    )
    .await?;
    Ok(Json(SuccessResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

/// Reset the password with a token from the reset email
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = SuccessResponse),
        (status = 400, description = "Validation error, password mismatch, or invalid/expired token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    AuthService::reset_password(
        &state.db,
        dto,
        &state.email_config,
        &state.password_reset_config,
    )
    .await?;
    Ok(Json(SuccessResponse::new(RESET_PASSWORD_MESSAGE)))
}

/// Check a reset token without consuming it
#[utoipa::path(
    post,
    path = "/api/auth/validate-reset-token",
    request_body = ValidateResetTokenRequest,
    responses(
        (status = 200, description = "Token is usable", body = ValidTokenResponse),
        (status = 400, description = "Token missing, unknown or expired", body = DetailResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, payload))]
pub async fn validate_reset_token(
    State(state): State<AppState>,
    payload: Result<Json<ValidateResetTokenRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let dto = match payload {
        Ok(Json(dto)) => dto,
        // Well-formed JSON whose token is not a string names no stored token.
        Err(JsonRejection::JsonDataError(_)) => {
            return Ok(detail(&ResetTokenError::NotFound.to_string()));
        }
        Err(_) => return Ok(detail("Token not provided")),
    };

    let Some(token) = dto.token.filter(|t| !t.is_empty()) else {
        return Ok(detail("Token not provided"));
    };

    match PasswordResetService::validate(&state.db, &token).await {
        Ok(_) => Ok(Json(ValidTokenResponse { valid: true }).into_response()),
        Err(err) if err.is_client_error() => Ok(detail(&err.to_string())),
        Err(err) => Err(err.into_app_error()),
    }
}

fn detail(reason: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(DetailResponse {
            detail: reason.to_string(),
        }),
    )
        .into_response()
}
