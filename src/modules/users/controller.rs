use axum::{Json, extract::State};
use lousa_core::{AppError, ErrorResponse};
use lousa_models::{UpdateProfileDto, UserProfile, UserSummary};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user", body = UserSummary),
        (status = 401, description = "Missing or invalid token, or inactive user", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserSummary>, AppError> {
    let user = UserService::get_active_user(&state.db, auth_user.user_id()?)
        .await?
        .ok_or_else(|| AppError::unauthorized("User not found or inactive".to_string()))?;

    Ok(Json(UserSummary::from(&user)))
}

/// Update the authenticated user's profile
#[utoipa::path(
    patch,
    path = "/api/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token, or inactive user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = UserService::update_profile(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(profile))
}
