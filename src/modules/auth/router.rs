use axum::{Router, routing::post};

use super::controller::{
    forgot_password, login_user, obtain_token, refresh_token, register_user, reset_password,
    validate_reset_token,
};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/validate-reset-token", post(validate_reset_token))
}

pub fn init_token_router() -> Router<AppState> {
    Router::new()
        .route("/token", post(obtain_token))
        .route("/token/refresh", post(refresh_token))
}
