use lousa_core::ErrorResponse;
use lousa_models::{
    AccessTokenResponse, DetailResponse, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RefreshTokenRequest, RegisterUserDto, ResetPasswordRequest, SuccessResponse,
    TokenPairResponse, UpdateProfileDto, User, UserProfile, UserSummary, UserType,
    ValidTokenResponse, ValidateResetTokenRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::obtain_token,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::auth::controller::validate_reset_token,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::update_me,
    ),
    components(
        schemas(
            User,
            UserType,
            UserSummary,
            UserProfile,
            RegisterUserDto,
            UpdateProfileDto,
            LoginRequest,
            LoginResponse,
            TokenPairResponse,
            RefreshTokenRequest,
            AccessTokenResponse,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            ValidateResetTokenRequest,
            ValidTokenResponse,
            DetailResponse,
            SuccessResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, tokens and password reset"),
        (name = "Users", description = "The authenticated user's own profile")
    ),
    info(
        title = "Lousa Accounts API",
        version = "0.1.0",
        description = "User accounts and JWT authentication for the Lousa school platform.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/token",
            "/api/token/refresh",
            "/api/auth/forgot-password",
            "/api/auth/reset-password",
            "/api/auth/validate-reset-token",
            "/api/me",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
