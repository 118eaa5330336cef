use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use lousa_auth::{Claims, verify_token};
use lousa_core::AppError;
use uuid::Uuid;

use crate::state::AppState;

/// Extractor that validates the bearer access token and provides its claims.
///
/// Rejects with 401 when the header is missing or malformed, the token does
/// not verify, or it is a refresh token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::unauthorized(
                        "Authentication credentials were not provided.".to_string(),
                    )
                })?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lousa_auth::TokenType;

    fn claims_for(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "ana@x.com".to_string(),
            token_type: TokenType::Access,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id() {
        let user_id = Uuid::new_v4();
        let auth_user = AuthUser(claims_for(&user_id.to_string()));

        assert_eq!(auth_user.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_user_id_malformed_subject() {
        let auth_user = AuthUser(claims_for("not-a-uuid"));
        let err = auth_user.user_id().unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }
}
