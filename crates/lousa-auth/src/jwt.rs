//! JWT (JSON Web Token) utilities for authentication.
//!
//! Tokens are HS256-signed with [`JwtConfig::secret`]. Signature and `exp`
//! validation are left to `jsonwebtoken`; this module only adds the
//! access/refresh discrimination on top.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use uuid::Uuid;

use lousa_config::JwtConfig;
use lousa_core::AppError;

use crate::claims::{Claims, RefreshTokenClaims, TokenType};

/// An access/refresh pair as returned by login and token obtain.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

fn sign<T: Serialize>(claims: &T, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Creates a short-lived access token for `user_id`.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.access_token_expiry).max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        token_type: TokenType::Access,
        exp,
        iat: now as usize,
    };

    sign(&claims, jwt_config)
}

/// Creates a refresh token for obtaining new access tokens.
///
/// Each refresh token carries a fresh `jti`, so two tokens issued within
/// the same second still differ.
pub fn create_refresh_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.refresh_token_expiry).max(0) as usize;

    let claims = RefreshTokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        token_type: TokenType::Refresh,
        exp,
        iat: now as usize,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, jwt_config)
}

pub fn create_token_pair(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access: create_access_token(user_id, email, jwt_config)?,
        refresh: create_refresh_token(user_id, email, jwt_config)?,
    })
}

/// Verifies an access token and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired, is malformed, or is a refresh token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))?;

    if claims.token_type != TokenType::Access {
        return Err(AppError::unauthorized("Token is not an access token".to_string()));
    }

    Ok(claims)
}

/// Verifies a refresh token and returns the claims.
///
/// # Errors
///
/// Returns an unauthorized error if the token is invalid, expired, or is an
/// access token.
pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, AppError> {
    let claims = decode::<RefreshTokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired refresh token".to_string()))?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::unauthorized("Token is not a refresh token".to_string()));
    }

    Ok(claims)
}
