//! # Lousa Auth
//!
//! Authentication types and JWT utilities for the Lousa accounts API.
//!
//! This crate provides:
//!
//! - [`claims`]: JWT claim structures for access and refresh tokens
//! - [`jwt`]: Token creation and verification utilities
//!
//! # Token Types
//!
//! - **Access Token** ([`Claims`]): Short-lived token sent as `Authorization: Bearer`
//! - **Refresh Token** ([`RefreshTokenClaims`]): Long-lived token exchanged for new access tokens
//!
//! Both carry a [`TokenType`] so one kind is never accepted in place of the other.
//!
//! # Example
//!
//! ```ignore
//! use lousa_auth::{create_token_pair, verify_token};
//! use lousa_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let pair = create_token_pair(user_id, "ana@x.com", &config)?;
//! let claims = verify_token(&pair.access, &config)?;
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, RefreshTokenClaims, TokenType};
pub use jwt::{
    TokenPair, create_access_token, create_refresh_token, create_token_pair, verify_refresh_token,
    verify_token,
};
