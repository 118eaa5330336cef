//! # Lousa Config
//!
//! Configuration types for the Lousa accounts API.
//!
//! Every structure is loaded from environment variables with sensible
//! development defaults:
//!
//! - [`jwt`]: JWT signing secret and token lifetimes
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`email`]: Email/SMTP configuration
//! - [`rate_limit`]: Rate limiting for authentication endpoints
//! - [`password_reset`]: Reset token lifetime and revocation policy
//!
//! # Example
//!
//! ```ignore
//! use lousa_config::{JwtConfig, PasswordResetConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let reset_config = PasswordResetConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod password_reset;
pub mod rate_limit;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use password_reset::PasswordResetConfig;
pub use rate_limit::RateLimitConfig;

/// Reads a parseable environment variable, falling back to `default` when it
/// is unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Reads a boolean flag. Accepts `true`/`1`/`yes` (any case) as true.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
